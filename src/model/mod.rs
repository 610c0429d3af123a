pub mod config;
pub mod document;
pub mod slide;
pub mod style;
