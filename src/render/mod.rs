//! Slide rasterization: measure a layer tree, compile it into passes, run them on the CPU.

pub mod blur;
pub mod composite;
pub mod cpu;
pub mod layout;
pub mod passes;
pub mod plan;
pub mod text;
