pub mod fonts;
pub mod presets;
