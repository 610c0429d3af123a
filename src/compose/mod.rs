pub mod compositor;
pub mod kinds;
pub mod layer;
