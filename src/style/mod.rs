pub mod normalize;
pub mod resolve;
