pub mod clock;
pub mod session;
