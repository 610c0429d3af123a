pub mod debounce;
pub mod manager;
