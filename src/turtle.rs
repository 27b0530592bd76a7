pub mod overlay;
pub mod trace;
