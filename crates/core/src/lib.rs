pub mod capture;
pub mod detection;
pub mod overlay;
pub mod persistence;
pub mod pipeline;
pub mod shared;
pub mod source;
