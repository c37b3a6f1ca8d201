pub mod cache;
pub mod clock;
pub mod fetch;
pub mod normalize;
pub mod point;
pub mod source;
pub mod synthetic;
