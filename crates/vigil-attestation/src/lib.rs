pub mod engine;
pub mod stats;

pub use engine::*;
pub use stats::*;
