pub mod engine;
pub mod transcript;

pub use engine::*;
pub use transcript::*;
