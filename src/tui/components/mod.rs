pub mod chat;
pub mod input;

pub use chat::*;
pub use input::*;
