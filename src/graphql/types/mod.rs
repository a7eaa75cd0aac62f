pub mod arguments;
pub mod entity;
pub mod input;

pub use arguments::*;
pub use entity::*;
pub use input::*;
