pub mod color;
pub mod error;
pub mod metadata;

pub use color::*;
pub use error::*;
pub use metadata::*;
