//! Request handlers.

pub mod health;
pub mod trailers;

pub use health::*;
pub use trailers::*;
