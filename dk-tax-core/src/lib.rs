pub mod calculations;
pub mod models;
pub mod reference;

pub use models::*;
pub use reference::{ReferenceError, ReferenceRepository};
