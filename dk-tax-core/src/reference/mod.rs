pub mod repository;

pub use repository::{ReferenceError, ReferenceRepository};
