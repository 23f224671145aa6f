//! Published Danish tax reference data and the loaders that read it.

mod bundled;
mod loader;

pub use bundled::BundledReference;
pub use loader::{ConstantsLoader, MunicipalityLoader, MunicipalityRecord, ReferenceLoaderError};
