//! Idempotent import of fetched movies into the content store.
//!
//! [`Importer`] turns one [`filmport_api::omdb::MovieRecord`] into stored
//! content, reusing posters and genre terms that already exist.
//! [`import_batch`] and [`run_import`] drive a whole search result through
//! it with progress reporting and cancellation.

mod batch;
mod error;
mod importer;
#[cfg(test)]
mod testing;

pub use batch::{
    BatchProgress, BatchReport, ItemOutcome, ItemReport, RunReport, import_batch, run_import,
};
pub use error::ImportError;
pub use importer::{ImportOutcome, Importer};
