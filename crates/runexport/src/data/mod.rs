//! Data model: run records, QC flags, and the items-source abstraction.

mod record;
mod source;

pub use record::{NamedRef, QcFlag, Record};
pub use source::{FetchState, InMemorySource, ItemsSource};
