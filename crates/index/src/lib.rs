mod client;
pub mod error;
mod models;
mod query;

pub use crate::client::IndexClient;
pub use crate::models::{CaptureRecord, CollectionInfo, RangeLocator};
pub use crate::query::{CaptureQuery, DEFAULT_PAGE_SIZE};
