pub mod error;
mod transport;

#[cfg(feature = "mock")]
pub use crate::transport::MockTransport;
pub use crate::transport::{GetRequest, HttpClient, HttpResponse, Transport};
use std::sync::Arc;

pub type TransportHandle = Arc<dyn Transport + Send + Sync>;
