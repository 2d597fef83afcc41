//! Transport abstraction over the metrics backend.
//!
//! - HTTP (the dashboard's REST backend)
//! - Mock transport for testing

pub mod http;
pub mod mock;
pub mod traits;

pub use http::HttpTransport;
pub use mock::{Endpoint, MockTransport};
pub use traits::{DevexTransport, TransportError};
