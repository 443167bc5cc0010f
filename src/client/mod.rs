//! HTTP client plumbing for talking to the API under test

pub mod request;
pub mod transport;

// Re-export client types
pub use request::{ApiRequest, ApiResponse, Method, empty_payload};
pub use transport::{ReqwestTransport, Transport};
