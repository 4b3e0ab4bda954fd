//! HTTP transport shared by the network clients.

mod http;

pub use http::{HttpReply, HttpTransport, TransportError};
