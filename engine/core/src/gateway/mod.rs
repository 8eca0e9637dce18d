//! Response Gateway
//!
//! Abstraction over the remote text-generation service, plus the reference
//! HTTP implementation.

mod http;
mod traits;

pub use http::HttpGateway;
pub use traits::{GatewayError, PromptReply, PromptRequest, ResponseGateway};
