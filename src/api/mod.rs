//! API Layer for hobbygraph
//!
//! Decodes ingress requests, runs them through the executor and renders the
//! `{data, errors}` envelope.
//!
//! # Status codes
//!
//! - 200: the operation executed, possibly with field errors
//! - 400: nothing executed (malformed body, missing query, parse error)
//! - 405: mutation over GET

mod errors;
mod handler;
mod request;
mod response;

pub use errors::{ApiError, ApiResult};
pub use handler::ApiHandler;
pub use request::{parse_body, QueryParams};
