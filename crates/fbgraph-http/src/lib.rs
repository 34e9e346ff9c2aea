//! HTTP transport for the Graph and REST servers
//!
//! A [`RequestDispatcher`] turns a path, a parameter set and a verb into one
//! HTTP round trip and hands back a [`ResponseEnvelope`]. Connection settings
//! are resolved per call from immutable [`HttpDefaults`] and per-call
//! [`RequestOptions`].

pub mod client;
pub mod config;
pub mod dispatcher;
pub mod encoding;
pub mod multipart;

pub use config::{ConnectionConfig, HttpDefaults, ProxyConfig, RequestOptions, SSL_PORT};
pub use dispatcher::{require_body, RequestDispatcher, Verb};
pub use multipart::{MultipartBody, MultipartEncoder, MultipartEntry};

pub use fbgraph_core::{GraphError, GraphResult, ParamValue, Params, ResponseEnvelope, UploadableParameter};
