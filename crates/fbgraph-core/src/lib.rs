pub mod error;
pub mod params;
pub mod response;
pub mod upload;

/// Primary Graph API host
pub const GRAPH_SERVER: &str = "graph.facebook.com";

/// Legacy REST API host
pub const REST_SERVER: &str = "api.facebook.com";

// Re-export commonly used types
pub use error::{ApiErrorBody, ApiErrorDetail, GraphError, GraphResult};
pub use params::{ParamValue, Params, ACCESS_TOKEN_KEY, METHOD_KEY};
pub use response::ResponseEnvelope;
pub use upload::{UploadSource, UploadableParameter};
