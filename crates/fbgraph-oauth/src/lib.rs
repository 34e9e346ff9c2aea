//! OAuth flows for Graph applications: dialog and exchange URLs, token
//! exchange over [`fbgraph_http::RequestDispatcher`], and verification of
//! signed cookies and signed requests.

pub mod cookie;
pub mod manager;
pub mod signed_request;
pub mod token;

pub use cookie::{cookie_name, parse_app_cookie};
pub use manager::{OAuthOptions, OAuthTokenManager, Permissions};
pub use signed_request::{parse_signed_request, sign_payload, SIGNED_REQUEST_ALGORITHM};
pub use token::AccessTokenInfo;
