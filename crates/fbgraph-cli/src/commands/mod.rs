pub mod oauth;
pub mod request;

// Re-export command handlers
pub use oauth::{manager_from_args, OAuthCommand};
pub use request::RequestCommand;
