mod coordinator;
mod errors;
mod http;

pub use coordinator::{RefreshCoordinator, RefreshTransport};
pub use errors::ClientError;
pub use http::{AuthHttpClient, HttpRefreshTransport};
