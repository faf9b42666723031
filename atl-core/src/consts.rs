//! Constants shared by the atl clients.

use std::time::Duration;

/// User-Agent header value sent with every API request
pub const USER_AGENT: &str = concat!("atl/", env!("CARGO_PKG_VERSION"));

/// Fixed per-request timeout
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Accept-Encoding advertised to the server; both are inflated locally
pub const ACCEPTED_ENCODINGS: &str = "gzip, deflate";
