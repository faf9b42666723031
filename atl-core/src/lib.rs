//! # atl Core Library
//!
//! Shared building blocks for the Jira and Confluence clients: a generic
//! bearer-token REST transport, the error taxonomy every resource operation
//! reports through, and the output helpers the command layer renders with.

pub mod consts;
pub mod error;
pub mod output;
pub mod text;
pub mod transport;
pub mod url;

pub use error::{ApiError, Result};
pub use output::{ColorMode, OutputFormat, print_error, print_info, print_json, print_success, print_warning};
pub use transport::{BearerAuth, Method, RestTransport, Transport, decode, to_body};
