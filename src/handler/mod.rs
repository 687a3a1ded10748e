//! Request handler module
//!
//! The per-request decision logic: extension-based transform routing, route
//! lookup, and the static / page / api handling paths.

pub mod api;
pub mod dispatcher;
pub mod page;
pub mod static_files;

pub use api::{ApiInvoker, UnsupportedApiInvoker};
pub use dispatcher::{handle_request, DispatchError, RequestContext};
pub use page::{PageRenderer, ShellRenderer};
