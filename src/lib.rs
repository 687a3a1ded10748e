//! crumpet — file-system routed web server
//!
//! Turns a project's `routes/` and `static/` directory trees into a compiled
//! routing table and dispatches each request to a static file, a
//! server-rendered page, or an api module, transforming stylesheets and
//! script modules on the fly instead of through a separate build step.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod manifest;
pub mod routing;
pub mod server;
pub mod transform;
