//! Api invocation module
//!
//! Api modules are script files executed by an external runtime; the server
//! consumes that collaborator behind the [`ApiInvoker`] trait, handing it
//! the resolved module reference and the raw request. The built-in invoker
//! reports the route unservable, since no script runtime is embedded.

use std::path::Path;

use hyper::{Request, Response};

use crate::http::{Body, RequestBody};
use crate::logger;

use super::dispatcher::DispatchError;

/// Invoke an api module for a request.
pub trait ApiInvoker: Send + Sync {
    fn invoke(
        &self,
        api: &Path,
        req: Request<RequestBody>,
    ) -> Result<Response<Body>, DispatchError>;
}

/// Default invoker for deployments without a script runtime attached.
pub struct UnsupportedApiInvoker;

impl ApiInvoker for UnsupportedApiInvoker {
    fn invoke(
        &self,
        api: &Path,
        _req: Request<RequestBody>,
    ) -> Result<Response<Body>, DispatchError> {
        logger::log_warning(&format!(
            "api module '{}' requires an external script runtime",
            api.display()
        ));
        Err(DispatchError::NotFound(api.to_path_buf()))
    }
}
