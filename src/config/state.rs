// Application state module
// Builds and owns the immutable per-process serving state

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use thiserror::Error;

use super::types::Config;
use crate::handler::{ApiInvoker, PageRenderer, ShellRenderer, UnsupportedApiInvoker};
use crate::manifest::Manifest;
use crate::routing::{RouteMatcher, RouteTable};
use crate::transform::script::StyleImportStripper;
use crate::transform::stylesheet::StylesheetPipeline;
use crate::transform::AssetTransformer;

/// Startup failure while compiling the serving state.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to scan project tree: {0}")]
    Scan(#[from] std::io::Error),
    #[error("conflicting route keys: {0}")]
    Routes(#[from] matchit::InsertError),
}

/// Application state
///
/// Built once before serving begins and shared read-only across all in-flight
/// requests; nothing here is mutated while requests are served.
pub struct AppState {
    pub config: Config,
    pub routes: Arc<RouteTable>,
    pub matcher: RouteMatcher,
    pub stylesheets: AssetTransformer,
    pub scripts: AssetTransformer,
    pub renderer: Box<dyn PageRenderer>,
    pub api: Box<dyn ApiInvoker>,

    // Cached config value for lock-free access on the hot path
    pub cached_access_log: AtomicBool,
}

impl AppState {
    /// Compile the route table, matcher, transform adapters, and
    /// collaborators from the configuration.
    pub fn new(config: Config) -> Result<Self, StartupError> {
        let project_root = PathBuf::from(&config.project.root);

        let routes = Arc::new(RouteTable::build(&project_root, &config.project)?);
        let matcher = RouteMatcher::compile(&routes, config.routing.strict_trailing_slash)?;

        let stylesheets = AssetTransformer::new(
            project_root.clone(),
            "text/css",
            vec![Box::new(StylesheetPipeline::new())],
        );
        let scripts = AssetTransformer::new(
            project_root.clone(),
            "application/javascript",
            vec![Box::new(StyleImportStripper)],
        );

        let manifest = Manifest::load(&project_root.join(&config.project.manifest));
        let renderer = Box::new(ShellRenderer::new(&manifest, config.project.production));

        let cached_access_log = AtomicBool::new(config.logging.access_log);

        Ok(Self {
            config,
            routes,
            matcher,
            stylesheets,
            scripts,
            renderer,
            api: Box::new(UnsupportedApiInvoker),
            cached_access_log,
        })
    }

    /// Project root all file references are resolved against.
    #[must_use]
    pub fn project_root(&self) -> &std::path::Path {
        std::path::Path::new(&self.config.project.root)
    }
}
