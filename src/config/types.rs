// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub project: ProjectConfig,
    pub routing: RoutingConfig,
    pub transform: TransformConfig,
    pub http: HttpConfig,
    pub performance: PerformanceConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Project layout: where the route and static trees live and which entry
/// filenames mark pages and api modules.
#[derive(Debug, Deserialize, Clone)]
pub struct ProjectConfig {
    /// Project root the directory trees are resolved against
    pub root: String,
    /// Page/api source tree name
    pub routes_dir: String,
    /// Static asset tree name, mirrored verbatim into URL space
    pub static_dir: String,
    /// Page-entry filename convention
    pub page_entry: String,
    /// Api-entry filename convention
    pub api_entry: String,
    /// Dependency manifest filename
    pub manifest: String,
    /// Production mode (controls the `?dev` tag on resolved imports)
    pub production: bool,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            root: ".".to_string(),
            routes_dir: "routes".to_string(),
            static_dir: "static".to_string(),
            page_entry: "page.jsx".to_string(),
            api_entry: "api.js".to_string(),
            manifest: "package.json".to_string(),
            production: false,
        }
    }
}

/// Route matching configuration
#[derive(Debug, Deserialize, Clone)]
pub struct RoutingConfig {
    /// When true (the default), a path with a trailing slash does not match
    /// a table entry without one, and vice versa.
    pub strict_trailing_slash: bool,
}

/// On-the-fly transform configuration: which request extensions are routed
/// to the transform adapters instead of the route matcher.
#[derive(Debug, Deserialize, Clone)]
pub struct TransformConfig {
    pub stylesheet_extensions: Vec<String>,
    pub script_extensions: Vec<String>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub max_body_size: u64,
    /// Report transform/render failures as 500 instead of folding them into
    /// the uniform 404. Off by default for compatibility.
    pub strict_transform_errors: bool,
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    pub show_headers: bool,
    /// Access log format (combined, common, or json)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

fn default_access_log_format() -> String {
    "combined".to_string()
}
