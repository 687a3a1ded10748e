// Configuration module entry point
// Manages application configuration and shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::{AppState, StartupError};
pub use types::{
    Config, HttpConfig, LoggingConfig, PerformanceConfig, ProjectConfig, RoutingConfig,
    ServerConfig, TransformConfig,
};

impl Config {
    /// Load configuration from the default `config.toml`
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from specified file path (without extension)
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("SERVER"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("project.root", ".")?
            .set_default("project.routes_dir", "routes")?
            .set_default("project.static_dir", "static")?
            .set_default("project.page_entry", "page.jsx")?
            .set_default("project.api_entry", "api.js")?
            .set_default("project.manifest", "package.json")?
            .set_default("project.production", false)?
            .set_default("routing.strict_trailing_slash", true)?
            .set_default("transform.stylesheet_extensions", vec!["css"])?
            .set_default("transform.script_extensions", vec!["js", "jsx"])?
            .set_default("http.max_body_size", 10_485_760)? // 10MB
            .set_default("http.strict_transform_errors", false)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.show_headers", false)?
            .set_default("logging.access_log_format", "combined")?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
