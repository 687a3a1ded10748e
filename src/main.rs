use std::sync::Arc;

use crumpet::config;
use crumpet::logger;
use crumpet::server;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::Config::load()?;

    logger::init(&cfg)?;

    // Worker thread count follows the config, defaulting to the core count
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_reusable_listener(addr)?;

    let state = Arc::new(config::AppState::new(cfg)?);
    logger::log_server_start(&addr, &state.config, state.routes.len());

    let signals = Arc::new(server::SignalHandler::new());
    server::start_signal_handler(Arc::clone(&signals));

    // LocalSet so connections can share non-Send state via spawn_local
    let local = tokio::task::LocalSet::new();
    local
        .run_until(server::serve(listener, state, Arc::clone(&signals.shutdown)))
        .await
}
