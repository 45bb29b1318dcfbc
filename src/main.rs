use simple_http_server::config::Config;
use simple_http_server::logger;
use simple_http_server::server::{signal, Server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Optional config file path (without extension), defaults to ./config.*
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config".to_string());
    let cfg = Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let grace = cfg.shutdown_grace_period();

    let server = match Server::bind(cfg) {
        Ok(server) => server,
        Err(e) => {
            logger::log_error(&format!("Failed to start server: {e}"));
            return Err(e.into());
        }
    };

    signal::start_signal_handler(server.handle(), grace);
    server.run().await?;
    Ok(())
}
