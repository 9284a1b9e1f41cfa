// # relayd - DDNS update endpoint daemon
//
// Thin integration layer: reads configuration from environment variables,
// initializes tracing, and serves the update route. All update logic lives
// in relay-core; the Cloudflare client lives in relay-provider-cloudflare.
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// - `RELAY_BIND_ADDR`: listen address (default `0.0.0.0:8053`)
// - `RELAY_API_BASE`: DNS provider API base URL (default Cloudflare v4)
// - `RELAY_LOG_LEVEL`: trace|debug|info|warn|error (default `info`)
//
// Provider credentials are NOT configured here. Every inbound request
// carries its own credentials in the Authorization header, and they are
// dropped when the request completes.
//
// ## Example
//
// ```bash
// export RELAY_BIND_ADDR=0.0.0.0:8053
// export RELAY_LOG_LEVEL=debug
//
// relayd
// ```

use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use relay_provider_cloudflare::{CLOUDFLARE_API_BASE, CloudflareFactory};
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

mod server;

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum RelayExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<RelayExitCode> for ExitCode {
    fn from(code: RelayExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    bind_addr: String,
    api_base: String,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Self {
        Self {
            bind_addr: env::var("RELAY_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8053".to_string()),
            api_base: env::var("RELAY_API_BASE")
                .unwrap_or_else(|_| CLOUDFLARE_API_BASE.to_string()),
            log_level: env::var("RELAY_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        }
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if self.bind_addr.parse::<std::net::SocketAddr>().is_err() {
            anyhow::bail!(
                "RELAY_BIND_ADDR is not a valid socket address: {}. \
                Set it via: export RELAY_BIND_ADDR=0.0.0.0:8053",
                self.bind_addr
            );
        }

        if !self.api_base.starts_with("https://") && !self.api_base.starts_with("http://") {
            anyhow::bail!(
                "RELAY_API_BASE must use HTTP or HTTPS scheme. Got: {}",
                self.api_base
            );
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "RELAY_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }

    fn tracing_level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

fn main() -> ExitCode {
    // Load and validate configuration before anything else
    let config = Config::from_env();
    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {e}");
        return RelayExitCode::ConfigError.into();
    }

    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.tracing_level())
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {e}");
        return RelayExitCode::ConfigError.into();
    }

    info!("Starting relayd");
    info!("Forwarding updates to {}", config.api_base);

    // Enter tokio runtime
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {e}");
            return RelayExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        let factory = Arc::new(CloudflareFactory::new(config.api_base.clone()));
        info!("Listening on {}", config.bind_addr);
        match server::run(&config.bind_addr, factory).await {
            Ok(()) => {
                info!("Server stopped");
                RelayExitCode::CleanShutdown
            }
            Err(e) => {
                error!("Server error: {e}");
                RelayExitCode::RuntimeError
            }
        }
    });

    result.into()
}
