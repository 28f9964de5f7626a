use thappy_api::config::RuntimeEnv;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_FILTER: &str = "info,actix_web=info,sea_orm=warn";

/// JSON lines in production, human-readable output elsewhere.
/// `RUST_LOG` overrides the default filter.
pub fn init_tracing(env: RuntimeEnv) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let registry = tracing_subscriber::registry().with(env_filter);

    match env {
        RuntimeEnv::Production => registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_file(false)
                    .with_line_number(false)
                    .with_ansi(false)
                    .json(),
            )
            .init(),
        RuntimeEnv::Development | RuntimeEnv::Test => {
            registry.with(fmt::layer().with_target(true).compact()).init()
        }
    }
}
