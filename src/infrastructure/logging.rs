use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    EnvFilter, Layer, Registry,
};

use crate::config::LogFormat;

/// Boxed layer composable on top of the base registry
pub type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Builds the level filter; `RUST_LOG` wins over the configured level
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Builds the log formatting layer for the configured output format
pub fn fmt_layer(format: &LogFormat) -> BoxedLayer {
    match format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_span_events(FmtSpan::CLOSE)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .boxed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_layer_builds_for_every_format() {
        let _json = fmt_layer(&LogFormat::Json);
        let _pretty = fmt_layer(&LogFormat::Pretty);
    }
}
