//! Tracing subscriber initialization.

use tracing_subscriber::EnvFilter;

/// Output format of the log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// One JSON object per line (default for deployed hosts).
    #[default]
    Json,
    /// Human-readable lines for local development.
    Pretty,
}

impl Format {
    /// Reads `KURUM360_LOG_FORMAT` (`json` | `pretty`); anything else is JSON.
    pub fn from_env() -> Self {
        match std::env::var("KURUM360_LOG_FORMAT").as_deref() {
            Ok("pretty") => Format::Pretty,
            _ => Format::Json,
        }
    }
}

/// Initialize tracing from `RUST_LOG` (default `info`).
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    init_with(Format::from_env(), None);
}

pub fn init_with(format: Format, directives: Option<&str>) {
    let filter = match directives {
        Some(d) => EnvFilter::new(d),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false);

    let _ = match format {
        Format::Json => builder.json().try_init(),
        Format::Pretty => builder.pretty().try_init(),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_is_a_no_op() {
        init_with(Format::Json, Some("debug"));
        init_with(Format::Pretty, Some("info"));
    }
}
