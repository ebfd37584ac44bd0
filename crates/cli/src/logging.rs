use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

const LOG_ENV: &str = "FETCHGEN_LOG";
const LOG_TARGETS: [&str; 2] = ["fetchgen_core", "fetchgen_cli"];

/// Install the stderr subscriber.
pub fn init_tracing() {
    // FETCHGEN_LOG controls log level: "trace", "debug", "info", "warn", "error"
    // or a full tracing filter spec like "fetchgen_core=debug"
    let filter = filter_spec(std::env::var(LOG_ENV).ok().as_deref());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn filter_spec(env: Option<&str>) -> String {
    let per_target = |level: &str| {
        LOG_TARGETS
            .iter()
            .map(|target| format!("{target}={level}"))
            .collect::<Vec<_>>()
            .join(",")
    };
    match env {
        Some(level) if is_plain_level(level) => per_target(level),
        Some(spec) => spec.to_string(),
        None => per_target("info"),
    }
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_spec() {
        assert_eq!(filter_spec(None), "fetchgen_core=info,fetchgen_cli=info");
        assert_eq!(
            filter_spec(Some("debug")),
            "fetchgen_core=debug,fetchgen_cli=debug"
        );
        assert_eq!(filter_spec(Some("fetchgen_core=trace")), "fetchgen_core=trace");
    }
}
