use tracing_subscriber::EnvFilter;

/// Workspace crates whose events are shown; dependencies stay quiet.
const CRATE_TARGETS: &[&str] = &[
    "enso",
    "enso_anomaly",
    "enso_calendar",
    "enso_eof",
    "enso_field",
    "enso_io",
    "enso_regression",
    "enso_seasonal",
];

/// Level name for a `-v` count: none -> warn, `-v` -> info, `-vv` -> debug,
/// `-vvv` and above -> trace.
fn level_name(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// `target=level` directives for every workspace crate.
fn directives(verbosity: u8) -> String {
    let level = level_name(verbosity);
    CRATE_TARGETS
        .iter()
        .map(|t| format!("{t}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Install the global subscriber, writing to stderr so that `enso list`
/// output on stdout stays clean.
///
/// `RUST_LOG` overrides the CLI flag if set.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(directives(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbosity >= 2)
        .init();
}
