use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter directive, e.g. `tareas=debug`.
pub const LOG_ENV: &str = "TAREAS_LOG";

/// Install the stderr subscriber.
///
/// While the TUI owns the terminal, log lines would corrupt the screen, so
/// logging stays off there unless `TAREAS_LOG` asks for it explicitly.
pub fn init(interactive: bool) {
    let directive = std::env::var(LOG_ENV).ok().filter(|v| !v.trim().is_empty());
    if interactive && directive.is_none() {
        return;
    }

    let filter = directive
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
