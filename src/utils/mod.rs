pub mod persistence;

use std::sync::Once;

use tracing_subscriber::filter::{Directive, LevelFilter};

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber with sensible defaults.
///
/// `RUST_LOG` directives are honored; `ploutos_core=info` is always added.
pub fn init_tracing() {
    init_tracing_with("ploutos_core=info");
}

/// Same as [`init_tracing`] but with a caller-supplied default directive, such
/// as the `log_filter` from [`crate::config::Config`].
pub fn init_tracing_with(directive: &str) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::from_default_env().add_directive(default_directive(directive));

        // A subscriber installed by the host application wins.
        let _ = fmt().with_env_filter(filter).try_init();
    });
}

/// Parses `directive`, falling back to `info` when it is not a valid filter
/// directive.
pub fn default_directive(directive: &str) -> Directive {
    directive
        .parse()
        .unwrap_or_else(|_| LevelFilter::INFO.into())
}
