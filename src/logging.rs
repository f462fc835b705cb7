//! Log sink setup.
//!
//! Every log record of this crate goes through [`tracing`](https://docs.rs/tracing). The server opens one
//! `request` span per exchange and the response writers, the router and the logging middleware record their
//! events inside it. Call [`init`] once at startup to print them:
//!
//! ```no_run
//! waypost::logging::init();
//! ```
//!
//! The filter comes from `RUST_LOG` when it is set:
//!
//! ```bash
//! RUST_LOG=waypost=debug cargo run
//! ```

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_DIRECTIVE: &str = "waypost=info";

/// Installs a formatting subscriber filtered by `RUST_LOG`, or by `waypost=info` when it is unset.
///
/// Does nothing if a global subscriber is already installed.
pub fn init() {
    init_with_filter(DEFAULT_DIRECTIVE);
}

/// Like [`init`], with `directive` as the fallback filter.
pub fn init_with_filter(directive: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
