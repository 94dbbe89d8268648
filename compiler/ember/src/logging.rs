//! Tracing subscriber setup.

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install a global subscriber for `tracing` output.
///
/// Does nothing unless `RUST_LOG` is set, e.g. `RUST_LOG=ember_eval=trace`.
/// With `EMBER_LOG_TREE` also set, spans are rendered as an indented tree.
/// Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_err() {
            return;
        }
        let filter = EnvFilter::from_default_env();
        let (tree, flat) = if std::env::var("EMBER_LOG_TREE").is_ok() {
            let tree = tracing_tree::HierarchicalLayer::new(2)
                .with_targets(true)
                .with_bracketed_fields(true);
            (Some(tree), None)
        } else {
            (None, Some(fmt::layer().with_target(true).with_level(true)))
        };
        tracing_subscriber::registry()
            .with(filter)
            .with(tree)
            .with(flat)
            .init();
    });
}
