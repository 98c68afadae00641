//! Tracing setup for reactor runs.
//!
//! Every reactor stage runs inside a `reactor_stage` span carrying its stage
//! number (1 to 9), so a run can be narrowed to one stage with an `EnvFilter`
//! span directive:
//!
//! ```bash
//! # Stage summaries as an indented tree
//! YANGBIND_LOG=debug YANGBIND_LOG_FORMAT=tree yangbind --schema schema.json
//!
//! # Naming escalations of stage 8 only
//! YANGBIND_LOG="[reactor_stage{stage=8}]=trace" yangbind --schema schema.json
//!
//! # Augment linkage progress of stage 3, as JSON lines
//! YANGBIND_LOG="yangbind_reactor::augment[reactor_stage{stage=3}]=trace" \
//!     YANGBIND_LOG_FORMAT=json yangbind --schema schema.json
//! ```
//!
//! Nothing is installed unless `YANGBIND_LOG` or `RUST_LOG` is set. Output
//! always goes to stderr; stdout carries the report.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

const LOG_VAR: &str = "YANGBIND_LOG";
const FORMAT_VAR: &str = "YANGBIND_LOG_FORMAT";

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Flat `tracing-subscriber` lines.
    #[default]
    Text,
    /// Stage spans nested via `tracing-tree`.
    Tree,
    /// Newline-delimited JSON objects.
    Json,
}

impl LogFormat {
    /// Parse a `YANGBIND_LOG_FORMAT` value. Unknown values fall back to text.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Filter directives and format picked from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingSettings {
    pub directives: String,
    pub format: LogFormat,
}

impl TracingSettings {
    /// `YANGBIND_LOG` wins over `RUST_LOG`; `None` when neither is set.
    pub fn from_vars(
        own: Option<String>,
        rust_log: Option<String>,
        format: Option<String>,
    ) -> Option<Self> {
        let directives = own.or(rust_log)?;
        Some(Self {
            directives,
            format: format.as_deref().map(LogFormat::parse).unwrap_or_default(),
        })
    }

    pub fn from_env() -> Option<Self> {
        Self::from_vars(
            std::env::var(LOG_VAR).ok(),
            std::env::var("RUST_LOG").ok(),
            std::env::var(FORMAT_VAR).ok(),
        )
    }

    pub fn filter(&self) -> EnvFilter {
        EnvFilter::builder().parse_lossy(&self.directives)
    }
}

/// Install the global subscriber described by the environment, if any.
pub fn init_tracing() {
    let Some(settings) = TracingSettings::from_env() else {
        return;
    };
    let filter = settings.filter();
    match settings.format {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_targets(true);
            Registry::default().with(filter).with(tree_layer).init();
        }
        LogFormat::Json => {
            let json_layer = fmt::layer()
                .json()
                .with_current_span(true)
                .with_writer(std::io::stderr);
            Registry::default().with(filter).with(json_layer).init();
        }
        LogFormat::Text => {
            let text_layer = fmt::layer().with_target(true).with_writer(std::io::stderr);
            Registry::default().with(filter).with(text_layer).init();
        }
    }
}

#[cfg(test)]
#[path = "tests/tracing_config_tests.rs"]
mod tracing_config_tests;
