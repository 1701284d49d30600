//! Tracing configuration for the `inscribe` binary
//!
//! ## Behavior / 行为
//!
//! - **Development**: debug level for workspace crates
//! - **Production**: info level for workspace crates, warn elsewhere
//! - **Environment filter**: `RUST_LOG` replaces the defaults entirely
//! - **Writer**: stderr, so stdout stays clean for JSON output

use std::io;

use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

const WORKSPACE_TARGETS: [&str; 4] = ["inscribe_lib", "insc_core", "insc_app", "insc_infra"];

fn is_development() -> bool {
    cfg!(debug_assertions)
}

/// Build the default filter directives for tracing
pub fn build_filter_directives(is_dev: bool) -> Vec<String> {
    let level = if is_dev { "debug" } else { "info" };
    let mut directives = vec!["warn".to_string()];
    directives.extend(
        WORKSPACE_TARGETS
            .iter()
            .map(|target| format!("{target}={level}")),
    );
    directives.push("hyper=warn".to_string());
    directives.push("reqwest=warn".to_string());
    directives
}

/// Initialize the tracing subscriber
///
/// ## Errors / 错误
///
/// Returns `Err` if a global subscriber is already registered.
pub fn init_tracing_subscriber() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(build_filter_directives(is_development()).join(",")));

    // "2025-01-15 10:30:45.123 INFO [file.rs:42] [target] message"
    let stderr_layer = fmt::layer()
        .with_timer(fmt::time::ChronoUtc::new(
            "%Y-%m-%d %H:%M:%S%.3f".to_string(),
        ))
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_ansi(cfg!(not(test)))
        .with_writer(io::stderr);

    registry().with(env_filter).with(stderr_layer).try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dev_directives_enable_debug_for_workspace() {
        let directives = build_filter_directives(true);
        assert_eq!(directives[0], "warn");
        assert!(directives.contains(&"insc_app=debug".to_string()));
        assert!(directives.contains(&"insc_infra=debug".to_string()));
    }

    #[test]
    fn release_directives_parse_as_filter() {
        let directives = build_filter_directives(false).join(",");
        assert!(directives.contains("insc_core=info"));
        assert!(EnvFilter::try_new(directives).is_ok());
    }
}
