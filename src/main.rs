//! Entry point for the podium presentation viewer.
//!
//! Responsibilities here are intentionally minimal:
//! - Parse command-line arguments.
//! - Load user configuration from `conf/config.toml`.
//! - Install logging and the Ctrl+C handler.
//! - Launch the GUI, which loads the document in the background.

mod app;
mod theme;

use crate::app::run_app;
use anyhow::{Context, Result, anyhow};
use podium_core::config::load_config;
use podium_core::loader::DocumentKind;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

type ReloadHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

const USAGE: &str = "Usage: podium [document.pdf|.ppt|.pptx] [--script notes.txt]";

static SIGINT_REQUESTED: AtomicBool = AtomicBool::new(false);

#[derive(Debug, Default, PartialEq, Eq)]
struct CliArgs {
    document: Option<PathBuf>,
    script: Option<PathBuf>,
}

fn main() {
    let reload_handle = init_tracing();
    if let Err(err) = run(&reload_handle) {
        error!("{err:?}");
        std::process::exit(1);
    }
}

fn run(reload_handle: &ReloadHandle) -> Result<()> {
    let args = parse_args(env::args().skip(1))?;
    validate_args(&args)?;
    let config = load_config(Path::new(app::CONFIG_PATH));
    set_log_level(reload_handle, config.log_level.as_filter_str());
    install_sigint_handler();
    info!(
        document = ?args.document,
        script = ?args.script,
        level = %config.log_level,
        "Starting podium"
    );
    run_app(config, args.document, args.script).context("Failed to start the GUI")?;
    Ok(())
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<CliArgs> {
    let mut parsed = CliArgs::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--script" | "-s" => {
                let path = args
                    .next()
                    .ok_or_else(|| anyhow!("--script needs a path\n{USAGE}"))?;
                parsed.script = Some(PathBuf::from(path));
            }
            "--help" | "-h" => return Err(anyhow!(USAGE)),
            flag if flag.starts_with('-') => {
                return Err(anyhow!("Unknown option: {flag}\n{USAGE}"));
            }
            _ if parsed.document.is_some() => {
                return Err(anyhow!("Only one document can be opened\n{USAGE}"));
            }
            _ => parsed.document = Some(PathBuf::from(&arg)),
        }
    }
    Ok(parsed)
}

fn validate_args(args: &CliArgs) -> Result<()> {
    if let Some(document) = &args.document {
        if !document.exists() {
            return Err(anyhow!("File not found: {}", document.display()));
        }
        DocumentKind::from_path(document)?;
    }
    if let Some(script) = &args.script {
        if !script.exists() {
            return Err(anyhow!("Script not found: {}", script.display()));
        }
    }
    Ok(())
}

fn install_sigint_handler() {
    if let Err(err) = ctrlc::set_handler(|| SIGINT_REQUESTED.store(true, Ordering::SeqCst)) {
        warn!("Failed to install Ctrl+C signal handler: {err}");
    }
}

/// Returns `true` once per Ctrl+C received.
pub(crate) fn take_sigint_requested() -> bool {
    SIGINT_REQUESTED.swap(false, Ordering::SeqCst)
}

fn init_tracing() -> ReloadHandle {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    let (filter_layer, handle) = reload::Layer::new(env_filter);
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(filter_layer),
        )
        .init();
    warn!("Logging initialized; override level with config.log_level or RUST_LOG");
    handle
}

fn set_log_level(handle: &ReloadHandle, level: &str) {
    let parsed = EnvFilter::builder()
        .parse(level)
        .unwrap_or_else(|_| EnvFilter::new("debug"));
    if let Err(err) = handle.modify(|filter| *filter = parsed.clone()) {
        warn!(%level, "Failed to update log level from config: {err}");
    } else {
        info!(%level, "Applied log level from config");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn document_and_script_are_parsed() {
        let parsed = parse_args(args(&["deck.pdf", "--script", "notes.txt"])).unwrap();
        assert_eq!(parsed.document, Some(PathBuf::from("deck.pdf")));
        assert_eq!(parsed.script, Some(PathBuf::from("notes.txt")));
    }

    #[test]
    fn no_arguments_starts_empty() {
        assert_eq!(parse_args(Vec::new()).unwrap(), CliArgs::default());
    }

    #[test]
    fn script_flag_requires_value() {
        assert!(parse_args(args(&["--script"])).is_err());
    }

    #[test]
    fn unknown_flags_and_extra_documents_are_rejected() {
        assert!(parse_args(args(&["--verbose"])).is_err());
        assert!(parse_args(args(&["a.pdf", "b.pdf"])).is_err());
    }

    #[test]
    fn missing_document_fails_validation() {
        let result = validate_args(&CliArgs {
            document: Some(PathBuf::from("/nonexistent/deck.pdf")),
            script: None,
        });
        assert!(result.is_err());
    }

    #[test]
    fn unsupported_extension_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("talk.docx");
        std::fs::write(&path, b"x").unwrap();
        let result = validate_args(&CliArgs {
            document: Some(path),
            script: None,
        });
        assert!(result.is_err());
    }
}
