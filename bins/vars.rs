//! `vars <path> [key=value ...]`
//!
//! Builds request args from the path and request vars from the pairs, then
//! prints both as JSON on stdout.

use std::process::ExitCode;

use dotenvy::dotenv;
use serde_json::json;
use storage::{List, Storage};
use tracing::{error, info};
use uuid::Uuid;

fn init_logging() {
    // .env may set RUST_LOG / RUST_LOG_FORMAT / CONFIG_PATH
    dotenv().ok();
    match configs::AppConfig::load_and_validate() {
        Ok(cfg) => {
            common::utils::logging::init_logging_with(cfg.logging.format, Some(&cfg.logging.filter));
        }
        Err(e) => {
            common::utils::logging::init_logging_default();
            error!(service = "vars", event = "config_invalid", error = %e, "falling back to default logging");
        }
    }
    info!(service = "vars", event = "logger_init", "tracing subscriber initialized");
}

fn split_pair(raw: &str) -> (&str, &str) {
    raw.split_once('=').unwrap_or((raw, ""))
}

fn run(argv: &[String]) -> anyhow::Result<serde_json::Value> {
    let (path, pairs) = argv
        .split_first()
        .ok_or_else(|| anyhow::anyhow!("usage: vars <path> [key=value ...]"))?;

    let args = List::from_path(path);
    let vars = Storage::from_pairs(pairs.iter().map(|p| split_pair(p)));
    info!(service = "vars", event = "parsed", args = args.len(), vars = vars.len(), "request parsed");

    Ok(json!({ "args": args, "vars": vars }))
}

fn main() -> ExitCode {
    init_logging();

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(service = "vars", event = "panic", %service_id, pid, message = %info, "unhandled panic occurred");
    }));

    info!(service = "vars", event = "start", %service_id, pid, version, "vars starting");

    let argv: Vec<String> = std::env::args().skip(1).collect();
    let code = match run(&argv) {
        Ok(out) => {
            println!("{out}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(service = "vars", event = "run_failed", error = %e, "vars failed");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    };

    info!(service = "vars", event = "stop", %service_id, pid, "vars stopped");
    code
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_pair_handles_missing_value() {
        assert_eq!(split_pair("a=1"), ("a", "1"));
        assert_eq!(split_pair("a=b=c"), ("a", "b=c"));
        assert_eq!(split_pair("flag"), ("flag", ""));
    }

    #[test]
    fn run_groups_repeated_vars() -> anyhow::Result<()> {
        let argv: Vec<String> = ["/blog/show/42", "tag=a", "tag=b", "page=2"]
            .into_iter()
            .map(String::from)
            .collect();
        let out = run(&argv)?;
        assert_eq!(out["args"], json!(["blog", "show", "42"]));
        assert_eq!(out["vars"]["tag"], json!(["a", "b"]));
        assert_eq!(out["vars"]["page"], json!("2"));
        Ok(())
    }

    #[test]
    fn run_requires_a_path() {
        assert!(run(&[]).is_err());
    }
}
