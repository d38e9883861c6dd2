//! chef-agent binary entry point.

use chef_agent::agent::Settings;
use chef_agent::cli::{Cli, execute};
use clap::Parser;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "chef_agent=debug,info"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // stdout is reserved for command output and the MCP stdio transport.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Finds `--env-file` ahead of the full parse, falling back to `CHEF_ENV_FILE`.
fn env_file_arg(args: impl IntoIterator<Item = OsString>) -> Option<PathBuf> {
    let mut args = args.into_iter().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--" {
            break;
        }
        if arg == "--env-file" {
            return args.next().map(PathBuf::from);
        }
        if let Some(path) = arg.to_str().and_then(|a| a.strip_prefix("--env-file=")) {
            return Some(PathBuf::from(path));
        }
    }
    std::env::var_os("CHEF_ENV_FILE").map(PathBuf::from)
}

fn load_env_file(path: Option<&Path>) -> Result<PathBuf, dotenvy::Error> {
    match path {
        Some(path) => dotenvy::from_path(path).map(|()| path.to_path_buf()),
        None => dotenvy::dotenv(),
    }
}

#[allow(clippy::print_stdout, clippy::print_stderr)]
fn main() -> ExitCode {
    // The env file feeds RUST_LOG, clap and the settings, so it goes first.
    let loaded = load_env_file(env_file_arg(std::env::args_os()).as_deref());

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match loaded {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded environment file"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "failed to load environment file"),
    }

    let settings = Settings::from_env();
    tracing::debug!(?settings, "resolved settings");

    match execute(&cli, &settings) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{output}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<OsString> {
        list.iter().map(OsString::from).collect()
    }

    #[test]
    fn test_env_file_arg_forms() {
        assert_eq!(
            env_file_arg(args(&["chef-agent", "--env-file", "a.env", "config"])),
            Some(PathBuf::from("a.env"))
        );
        assert_eq!(
            env_file_arg(args(&["chef-agent", "config", "--env-file=b.env"])),
            Some(PathBuf::from("b.env"))
        );
    }

    #[test]
    fn test_env_file_arg_stops_at_separator() {
        let found = env_file_arg(args(&["chef-agent", "ask", "--", "--env-file", "x"]));
        assert_ne!(found, Some(PathBuf::from("x")));
    }
}
