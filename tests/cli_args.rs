//! Integration tests for the tiny-cache binary
//!
//! Drives the compiled binary against a temporary cache directory.

use std::process::Command;

use tempfile::TempDir;

/// Helper to run the CLI with given args and capture output
fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_tiny-cache"))
        .args(args)
        .output()
        .expect("Failed to execute tiny-cache")
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"]);
    assert!(output.status.success(), "Expected --help to exit successfully");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("tiny-cache"), "Help should mention tiny-cache");
    assert!(stdout.contains("status"), "Help should list the status command");
}

#[test]
fn test_save_then_read_through_binary() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let dir = temp_dir.path().to_str().unwrap();

    let output = run_cli(&["--dir", dir, "save", "this_is_hash", "this_is_string"]);
    assert!(output.status.success());
    assert!(temp_dir.path().join("tiny-cache-this_is_hash").is_file());

    let output = run_cli(&["--dir", dir, "read", "this_is_hash"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim_end(), "this_is_string");
}

#[test]
fn test_read_missing_key_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let output = run_cli(&["--dir", temp_dir.path().to_str().unwrap(), "read", "absent"]);
    assert!(!output.status.success(), "Expected reading a missing key to fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Nothing cached"), "Unexpected stderr: {}", stderr);
}

#[test]
fn test_path_uses_prefix() {
    let output = run_cli(&["--dir", "/tmp/.cache", "path", "this_is_hash"]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim_end(),
        "/tmp/.cache/tiny-cache-this_is_hash"
    );
}

#[test]
fn test_invalid_key_exits_with_error() {
    let output = run_cli(&["path", "a/b"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid key"), "Unexpected stderr: {}", stderr);
}

#[cfg(test)]
mod unit_tests {
    //! Unit tests for CLI parsing that don't require running the binary

    use clap::Parser;
    use tiny_cache::cli::{validate_key, Cli, Command};
    use tiny_cache::{Ttl, ValidityPolicy};

    #[test]
    fn test_cli_save_parses_key_and_value() {
        let cli = Cli::parse_from(["tiny-cache", "save", "k", "v"]);
        assert_eq!(
            cli.command,
            Command::Save {
                key: "k".to_string(),
                value: "v".to_string()
            }
        );
    }

    #[test]
    fn test_cli_missing_subcommand_is_error() {
        assert!(Cli::try_parse_from(["tiny-cache"]).is_err());
    }

    #[test]
    fn test_cli_options_from_flags() {
        let cli = Cli::parse_from([
            "tiny-cache",
            "--duration",
            "50",
            "--file-presence",
            "status",
            "k",
        ]);
        let options = cli.options().unwrap();
        assert_eq!(options.duration, Ttl::Seconds(50));
        assert_eq!(options.validity, ValidityPolicy::FilePresence);
    }

    #[test]
    fn test_cli_user_cache_flag_parses_after_subcommand() {
        let cli = Cli::parse_from(["tiny-cache", "status", "k", "--user-cache"]);
        assert!(cli.user_cache);
    }

    #[test]
    fn test_validate_key() {
        assert!(validate_key("this_is_hash").is_ok());
        assert!(validate_key("..").is_err());
    }
}
