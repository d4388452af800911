//! Help and version output.

mod common;

use common::*;

#[test]
fn test_help_lists_commands() {
    let result = TestEnv::new().run(&["--help"]);

    assert!(result.success);
    for command in ["preview", "deploy", "republish", "bootstrap", "versions", "classify"] {
        assert!(result.stdout.contains(command), "help lacks {command}");
    }
}

#[test]
fn test_version_flag() {
    let result = TestEnv::new().run(&["--version"]);

    assert!(result.success);
    assert!(result.stdout.starts_with("siteforge "));
}

#[test]
fn test_missing_subcommand_fails() {
    let result = TestEnv::new().run(&[]);
    assert!(!result.success);
}
