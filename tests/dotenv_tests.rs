//! Tests for the `.env` loading middleware
//!
//! # Test Coverage
//!
//! Validates `LoadDotEnv` and `Conditional`:
//! - Parsing through the in-memory and native filesystem facades
//! - Comment and blank-line handling; values with embedded `=`
//! - Identity when the file is missing
//! - File variables overriding seeded process variables
//! - Gated middleware activation

use std::time::UNIX_EPOCH;

use armature::cli::{Command, Console, Usage};
use armature::{Application, Conditional, LoadDotEnv, OperatingSystem};

fn console() -> Console {
    Console::in_memory(
        ["bin"],
        false,
        Vec::<String>::new(),
        Vec::<(String, String)>::new(),
    )
}

struct Echo(String);

impl Command for Echo {
    fn usage(&self) -> Usage {
        Usage::new("show")
    }

    fn run(&self, console: Console) -> anyhow::Result<Console> {
        Ok(console.output(self.0.clone()))
    }
}

/// Registers a sole command printing the given keys, one value per line.
fn echo_env(app: Application, keys: &'static [&'static str]) -> Application {
    app.command(move |_, _, env| {
        let lines: Vec<&str> = keys
            .iter()
            .map(|key| env.maybe(key).unwrap_or("unset"))
            .collect();
        Ok(Box::new(Echo(format!("{}\n", lines.join("\n")))) as Box<dyn Command>)
    })
}

#[test]
fn loads_variables_through_the_filesystem_facade() {
    let content = "FOO=bar\n# a comment\n\nPASSWORD=foo=\" \\n watev; bar!\n";
    let os = OperatingSystem::in_memory([("/etc/app/.env", content)], UNIX_EPOCH);

    let app = Application::cli(os, Vec::<(String, String)>::new()).map(LoadDotEnv::at("/etc/app"));
    let out = echo_env(app, &["FOO", "PASSWORD"])
        .run_cli(console())
        .unwrap();
    assert_eq!(out.outputs(), ["bar\nfoo=\" \\n watev; bar!\n"]);
}

#[test]
fn a_missing_file_leaves_the_environment_untouched() {
    let os = OperatingSystem::in_memory(Vec::<(&str, &str)>::new(), UNIX_EPOCH);

    let app = Application::cli(os, Vec::<(String, String)>::new()).map(LoadDotEnv::at("/etc/app"));
    let out = echo_env(app, &["FOO"]).run_cli(console()).unwrap();
    assert_eq!(out.outputs(), ["unset\n"]);
}

#[test]
fn file_variables_override_seeded_ones() {
    let os = OperatingSystem::in_memory([("/etc/app/.env", "FOO=from-file\n")], UNIX_EPOCH);

    let app = Application::cli(os, [("FOO", "from-process")]).map(LoadDotEnv::at("/etc/app"));
    let out = echo_env(app, &["FOO"]).run_cli(console()).unwrap();
    assert_eq!(out.outputs(), ["from-file\n"]);
}

#[test]
fn reads_from_the_native_filesystem() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".env"), "FOO=from-disk\n").unwrap();

    let app = Application::cli(OperatingSystem::native(), Vec::<(String, String)>::new())
        .map(LoadDotEnv::at(dir.path()));
    let out = echo_env(app, &["FOO"]).run_cli(console()).unwrap();
    assert_eq!(out.outputs(), ["from-disk\n"]);
}

#[test]
fn a_disabled_conditional_never_builds_its_middleware() {
    let os = OperatingSystem::in_memory(Vec::<(&str, &str)>::new(), UNIX_EPOCH);

    let app = Application::cli(os, Vec::<(String, String)>::new()).map(Conditional::when(
        false,
        || -> LoadDotEnv { panic!("middleware factory ran while disabled") },
    ));
    let out = app.run_cli(console()).unwrap();
    assert_eq!(out.outputs(), ["Hello world\n"]);
}

#[test]
fn an_enabled_conditional_applies_its_middleware() {
    let os = OperatingSystem::in_memory([("/etc/app/.env", "FOO=gated\n")], UNIX_EPOCH);

    let app = Application::cli(os, Vec::<(String, String)>::new())
        .map(Conditional::when(true, || LoadDotEnv::at("/etc/app")));
    let out = echo_env(app, &["FOO"]).run_cli(console()).unwrap();
    assert_eq!(out.outputs(), ["gated\n"]);
}
