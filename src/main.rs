// SPDX-License-Identifier: MIT

//! `run-example <name>` replaces itself with `target/debug/examples/<name>`.

use std::{ffi::OsString, process::ExitCode};

use clap::Parser;
use run_example::{LaunchError, Launcher};
use tracing::Level;

#[derive(Parser)]
#[command(name = "run-example")]
#[command(about = "Run a built example in place of this process")]
#[command(disable_help_flag = true, disable_version_flag = true)]
struct Cmd {
    /// Example to run, looked up under the examples directory.
    target: Option<OsString>,

    /// Accepted but never passed on.
    #[arg(trailing_var_arg = true, hide = true)]
    ignored: Vec<OsString>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_max_level(Level::WARN)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .init();

    let cmd = Cmd::parse_from(positional_only(std::env::args_os()));
    if !cmd.ignored.is_empty() {
        tracing::debug!(count = cmd.ignored.len(), "ignoring extra arguments");
    }
    let name = cmd.target.clone();

    match Launcher::default().run(cmd.target) {
        Ok(never) => match never {},
        Err(e) => {
            report(&e, name);
            ExitCode::from(e.exit_code())
        }
    }
}

/// Put an end-of-options marker right after argv[0], so every token the
/// caller gave (a literal `--` included) is read as a value.
fn positional_only<I: IntoIterator<Item = OsString>>(args: I) -> Vec<OsString> {
    let mut args = args.into_iter();
    let mut ret = vec![args.next().unwrap_or_else(|| OsString::from("run-example"))];
    ret.push(OsString::from("--"));
    ret.extend(args);
    ret
}

fn report(e: &LaunchError, name: Option<OsString>) {
    match e {
        LaunchError::MissingArgument => {
            let argv0 = std::env::args_os()
                .next()
                .unwrap_or_else(|| OsString::from("run-example"));
            tracing::error!("{e}; usage: {} <target>", argv0.to_string_lossy());
        }
        _ => tracing::error!(name = ?name.unwrap_or_default(), "{e}"),
    }
}
