use anyhow::Result;
use argh::FromArgs;
use psh::{Interpreter, ShellConfig};
use std::process::ExitCode;

/// A small pipeline shell: pipes, file redirection, background execution,
/// and an optional backup file that records every entered line and all
/// pipeline output.
#[derive(FromArgs)]
struct Args {
    /// file to append every entered line and all pipeline output to
    #[argh(positional)]
    backup: Option<String>,
}

fn main() -> ExitCode {
    let args: Args = argh::from_env();
    match run(ShellConfig {
        backup: args.backup,
    }) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("psh: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: ShellConfig) -> Result<()> {
    Interpreter::new(config)?.repl()
}
