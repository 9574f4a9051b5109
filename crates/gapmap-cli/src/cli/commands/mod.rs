use super::args::{Cli, Command};
use crate::exit_codes;

pub mod bench;
pub mod build;
pub mod score;

pub fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Build(args) => build::run(args),
        Command::Score(args) => score::run(args),
        Command::Bench(args) => bench::run(args),
    }
}

/// Map a core error to the exit-code contract: configuration and input
/// problems are 2, anything else 1.
pub(crate) fn exit_code_for(err: &gapmap_core::Error) -> i32 {
    use gapmap_core::Error::*;
    match err {
        MissingInput { .. } | InsufficientData { .. } | ParseLine { .. }
        | NotIncreasing { .. } | InvalidKey { .. } | BadArtifact { .. } => exit_codes::INPUT_ERROR,
        _ => exit_codes::RUNTIME_ERROR,
    }
}

/// Report a core error on stderr and convert it to its exit code.
pub(crate) fn fail(err: &gapmap_core::Error) -> i32 {
    eprintln!("error: {err}");
    exit_code_for(err)
}
