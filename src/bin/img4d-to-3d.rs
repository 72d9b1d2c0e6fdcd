use nifti_reshape::{cli, Direction};
use std::process::ExitCode;

fn main() -> ExitCode {
    cli::run_tool(Direction::FourDToVector, std::env::args_os())
}
