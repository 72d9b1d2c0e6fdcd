//! Command line front end shared by `img3d-to-4d` and `img4d-to-3d`.
use crate::convert::{Conversion, Direction};
use crate::writer::WriterOptions;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::ffi::OsString;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// The program name of the tool for a conversion direction.
pub fn tool_name(direction: Direction) -> &'static str {
    match direction {
        Direction::VectorTo4d => "img3d-to-4d",
        Direction::FourDToVector => "img4d-to-3d",
    }
}

/// Build the argument parser of a tool.
pub fn command(direction: Direction) -> Command {
    let about = match direction {
        Direction::VectorTo4d => "Reshape a 3D image of vectors into a 4D image of scalars",
        Direction::FourDToVector => "Reshape a 4D image of scalars into a 3D image of vectors",
    };
    Command::new(tool_name(direction))
        .about(about)
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("input")
                .value_name("INPUT")
                .help("Input image (.nii, .nii.gz, .hdr or .hdr.gz)")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("output")
                .value_name("OUTPUT")
                .help("Output image, GZip compressed if the name ends in .gz")
                .required(true)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log more details (repeat for more)")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .help("Only log errors")
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose"),
        )
}

/// Parse `args`, run the conversion and report the outcome.
///
/// Failures are printed to stderr and yield exit status 1.
pub fn run_tool<I, T>(direction: Direction, args: I) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = match command(direction).try_get_matches_from(args) {
        Ok(matches) => matches,
        Err(e) => {
            // help and version requests also end up here
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };
    init_logging(log_level(&matches));

    let (input, output) = match (
        matches.get_one::<PathBuf>("input"),
        matches.get_one::<PathBuf>("output"),
    ) {
        (Some(input), Some(output)) => (input, output),
        _ => return ExitCode::FAILURE,
    };

    match Conversion::new(direction, input, WriterOptions::new(output)).run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {}", tool_name(direction), e);
            ExitCode::FAILURE
        }
    }
}

fn log_level(matches: &ArgMatches) -> &'static str {
    if matches.get_flag("quiet") {
        return "error";
    }
    match matches.get_count("verbose") {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install a stderr subscriber. The level comes only from the flags.
fn init_logging(level: &str) {
    let ansi = std::io::stderr().is_terminal();
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(ansi)
        .with_writer(std::io::stderr);
    let _ = Registry::default()
        .with(EnvFilter::new(level))
        .with(fmt_layer)
        .try_init();
}
