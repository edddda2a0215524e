//! The command line interface for `decldoc`.
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser, Default)]
#[clap(
    name = "decldoc",
    about = "Build HTML reference documentation from a parsed declaration tree",
    version
)]
pub struct Command {
    /// Path to the declaration tree produced by the parser: a JSON array
    /// with one entry per module.
    pub tree_path: PathBuf,
    /// Directory the generated pages are written to. An existing directory
    /// is cleared first.
    #[clap(long, default_value = "doc")]
    pub out_dir: PathBuf,
    /// Dotted module name to leave out of the build; also excludes every
    /// module below it. May be given more than once.
    #[clap(long = "exclude", value_name = "PREFIX")]
    pub exclude: Vec<String>,
    /// Open the docs in a browser after building them.
    #[clap(long)]
    pub open: bool,
    /// Silent mode. Don't output any warnings or errors to the command line.
    #[clap(long = "silent", short = 's')]
    pub silent: bool,
    /// Verbose output: -v for debug, -vv for trace.
    #[clap(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}
