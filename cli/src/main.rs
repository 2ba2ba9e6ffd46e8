use std::io::Write;

use anyhow::Error;

use clap::{ArgAction, Parser, Subcommand};

mod fold;
use fold::Fold;

mod genepop;
use genepop::Genepop;

mod hwe;
use hwe::HweFilter;

const NAME: &str = env!("CARGO_BIN_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Tools for population genetic data conversion and filtering.
#[derive(Debug, Parser)]
#[clap(name = NAME, version = VERSION, about)]
#[clap(subcommand_required = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Suppress warnings.
    ///
    /// By default, only warnings are printed. By setting this flag, warnings will be disabled.
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbosity.
    ///
    /// Flag can be set multiply times to increase verbosity, or left unset for quiet mode.
    #[clap(short = 'v', long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Print CLI arguments for debugging.
    #[clap(long, hide = true, global = true)]
    debug: bool,
}

impl Cli {
    pub fn run(self) -> Result<(), Error> {
        if self.debug {
            eprintln!("{self:#?}");
        }

        let level = if self.quiet {
            log::LevelFilter::Off
        } else {
            match self.verbose {
                0 => log::LevelFilter::Warn,
                1 => log::LevelFilter::Info,
                2 => log::LevelFilter::Debug,
                _ => log::LevelFilter::Trace,
            }
        };

        match env_logger::Builder::new()
            .filter_level(level)
            .target(env_logger::Target::Stderr)
            .format(|buf, record| {
                let level = record.level().as_str().to_lowercase();
                let args = record.args();
                writeln!(buf, "[pgtk {level:>5}] {args}")
            })
            .try_init()
        {
            Ok(()) => (),
            Err(e) => eprintln!("failed to setup logger: {e}"),
        }

        self.command.run()
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Fold(Fold),
    Genepop(Genepop),
    HweFilter(HweFilter),
}

impl Command {
    fn run(self) -> Result<(), Error> {
        match self {
            Command::Fold(fold) => fold.run(),
            Command::Genepop(genepop) => genepop.run(),
            Command::HweFilter(hwe_filter) => hwe_filter.run(),
        }
    }
}

macro_rules! impl_try_from_command {
    ($variant:ident, $subcommand:ty) => {
        impl TryFrom<Command> for $subcommand {
            type Error = Command;

            fn try_from(command: Command) -> Result<Self, Self::Error> {
                match command {
                    Command::$variant(subcommand) => Ok(subcommand),
                    command => Err(command),
                }
            }
        }
    };
}

impl_try_from_command!(Fold, Fold);
impl_try_from_command!(Genepop, Genepop);
impl_try_from_command!(HweFilter, HweFilter);

fn main() {
    let cli = Cli::parse();

    match cli.run() {
        Ok(()) => (),
        Err(e) => {
            eprintln!("error: {e:#}");
            std::process::exit(1);
        }
    }
}
