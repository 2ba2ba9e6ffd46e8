use std::path::PathBuf;

use anyhow::{Context, Error};

use clap::{Parser, ValueEnum};

use pgtk_core::spectrum::io;

/// Fold SFS.
#[derive(Debug, Parser)]
#[clap(name = crate::NAME, about)]
pub struct Fold {
    /// Input SFS.
    ///
    /// The input SFS can be provided here or read from stdin in any of the supported formats.
    #[clap(value_parser, value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Sentry value to use when folding.
    ///
    /// By default, the "lower" part of the SFS will be set to nan. Setting this option can change
    /// this to other sentry values. The dadi output format masks these values instead.
    #[clap(short = 's', long, default_value = "nan", value_name = "SENTRY")]
    // default_value_t does not work well here since floats are formatted different from the Clap
    // enum string representation
    pub sentry: Sentry,

    /// Output SFS path.
    ///
    /// If no path is given, SFS will be output to stdout.
    #[clap(short = 'o', long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Output SFS format.
    #[clap(long, value_enum, default_value_t = Format::Text, value_name = "FORMAT")]
    pub format: Format,

    /// Precision to use when printing SFS.
    ///
    /// This is only used for the text and dadi formats.
    #[clap(short = 'p', long, default_value_t = 6, value_name = "INT")]
    pub precision: usize,
}

#[derive(ValueEnum, Clone, Copy, Debug, Eq, PartialEq)]
pub enum Sentry {
    /// Set folded value to nan.
    Nan,
    /// Set folded value to 0.
    Zero,
    /// Set folded value to -1.
    MinusOne,
    /// Set folded value to Inf.
    Inf,
}

impl From<Sentry> for f64 {
    fn from(value: Sentry) -> Self {
        match value {
            Sentry::Nan => f64::NAN,
            Sentry::Zero => 0.,
            Sentry::MinusOne => -1.,
            Sentry::Inf => f64::INFINITY,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, Eq, PartialEq)]
pub enum Format {
    /// Plain text format with a shape header.
    Text,
    /// Numpy npy format.
    Npy,
    /// Plain text format used by dadi, with folded values masked.
    Dadi,
}

impl From<Format> for io::Format {
    fn from(value: Format) -> Self {
        match value {
            Format::Text => io::Format::Text,
            Format::Npy => io::Format::Npy,
            Format::Dadi => io::Format::Dadi,
        }
    }
}

impl Fold {
    pub fn run(self) -> Result<(), Error> {
        let spectrum = io::read::Builder::default()
            .read_from_path_or_stdin(self.path.as_ref())
            .context("failed to read SFS")?;

        log::info!(
            "Folding {}-dimensional SFS with shape {}",
            spectrum.dimensions(),
            spectrum.shape()
        );
        let folded = spectrum.fold();

        io::write::Builder::default()
            .set_format(io::Format::from(self.format))
            .set_fill(f64::from(self.sentry))
            .set_precision(self.precision)
            .write_to_path_or_stdout(self.output.as_ref(), &folded)
            .context("failed to write folded SFS")?;

        Ok(())
    }
}
