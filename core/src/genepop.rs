//! Conversion of unlinked SNP matrices to the Genepop format.
//!
//! The conversion is a linear pipeline: a [`Matrix`] of genotype calls is read, samples are
//! grouped into [`Populations`], loci may optionally be restricted to those with data in every
//! population using [`retained_loci`], and the result is written by a [`write::Builder`].
//!
//! # Example
//!
//! ```
//! use pgtk_core::genepop::{self, Matrix, Populations};
//!
//! let matrix = Matrix::read("2 4\nsampleA ACGT\nsampleB ACRT\n".as_bytes())?;
//! let populations = Populations::from_all(&matrix);
//!
//! let mut dest = Vec::new();
//! genepop::write::Builder::new("example.unlinked_snps").write(&mut dest, &matrix, &populations)?;
//!
//! let output = String::from_utf8(dest).unwrap();
//! assert!(output.ends_with("sampleB, 001001 002002 003001 004004\n"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::path::{Path, PathBuf};

mod call;
pub use call::{to_genepop, Call, ParseCallError};

mod error;
pub use error::{ConfigurationError, Error, FormatError};

mod filter;
pub use filter::retained_loci;

mod matrix;
pub use matrix::{Locus, Matrix};

pub mod population;
pub use population::Populations;

pub mod write;

/// The extension of Genepop files.
pub const EXTENSION: &str = "gen";

/// Returns the default output path for an input matrix path.
///
/// This is the input file name up to its first `.`, with the Genepop extension, relative to the
/// working directory.
pub fn output_path<P>(input: P) -> PathBuf
where
    P: AsRef<Path>,
{
    let name = source_name(input);
    let stem = name.split('.').next().unwrap_or_default();

    PathBuf::from(format!("{stem}.{EXTENSION}"))
}

/// Returns the file name of an input matrix path, as recorded in the Genepop header line.
pub fn source_name<P>(input: P) -> String
where
    P: AsRef<Path>,
{
    input
        .as_ref()
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
