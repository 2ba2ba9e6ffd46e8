#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Tools for population genetic data conversion and filtering.
//!
//! This serves as the core library implementation for the `pgtk` CLI, but can also be used as a
//! free-standing library.
//!
//! # Overview
//!
//! - [`genepop`] converts an unlinked SNP matrix of IUPAC genotype calls to the Genepop format,
//!   grouping samples into populations and optionally dropping loci without data in some
//!   population.
//! - [`spectrum`] reads, folds, and writes site frequency spectra, backed by an N-dimensional
//!   [`Array`].
//! - [`hwe`] filters loci by per-site Hardy-Weinberg equilibrium test statistics.
//!
//! # Example
//!
//! ```
//! use pgtk_core::Spectrum;
//!
//! let spectrum = Spectrum::new(vec![5., 3., 2., 1., 0.], 5)?;
//! let folded = spectrum.fold().into_spectrum(f64::NAN);
//!
//! assert_eq!(&folded.inner().as_slice()[..3], &[5., 4., 2.]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#[cfg(test)]
#[macro_use]
pub(crate) mod approx;

pub mod array;
pub use array::Array;

pub mod genepop;

pub mod hwe;

pub mod spectrum;
pub use spectrum::Spectrum;

pub mod utils;
