//! Utilities for writing Genepop files.

use std::{io, path::Path};

use crate::utils;

use super::{Matrix, Populations};

/// A builder to write a Genepop file.
#[derive(Debug)]
pub struct Builder {
    source: String,
    append_population_names: bool,
}

impl Builder {
    /// Creates a new builder.
    ///
    /// The source is the name of the input matrix, recorded in the header line.
    pub fn new<S>(source: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            source: source.into(),
            append_population_names: false,
        }
    }

    /// Set whether to append population names to sample names.
    ///
    /// If set, each sample is written as `<sample>_<population>`.
    /// If unset, sample names are written unchanged.
    pub fn set_append_population_names(mut self, append_population_names: bool) -> Self {
        self.append_population_names = append_population_names;
        self
    }

    /// Write Genepop file to writer.
    ///
    /// Population members not in the matrix are skipped.
    pub fn write<W>(&self, writer: &mut W, matrix: &Matrix, populations: &Populations) -> io::Result<()>
    where
        W: io::Write,
    {
        writeln!(writer, "genepop file generated from {}.", self.source)?;

        for locus in matrix.loci() {
            writeln!(writer, "{locus}")?;
        }

        for (population, samples) in populations {
            writeln!(writer, "POP")?;

            for sample in samples {
                let Some(calls) = matrix.get(sample) else {
                    continue;
                };

                let codes = calls
                    .iter()
                    .map(|call| call.as_genepop())
                    .collect::<Vec<_>>()
                    .join(" ");

                if self.append_population_names {
                    writeln!(writer, "{sample}_{population}, {codes}")?;
                } else {
                    writeln!(writer, "{sample}, {codes}")?;
                }
            }
        }

        Ok(())
    }

    /// Write Genepop file to path.
    ///
    /// If path already exists, it will be overwritten. The path is only touched once the
    /// file has been written in full.
    pub fn write_to_path<P>(&self, path: P, matrix: &Matrix, populations: &Populations) -> io::Result<()>
    where
        P: AsRef<Path>,
    {
        utils::write_atomically(path, |writer| self.write(writer, matrix, populations))
    }
}
