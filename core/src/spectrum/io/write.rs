//! Utilities for writing folded spectra.

use std::{io, path::Path};

use crate::{spectrum::Folded, utils};

use super::{dadi, text, Format};

/// A builder to write a folded spectrum.
#[derive(Debug)]
pub struct Builder {
    format: Format,
    precision: usize,
    fill: f64,
}

impl Builder {
    /// Set the value used for entries that were folded away.
    ///
    /// This is only used for the plain text and npy formats, since the dadi format masks these.
    /// If unset, NaN will be used.
    pub fn set_fill(mut self, fill: f64) -> Self {
        self.fill = fill;
        self
    }

    /// Set format to write.
    ///
    /// If unset, the plain text format will be used.
    pub fn set_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Set precision.
    ///
    /// This is only used for the plain text and dadi formats.
    /// If unset, a precision of six digits will be used.
    pub fn set_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Write folded spectrum to writer.
    pub fn write<W>(&self, writer: &mut W, folded: &Folded) -> io::Result<()>
    where
        W: io::Write,
    {
        match self.format {
            Format::Text => {
                text::write_spectrum(writer, &folded.into_spectrum(self.fill), self.precision)
            }
            Format::Npy => folded.into_spectrum(self.fill).inner().write_npy(writer),
            Format::Dadi => dadi::write_folded(writer, folded, self.precision),
        }
    }

    /// Write folded spectrum to stdout.
    pub fn write_to_stdout(&self, folded: &Folded) -> io::Result<()> {
        self.write(&mut io::stdout().lock(), folded)
    }

    /// Write folded spectrum to path.
    ///
    /// If path already exists, it will be overwritten. The path is only touched once the
    /// spectrum has been written in full.
    pub fn write_to_path<P>(&self, path: P, folded: &Folded) -> io::Result<()>
    where
        P: AsRef<Path>,
    {
        utils::write_atomically(path, |writer| self.write(writer, folded))
    }

    /// Write folded spectrum to path or stdout.
    ///
    /// If the provided path is `None`, write to stdout.
    /// If path already exists, it will be overwritten.
    pub fn write_to_path_or_stdout<P>(&self, path: Option<P>, folded: &Folded) -> io::Result<()>
    where
        P: AsRef<Path>,
    {
        match path {
            Some(path) => self.write_to_path(path, folded),
            None => self.write_to_stdout(folded),
        }
    }
}

impl Default for Builder {
    fn default() -> Self {
        Builder {
            format: Format::Text,
            precision: 6,
            fill: f64::NAN,
        }
    }
}
