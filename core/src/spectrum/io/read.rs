//! Utilities for reading spectra.

use std::{fs, io, path::Path};

use crate::{Array, Spectrum};

use super::{dadi, text, Format};

/// A builder to read a spectrum.
#[derive(Debug, Default)]
pub struct Builder {
    format: Option<Format>,
}

impl Builder {
    /// Read spectrum from reader.
    ///
    /// Spectra with an empty axis are rejected.
    pub fn read<R>(self, reader: &mut R) -> io::Result<Spectrum>
    where
        R: io::Read,
    {
        let mut raw = Vec::new();
        reader.read_to_end(&mut raw)?;

        let format = self.format.unwrap_or_else(|| Format::detect(&raw));
        log::debug!("Reading spectrum in {format:?} format");

        let reader = &mut &raw[..];
        let spectrum = match format {
            Format::Text => text::read_spectrum(reader),
            Format::Npy => Array::read_npy(reader).map(Spectrum::from),
            Format::Dadi => dadi::read_spectrum(reader),
        }?;

        if spectrum.shape().iter().any(|&n| n == 0) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("spectrum with shape {} has an empty axis", spectrum.shape()),
            ));
        }

        Ok(spectrum)
    }

    /// Read spectrum from path.
    pub fn read_from_path<P>(self, path: P) -> io::Result<Spectrum>
    where
        P: AsRef<Path>,
    {
        self.read(&mut fs::File::open(path)?)
    }

    /// Read spectrum from path or stdin.
    ///
    /// If the provided path is `None`, read from stdin.
    pub fn read_from_path_or_stdin<P>(self, path: Option<P>) -> io::Result<Spectrum>
    where
        P: AsRef<Path>,
    {
        match path {
            Some(path) => self.read_from_path(path),
            None => self.read_from_stdin(),
        }
    }

    /// Read spectrum from stdin.
    pub fn read_from_stdin(self) -> io::Result<Spectrum> {
        self.read(&mut io::stdin().lock())
    }

    /// Set format to read.
    ///
    /// If unset, the format will automatically be detected when reading.
    pub fn set_format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_detects_text() -> io::Result<()> {
        let src = b"#SHAPE=<3>\n0 1 2\n";

        assert_eq!(
            Builder::default().read(&mut &src[..])?,
            Spectrum::new([0., 1., 2.], 3).unwrap()
        );

        Ok(())
    }

    #[test]
    fn test_read_detects_dadi() -> io::Result<()> {
        let src = b"3 unfolded\n0 1 2\n";

        assert_eq!(
            Builder::default().read(&mut &src[..])?,
            Spectrum::new([0., 1., 2.], 3).unwrap()
        );

        Ok(())
    }

    #[test]
    fn test_read_empty_axis_is_error() {
        for src in [&b"#SHAPE=<0>\n\n"[..], b"#SHAPE=<3/0>\n\n", b"0 unfolded\n\n"] {
            let error = Builder::default().read(&mut &src[..]).unwrap_err();

            assert_eq!(error.kind(), io::ErrorKind::InvalidData);
        }
    }

    #[test]
    fn test_read_npy() -> io::Result<()> {
        let spectrum = Spectrum::new([0., 1., 2., 3.], [2, 2]).unwrap();

        let mut src = Vec::new();
        spectrum.inner().write_npy(&mut src)?;

        assert_eq!(
            Builder::default()
                .set_format(Format::Npy)
                .read(&mut &src[..])?,
            spectrum
        );

        Ok(())
    }
}
