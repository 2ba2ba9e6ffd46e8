//! Reading and writing for the text format.
//!
//! The plain text format is a simple format consisting of two lines.
//! The first line contains a header line `#SHAPE=<[shape]>`, where `[shape]`
//! is a `/`-separated representation of the shape of the spectrum. The next line
//! gives the spectrum in flat, row-major order separated by a single space.

use std::{fmt, io, str::FromStr};

use crate::{array::Shape, Spectrum};

/// The text format start string.
pub(crate) const START: [u8; 6] = *b"#SHAPE";

pub(super) fn parse_values(s: &str) -> io::Result<Vec<f64>> {
    s.split_ascii_whitespace()
        .map(f64::from_str)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

pub(super) fn format_values<'a, I>(values: I, precision: usize) -> String
where
    I: IntoIterator<Item = &'a f64>,
{
    values
        .into_iter()
        .map(|x| format!("{x:.precision$}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Reads a spectrum in text format from a reader.
///
/// The stream is assumed to be positioned at the start.
pub fn read_spectrum<R>(reader: &mut R) -> io::Result<Spectrum>
where
    R: io::BufRead,
{
    let header = Header::read(reader)?;

    let mut buf = String::new();
    let _bytes_read = reader.read_to_string(&mut buf)?;

    Spectrum::new(parse_values(&buf)?, header.shape)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Writes a spectrum in text format to a writer.
pub fn write_spectrum<W>(writer: &mut W, spectrum: &Spectrum, precision: usize) -> io::Result<()>
where
    W: io::Write,
{
    let header = Header::new(spectrum.shape().clone());
    header.write(writer)?;

    writeln!(writer, "{}", format_values(spectrum.inner().iter(), precision))
}

#[derive(Clone, Debug)]
struct Header {
    shape: Shape,
}

impl Header {
    pub fn new(shape: Shape) -> Self {
        Self { shape }
    }

    pub fn read<R>(reader: &mut R) -> io::Result<Self>
    where
        R: io::BufRead,
    {
        let mut buf = String::new();

        reader.read_line(&mut buf)?;

        Self::from_str(&buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    pub fn write<W>(&self, writer: &mut W) -> io::Result<()>
    where
        W: io::Write,
    {
        writeln!(writer, "{self}")
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#SHAPE=<{}>", self.shape)
    }
}

impl FromStr for Header {
    type Err = ParseHeaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim_start_matches(|c: char| !c.is_numeric())
            .trim_end_matches(|c: char| !c.is_numeric())
            .split('/')
            .map(usize::from_str)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| ParseHeaderError(String::from(s.trim_end())))
            .map(Shape)
            .map(Header::new)
    }
}

/// An error associated with parsing the plain text format header.
#[derive(Debug)]
pub struct ParseHeaderError(String);

impl fmt::Display for ParseHeaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to parse '{}' as plain text format header",
            self.0
        )
    }
}

impl std::error::Error for ParseHeaderError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header() {
        assert_eq!(Header::from_str("#SHAPE=<3>").unwrap().shape.as_ref(), [3]);
        assert_eq!(
            Header::from_str("#SHAPE=<11/13>").unwrap().shape.as_ref(),
            &[11, 13]
        );
        assert!(Header::from_str("#SHAPE=<>").is_err());
    }

    #[test]
    fn test_read_2d() -> io::Result<()> {
        let src = b"#SHAPE=<2/3>\n0.0 1.0 2.0 3.0 4.0 5.0\n";

        assert_eq!(
            read_spectrum(&mut &src[..])?,
            Spectrum::new([0., 1., 2., 3., 4., 5.], [2, 3]).unwrap()
        );

        Ok(())
    }

    #[test]
    fn test_read_wrong_number_of_values() {
        let src = b"#SHAPE=<4>\n0.0 1.0 2.0\n";

        let error = read_spectrum(&mut &src[..]).unwrap_err();
        assert_eq!(error.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_write_1d() -> io::Result<()> {
        let mut dest = Vec::new();
        write_spectrum(&mut dest, &Spectrum::new([0., 1., 2.], 3).unwrap(), 2)?;

        assert_eq!(dest, b"#SHAPE=<3>\n0.00 1.00 2.00\n");

        Ok(())
    }
}
