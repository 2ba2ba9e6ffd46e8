//! Reading and writing for the dadi text format.
//!
//! A dadi spectrum file may start with any number of `#` comment lines. The first line after
//! those gives the shape as whitespace-separated dimensions, optionally followed by `folded` or
//! `unfolded`. The next line gives the values in flat, row-major order, and an optional final
//! line gives a mask of the same length, where `1` marks a masked entry.

use std::{fmt, io, str::FromStr};

use crate::{array::Shape, Spectrum};

use super::{
    super::Folded,
    text::{format_values, parse_values},
};

fn invalid_data<E>(e: E) -> io::Error
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    io::Error::new(io::ErrorKind::InvalidData, e)
}

/// Reads an unfolded spectrum in dadi format from a reader.
///
/// Masked entries are read as zero, and the mask is kept on the returned spectrum. A spectrum
/// marked as folded is rejected.
pub fn read_spectrum<R>(reader: &mut R) -> io::Result<Spectrum>
where
    R: io::BufRead,
{
    let mut buf = String::new();
    let _bytes_read = reader.read_to_string(&mut buf)?;

    let mut lines = buf
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'));

    let header = lines
        .next()
        .ok_or_else(|| invalid_data("missing dadi header line"))
        .and_then(|line| Header::from_str(line).map_err(invalid_data))?;

    if header.folded {
        return Err(invalid_data("dadi spectrum is already folded"));
    }

    let mut values = lines
        .next()
        .ok_or_else(|| invalid_data("missing dadi data line"))
        .and_then(parse_values)?;

    let mask = lines
        .next()
        .map(|line| {
            let mask = line
                .split_ascii_whitespace()
                .map(|v| match v {
                    "0" => Ok(false),
                    "1" => Ok(true),
                    _ => Err(invalid_data(format!("invalid dadi mask value '{v}'"))),
                })
                .collect::<Result<Vec<_>, _>>()?;

            if mask.len() != values.len() {
                return Err(invalid_data(format!(
                    "dadi mask has {} entries, but data has {}",
                    mask.len(),
                    values.len()
                )));
            }

            Ok(mask)
        })
        .transpose()?;

    if let Some(mask) = &mask {
        values
            .iter_mut()
            .zip(mask)
            .filter(|(_, masked)| **masked)
            .for_each(|(v, _)| *v = 0.0);
    }

    let spectrum = Spectrum::new(values, header.shape).map_err(invalid_data)?;

    match mask {
        Some(mask) => spectrum.with_mask(mask).map_err(invalid_data),
        None => Ok(spectrum),
    }
}

/// Writes a folded spectrum in dadi format to a writer.
///
/// Entries folded away are written as zero and masked. Entries masked in the unfolded spectrum
/// stay masked, as do their mirror images.
pub fn write_folded<W>(writer: &mut W, folded: &Folded, precision: usize) -> io::Result<()>
where
    W: io::Write,
{
    let header = Header {
        shape: folded.inner().shape().clone(),
        folded: true,
    };
    writeln!(writer, "{header}")?;

    let values = folded
        .inner()
        .iter()
        .map(|x| x.unwrap_or(0.0))
        .collect::<Vec<_>>();
    writeln!(writer, "{}", format_values(&values, precision))?;

    let mask = folded
        .mask()
        .map(|masked| if masked { "1" } else { "0" })
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(writer, "{mask}")
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct Header {
    shape: Shape,
    folded: bool,
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dims = self
            .shape
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        let folded = if self.folded { "folded" } else { "unfolded" };

        write!(f, "{dims} {folded}")
    }
}

impl FromStr for Header {
    type Err = ParseHeaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_ascii_whitespace().collect::<Vec<_>>();

        let folded = match tokens.last() {
            Some(&"folded") => {
                tokens.pop();
                true
            }
            Some(&"unfolded") => {
                tokens.pop();
                false
            }
            _ => false,
        };

        if tokens.is_empty() {
            return Err(ParseHeaderError(s.to_string()));
        }

        tokens
            .into_iter()
            .map(usize::from_str)
            .collect::<Result<Vec<_>, _>>()
            .map(|shape| Self {
                shape: Shape(shape),
                folded,
            })
            .map_err(|_| ParseHeaderError(s.to_string()))
    }
}

/// An error associated with parsing the dadi format header.
#[derive(Debug)]
pub struct ParseHeaderError(String);

impl fmt::Display for ParseHeaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse '{}' as dadi format header", self.0)
    }
}

impl std::error::Error for ParseHeaderError {}
