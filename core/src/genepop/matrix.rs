use std::{fmt, io, path::Path, str::FromStr};

use indexmap::IndexMap;

use crate::utils;

use super::{Call, Error, FormatError};

/// A locus, identified by its zero-based column in the input matrix.
///
/// Loci keep their original index when other loci are removed.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Locus(pub usize);

impl fmt::Display for Locus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SNP_{}", self.0)
    }
}

/// A rectangular matrix of genotype calls, indexed by sample and locus.
///
/// Samples are kept in input order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Matrix {
    samples: IndexMap<String, Vec<Call>>,
    loci: Vec<Locus>,
}

impl Matrix {
    /// Returns `true` if the matrix contains the sample.
    pub fn contains(&self, sample: &str) -> bool {
        self.samples.contains_key(sample)
    }

    /// Reads a matrix from a path.
    ///
    /// Gzipped input is decompressed.
    pub fn from_path<P>(path: P) -> Result<Self, Error>
    where
        P: AsRef<Path>,
    {
        Self::read(utils::open(path)?)
    }

    /// Returns the genotype calls of a sample, in locus order.
    pub fn get(&self, sample: &str) -> Option<&[Call]> {
        self.samples.get(sample).map(Vec::as_slice)
    }

    /// Returns the loci in the matrix, in column order.
    pub fn loci(&self) -> &[Locus] {
        &self.loci
    }

    /// Reads a matrix from a reader.
    ///
    /// The first line is a header and is not interpreted, except that a warning is logged if
    /// it is a PHYLIP-style `<samples> <loci>` line that disagrees with the data. Every other
    /// non-blank line holds a sample name followed by a string of genotype calls, one character
    /// per locus, separated by whitespace. Any further fields are ignored.
    pub fn read<R>(reader: R) -> Result<Self, Error>
    where
        R: io::BufRead,
    {
        let mut lines = reader.lines();

        let header = match lines.next() {
            Some(line) => line?,
            None => return Err(FormatError::EmptyMatrix.into()),
        };

        let mut samples = IndexMap::new();
        let mut loci = None;

        for (i, line) in lines.enumerate() {
            let line = line?;
            let number = i + 2;

            let mut fields = line.split_whitespace();
            let Some(sample) = fields.next() else {
                continue;
            };
            let genotypes = fields
                .next()
                .ok_or(FormatError::MissingGenotypes { line: number })?;

            let calls = parse_calls(sample, genotypes, number)?;

            let expected = *loci.get_or_insert(calls.len());
            if calls.len() != expected {
                return Err(FormatError::RaggedGenotypes {
                    sample: sample.to_string(),
                    line: number,
                    expected,
                    found: calls.len(),
                }
                .into());
            }

            if samples.insert(sample.to_string(), calls).is_some() {
                return Err(FormatError::DuplicateSample {
                    sample: sample.to_string(),
                    line: number,
                }
                .into());
            }
        }

        let loci = match loci {
            Some(loci) if !samples.is_empty() => loci,
            _ => return Err(FormatError::NoSamples.into()),
        };

        let matrix = Self {
            samples,
            loci: (0..loci).map(Locus).collect(),
        };

        matrix.check_header(&header);
        log::info!(
            "Read SNP matrix with {} samples and {} loci",
            matrix.samples.len(),
            matrix.loci.len()
        );

        Ok(matrix)
    }

    /// Returns a new matrix restricted to the provided loci.
    ///
    /// Loci not in the matrix are ignored.
    pub fn retain(&self, loci: &[Locus]) -> Self {
        let columns = loci
            .iter()
            .filter_map(|locus| self.loci.binary_search(locus).ok())
            .collect::<Vec<_>>();

        let samples = self
            .samples
            .iter()
            .map(|(sample, calls)| {
                let calls = columns.iter().map(|&column| calls[column]).collect();
                (sample.clone(), calls)
            })
            .collect();

        Self {
            samples,
            loci: columns.iter().map(|&column| self.loci[column]).collect(),
        }
    }

    /// Returns an iterator over the samples in input order.
    pub fn samples(&self) -> impl Iterator<Item = &str> {
        self.samples.keys().map(String::as_str)
    }

    fn check_header(&self, header: &str) {
        let dimensions = header
            .split_whitespace()
            .map(usize::from_str)
            .collect::<Result<Vec<_>, _>>();

        if let Ok(&[samples, loci]) = dimensions.as_deref() {
            if samples != self.samples.len() || loci != self.loci.len() {
                log::warn!(
                    "SNP matrix header declares {samples} samples and {loci} loci, \
                    but found {} samples and {} loci",
                    self.samples.len(),
                    self.loci.len()
                );
            }
        }
    }
}

fn parse_calls(sample: &str, genotypes: &str, line: usize) -> Result<Vec<Call>, FormatError> {
    genotypes
        .chars()
        .enumerate()
        .map(|(locus, c)| {
            Call::try_from(c).map_err(|_| FormatError::InvalidCall {
                sample: sample.to_string(),
                line,
                locus,
                call: c,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(s: &str) -> Result<Matrix, Error> {
        Matrix::read(s.as_bytes())
    }

    #[test]
    fn test_read() -> Result<(), Error> {
        let matrix = read("2 4\nsampleA ACGT\nsampleB acrt\n")?;

        assert_eq!(matrix.samples().collect::<Vec<_>>(), ["sampleA", "sampleB"]);
        assert_eq!(matrix.loci(), &[Locus(0), Locus(1), Locus(2), Locus(3)]);
        assert_eq!(
            matrix.get("sampleB"),
            Some(&[Call::A, Call::C, Call::R, Call::T][..])
        );
        assert!(matrix.contains("sampleA"));
        assert!(!matrix.contains("sampleC"));

        Ok(())
    }

    #[test]
    fn test_read_skips_blank_lines_and_extra_fields() -> Result<(), Error> {
        let matrix = read("header\n\nsampleA AC extra\n   \nsampleB GT\n")?;

        assert_eq!(matrix.samples().collect::<Vec<_>>(), ["sampleA", "sampleB"]);
        assert_eq!(matrix.loci().len(), 2);

        Ok(())
    }

    #[test]
    fn test_read_empty() {
        assert!(matches!(
            read(""),
            Err(Error::Format(FormatError::EmptyMatrix))
        ));
    }

    #[test]
    fn test_read_header_only() {
        assert!(matches!(
            read("0 0\n"),
            Err(Error::Format(FormatError::NoSamples))
        ));
    }

    #[test]
    fn test_read_ragged() {
        let result = read("2 4\nsampleA ACGT\nsampleB ACG\n");

        assert!(matches!(
            result,
            Err(Error::Format(FormatError::RaggedGenotypes {
                line: 3,
                expected: 4,
                found: 3,
                ..
            }))
        ));
    }

    #[test]
    fn test_read_missing_genotypes() {
        assert!(matches!(
            read("1 4\nsampleA\n"),
            Err(Error::Format(FormatError::MissingGenotypes { line: 2 }))
        ));
    }

    #[test]
    fn test_read_invalid_call() {
        let result = read("2 4\nsampleA ACGT\nsampleB ACXT\n");

        match result {
            Err(Error::Format(FormatError::InvalidCall {
                sample,
                line,
                locus,
                call,
            })) => {
                assert_eq!(sample, "sampleB");
                assert_eq!(line, 3);
                assert_eq!(locus, 2);
                assert_eq!(call, 'X');
            }
            result => panic!("unexpected result {result:?}"),
        }
    }

    #[test]
    fn test_read_duplicate_sample() {
        assert!(matches!(
            read("2 2\nsampleA AC\nsampleA GT\n"),
            Err(Error::Format(FormatError::DuplicateSample { line: 3, .. }))
        ));
    }

    #[test]
    fn test_retain_keeps_original_loci() -> Result<(), Error> {
        let matrix = read("2 4\nsampleA ACGT\nsampleB ACRT\n")?;

        let retained = matrix.retain(&[Locus(1), Locus(3)]);
        assert_eq!(retained.loci(), &[Locus(1), Locus(3)]);
        assert_eq!(retained.get("sampleA"), Some(&[Call::C, Call::T][..]));

        let retained = retained.retain(&[Locus(0), Locus(3)]);
        assert_eq!(retained.loci(), &[Locus(3)]);
        assert_eq!(retained.get("sampleB"), Some(&[Call::T][..]));

        Ok(())
    }

    #[test]
    fn test_locus_display() {
        assert_eq!(Locus(17).to_string(), "SNP_17");
    }
}
