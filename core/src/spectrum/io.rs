//! Utilities for reading and writing spectra.

pub mod dadi;
pub mod read;
pub mod text;
pub mod write;

use crate::array::npy;

/// Supported spectrum formats.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Format {
    /// Numpy binary npy format.
    Npy,
    /// Plain text format.
    Text,
    /// The plain text format used by dadi.
    Dadi,
}

impl Format {
    fn detect(bytes: &[u8]) -> Self {
        Self::detect_npy(bytes)
            .or_else(|| Self::detect_plain_text(bytes))
            .unwrap_or(Self::Dadi)
    }

    fn detect_npy(bytes: &[u8]) -> Option<Self> {
        bytes
            .starts_with(&npy::MAGIC)
            .then_some(Self::Npy)
    }

    fn detect_plain_text(bytes: &[u8]) -> Option<Self> {
        bytes
            .starts_with(&text::START)
            .then_some(Self::Text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_npy() {
        let mut bytes = npy::MAGIC.to_vec();
        bytes.extend(b"foobar");
        assert_eq!(Format::detect(&bytes), Format::Npy);
    }

    #[test]
    fn test_detect_plain_text() {
        let mut bytes = text::START.to_vec();
        bytes.extend(b"=<17/19>\n1 2 3");
        assert_eq!(Format::detect(&bytes), Format::Text);
    }

    #[test]
    fn test_detect_dadi() {
        assert_eq!(Format::detect(b"# comment\n3 unfolded\n1 2 3\n"), Format::Dadi);
        assert_eq!(Format::detect(b"3\n1 2 3\n"), Format::Dadi);
        assert_eq!(Format::detect(b""), Format::Dadi);
    }
}
