use std::fmt;

/// A single genotype call in an unlinked SNP matrix.
///
/// Calls are either one of the four bases, one of the six two-base IUPAC ambiguity codes
/// representing heterozygotes, or missing.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Call {
    /// Homozygous A.
    A,
    /// Homozygous C.
    C,
    /// Homozygous G.
    G,
    /// Homozygous T.
    T,
    /// Heterozygous A/G.
    R,
    /// Heterozygous G/T.
    K,
    /// Heterozygous C/G.
    S,
    /// Heterozygous C/T.
    Y,
    /// Heterozygous A/T.
    W,
    /// Heterozygous A/C.
    M,
    /// Missing data, written as `N` or `-`.
    Missing,
}

impl Call {
    /// Returns the six-digit Genepop encoding of the call.
    ///
    /// Each allele is encoded by three digits, A=001, C=002, G=003, T=004, and missing data by
    /// 000. The order of alleles in heterozygotes is fixed.
    pub fn as_genepop(&self) -> &'static str {
        match self {
            Call::A => "001001",
            Call::C => "002002",
            Call::G => "003003",
            Call::T => "004004",
            Call::R => "003001",
            Call::K => "003004",
            Call::S => "003002",
            Call::Y => "004002",
            Call::W => "004001",
            Call::M => "002001",
            Call::Missing => "000000",
        }
    }

    /// Returns `true` if the call is missing.
    pub fn is_missing(&self) -> bool {
        matches!(self, Call::Missing)
    }
}

impl TryFrom<char> for Call {
    type Error = ParseCallError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c.to_ascii_uppercase() {
            'A' => Ok(Call::A),
            'C' => Ok(Call::C),
            'G' => Ok(Call::G),
            'T' => Ok(Call::T),
            'R' => Ok(Call::R),
            'K' => Ok(Call::K),
            'S' => Ok(Call::S),
            'Y' => Ok(Call::Y),
            'W' => Ok(Call::W),
            'M' => Ok(Call::M),
            'N' | '-' => Ok(Call::Missing),
            _ => Err(ParseCallError(c)),
        }
    }
}

/// Returns the six-digit Genepop encoding of a case-insensitive genotype character.
pub fn to_genepop(c: char) -> Result<&'static str, ParseCallError> {
    Call::try_from(c).map(|call| call.as_genepop())
}

/// An error associated with parsing a genotype call from an unrecognized character.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ParseCallError(pub char);

impl fmt::Display for ParseCallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid genotype call '{}'", self.0)
    }
}

impl std::error::Error for ParseCallError {}
