use std::{fmt, io};

/// An error associated with converting to Genepop.
#[derive(Debug)]
pub enum Error {
    /// Invalid or conflicting options.
    Configuration(ConfigurationError),
    /// Malformed input.
    Format(FormatError),
    /// I/O error.
    Io(io::Error),
}

impl From<ConfigurationError> for Error {
    fn from(e: ConfigurationError) -> Self {
        Self::Configuration(e)
    }
}

impl From<FormatError> for Error {
    fn from(e: FormatError) -> Self {
        Self::Format(e)
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Self {
        Self::Format(FormatError::Table(e))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Configuration(e) => write!(f, "{e}"),
            Error::Format(e) => write!(f, "{e}"),
            Error::Io(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for Error {}

/// An error associated with invalid or conflicting options.
#[derive(Debug, Eq, PartialEq)]
pub enum ConfigurationError {
    /// Both a population file and a population table were provided.
    ConflictingPopulationSources,
    /// A required column is not present in the population table.
    MissingTableColumn {
        /// The name of the missing column.
        column: String,
    },
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::ConflictingPopulationSources => {
                f.write_str("provide either a population file or a population table, not both")
            }
            ConfigurationError::MissingTableColumn { column } => {
                write!(f, "column '{column}' not found in population table")
            }
        }
    }
}

impl std::error::Error for ConfigurationError {}

/// An error associated with malformed input.
#[derive(Debug)]
pub enum FormatError {
    /// The SNP matrix contains no lines.
    EmptyMatrix,
    /// The SNP matrix contains a header but no samples.
    NoSamples,
    /// A matrix line contains a sample name but no genotypes.
    MissingGenotypes {
        /// The line number.
        line: usize,
    },
    /// A matrix line has a different number of genotype calls than the preceding lines.
    RaggedGenotypes {
        /// The sample name.
        sample: String,
        /// The line number.
        line: usize,
        /// The number of calls in preceding lines.
        expected: usize,
        /// The number of calls on this line.
        found: usize,
    },
    /// A matrix line contains an unrecognized genotype call.
    InvalidCall {
        /// The sample name.
        sample: String,
        /// The line number.
        line: usize,
        /// The zero-based locus index.
        locus: usize,
        /// The unrecognized character.
        call: char,
    },
    /// A sample name occurs more than once in the matrix.
    DuplicateSample {
        /// The sample name.
        sample: String,
        /// The line number of the repeated occurrence.
        line: usize,
    },
    /// A population file line does not consist of a population and a sample.
    InvalidPopulationLine {
        /// The line number.
        line: usize,
        /// The number of whitespace-separated fields found.
        fields: usize,
    },
    /// A sample is assigned to more than one population.
    ConflictingPopulations {
        /// The sample name.
        sample: String,
        /// The population first assigned.
        first: String,
        /// The population assigned later.
        second: String,
    },
    /// The population table could not be parsed.
    Table(csv::Error),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::EmptyMatrix => f.write_str("SNP matrix is empty"),
            FormatError::NoSamples => f.write_str("SNP matrix contains no samples"),
            FormatError::MissingGenotypes { line } => {
                write!(f, "line {line}: missing genotypes after sample name")
            }
            FormatError::RaggedGenotypes {
                sample,
                line,
                expected,
                found,
            } => write!(
                f,
                "line {line}: sample '{sample}' has {found} genotype calls, expected {expected}"
            ),
            FormatError::InvalidCall {
                sample,
                line,
                locus,
                call,
            } => write!(
                f,
                "line {line}: invalid genotype call '{call}' for sample '{sample}' at locus {locus}"
            ),
            FormatError::DuplicateSample { sample, line } => {
                write!(f, "line {line}: duplicate sample '{sample}'")
            }
            FormatError::InvalidPopulationLine { line, fields } => write!(
                f,
                "line {line}: expected a population and a sample, found {fields} fields"
            ),
            FormatError::ConflictingPopulations {
                sample,
                first,
                second,
            } => write!(
                f,
                "sample '{sample}' assigned to both population '{first}' and '{second}'"
            ),
            FormatError::Table(e) => write!(f, "failed to parse population table: {e}"),
        }
    }
}

impl std::error::Error for FormatError {}
