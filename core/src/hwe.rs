//! Filtering of loci by per-site Hardy-Weinberg equilibrium likelihood ratio tests.
//!
//! Each site is named `<locus>_<site>`, and carries a likelihood ratio test (LRT) statistic.
//! A locus is filtered out if any of its sites has a statistic above the `1 - p` quantile of
//! the chi-squared distribution with one degree of freedom.

use std::{cmp::Ordering, fmt, io, path::Path, str::FromStr};

use indexmap::IndexSet;
use statrs::distribution::{ChiSquared, ContinuousCDF};

use crate::{utils, Array};

/// A named site.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Site {
    fields: Vec<String>,
}

impl Site {
    /// Returns the locus of the site.
    pub fn locus(&self) -> &str {
        &self.fields[0]
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fields.join("\t"))
    }
}

impl FromStr for Site {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(Error::EmptySite);
        }

        Ok(Self {
            fields: s.split('_').map(String::from).collect(),
        })
    }
}

/// Reads sites from a reader, one per line.
pub fn read_sites<R>(reader: R) -> Result<Vec<Site>, Error>
where
    R: io::BufRead,
{
    reader
        .lines()
        .enumerate()
        .map(|(i, line)| {
            line?.trim_end().parse::<Site>().map_err(|e| match e {
                Error::EmptySite => Error::EmptySiteLine { line: i + 1 },
                e => e,
            })
        })
        .collect()
}

/// Reads LRT statistics from a reader in npy format.
///
/// The statistics are read in row-major order, regardless of the shape of the array.
pub fn read_statistics<R>(reader: R) -> Result<Vec<f64>, Error>
where
    R: io::BufRead,
{
    Ok(Array::read_npy(reader)?.into_vec())
}

/// Returns the LRT statistic threshold corresponding to a p-value.
///
/// # Errors
///
/// If the p-value does not lie strictly between 0 and 1.
pub fn threshold(pvalue: f64) -> Result<f64, Error> {
    if !(pvalue > 0.0 && pvalue < 1.0) {
        return Err(Error::InvalidPValue { pvalue });
    }

    let distribution = ChiSquared::new(1.0).map_err(Error::Distribution)?;

    Ok(distribution.inverse_cdf(1.0 - pvalue))
}

/// The result of filtering sites.
#[derive(Clone, Debug, PartialEq)]
pub struct Filtered {
    /// The sites of retained loci, in input order.
    pub sites: Vec<Site>,
    /// The filtered loci, sorted by [`compare_loci`].
    pub loci: Vec<String>,
}

/// Filters sites by locus.
///
/// All sites of a locus are dropped if the statistic of any site of the locus is greater than the
/// threshold. NaN statistics never exceed the threshold.
///
/// # Errors
///
/// If the number of sites and statistics differ.
pub fn filter(sites: Vec<Site>, statistics: &[f64], threshold: f64) -> Result<Filtered, Error> {
    if sites.len() != statistics.len() {
        return Err(Error::LengthMismatch {
            sites: sites.len(),
            statistics: statistics.len(),
        });
    }

    let filtered = sites
        .iter()
        .zip(statistics)
        .filter(|(_, &statistic)| statistic > threshold)
        .map(|(site, _)| site.locus().to_string())
        .collect::<IndexSet<_>>();

    let sites = sites
        .into_iter()
        .filter(|site| !filtered.contains(site.locus()))
        .collect::<Vec<_>>();

    let mut loci = filtered.into_iter().collect::<Vec<_>>();
    loci.sort_by(|a, b| compare_loci(a, b));

    log::info!(
        "Filtered {} loci, retaining {} sites",
        loci.len(),
        sites.len()
    );

    Ok(Filtered { sites, loci })
}

/// Compares locus names, ordering numeric names numerically before other names in lexical order.
pub fn compare_loci(a: &str, b: &str) -> Ordering {
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Formats locus names as a bracketed, comma-separated list.
pub fn format_loci(loci: &[String]) -> String {
    format!("[{}]", loci.join(", "))
}

/// Writes sites to a writer, one per line with fields separated by tabs.
pub fn write_sites<W>(writer: &mut W, sites: &[Site]) -> io::Result<()>
where
    W: io::Write,
{
    sites.iter().try_for_each(|site| writeln!(writer, "{site}"))
}

/// Writes sites to a path.
///
/// The path is only touched once all sites have been written.
pub fn write_sites_to_path<P>(path: P, sites: &[Site]) -> io::Result<()>
where
    P: AsRef<Path>,
{
    utils::write_atomically(path, |writer| write_sites(writer, sites))
}

/// An error associated with site filtering.
#[derive(Debug)]
pub enum Error {
    /// The chi-squared distribution could not be constructed.
    Distribution(statrs::StatsError),
    /// Empty site name.
    EmptySite,
    /// Empty site name on a line of the sites file.
    EmptySiteLine {
        /// The line number.
        line: usize,
    },
    /// The p-value does not lie strictly between 0 and 1.
    InvalidPValue {
        /// The p-value.
        pvalue: f64,
    },
    /// I/O error.
    Io(io::Error),
    /// The number of sites differs from the number of statistics.
    LengthMismatch {
        /// The number of sites.
        sites: usize,
        /// The number of statistics.
        statistics: usize,
    },
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Distribution(e) => write!(f, "{e}"),
            Error::EmptySite => f.write_str("empty site name"),
            Error::EmptySiteLine { line } => write!(f, "line {line}: empty site name"),
            Error::InvalidPValue { pvalue } => {
                write!(f, "p-value must lie strictly between 0 and 1, found {pvalue}")
            }
            Error::Io(e) => write!(f, "{e}"),
            Error::LengthMismatch { sites, statistics } => write!(
                f,
                "number of sites ({sites}) does not match number of LRT statistics ({statistics})"
            ),
        }
    }
}

impl std::error::Error for Error {}
