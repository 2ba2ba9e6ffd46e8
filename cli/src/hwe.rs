use std::{fs::File, io, path::PathBuf};

use anyhow::{Context, Error};

use clap::Parser;

use pgtk_core::hwe;

/// Filter loci by Hardy-Weinberg equilibrium tests.
///
/// Drops every locus with at least one site whose LRT statistic is significant at the given
/// p-value, and writes the remaining sites.
#[derive(Debug, Parser)]
#[clap(name = crate::NAME, about)]
pub struct HweFilter {
    /// Per-site LRT statistics in npy format.
    #[arg(long, default_value = "hwe.lrt.sites.npy", value_name = "PATH")]
    lrt: PathBuf,

    /// Site names, one '<locus>_<site>' per line, in the same order as the LRT statistics.
    #[arg(long, default_value = "hwe.sites", value_name = "PATH")]
    sites: PathBuf,

    /// Significance level.
    ///
    /// Must lie strictly between 0 and 1.
    #[arg(long, default_value_t = 0.05, value_name = "FLOAT")]
    pvalue: f64,

    /// Output path for the sites of retained loci.
    #[arg(short = 'o', long, default_value = "include_sites.txt", value_name = "PATH")]
    output: PathBuf,
}

impl HweFilter {
    pub fn run(self) -> Result<(), Error> {
        let threshold = hwe::threshold(self.pvalue)?;
        log::debug!("Using LRT threshold {threshold} for p-value {}", self.pvalue);

        let statistics = File::open(&self.lrt)
            .map(io::BufReader::new)
            .map_err(hwe::Error::from)
            .and_then(hwe::read_statistics)
            .with_context(|| format!("failed to read LRT statistics '{}'", self.lrt.display()))?;

        let sites = File::open(&self.sites)
            .map(io::BufReader::new)
            .map_err(hwe::Error::from)
            .and_then(hwe::read_sites)
            .with_context(|| format!("failed to read sites '{}'", self.sites.display()))?;

        let filtered = hwe::filter(sites, &statistics, threshold)?;

        hwe::write_sites_to_path(&self.output, &filtered.sites)
            .with_context(|| format!("failed to write sites '{}'", self.output.display()))?;

        println!("Loci filtered:");
        println!("{}", hwe::format_loci(&filtered.loci));

        Ok(())
    }
}
