use std::path::PathBuf;

use anyhow::{Context, Error};

use clap::Parser;

use pgtk_core::genepop::{
    self,
    population::{Source, Table},
    retained_loci, Matrix, Populations,
};

/// Convert unlinked SNP matrix to Genepop.
#[derive(Debug, Parser)]
#[clap(name = crate::NAME, about)]
pub struct Genepop {
    /// Input unlinked SNP matrix.
    ///
    /// The first line is a header, and each following line holds a sample name and a string of
    /// IUPAC genotype calls, one per locus. Gzipped input is supported.
    #[arg(short = 'u', long = "unlinked-snps", value_name = "PATH")]
    input: PathBuf,

    /// Population file.
    ///
    /// Each line should contain a population name and a sample name, separated by whitespace.
    /// Samples not in the population file are left out of the output. By default, all samples
    /// are placed in a single population.
    #[arg(short = 'p', long, conflicts_with = "table", value_name = "PATH")]
    popfile: Option<PathBuf>,

    /// Population table.
    ///
    /// A CSV file with a header, containing sample and population columns named by
    /// --sample-field and --population-field. Samples not in the table are left out of the
    /// output.
    #[arg(short = 't', long, conflicts_with = "popfile", value_name = "PATH")]
    table: Option<PathBuf>,

    /// Name of the sample column in the population table.
    #[arg(short = 's', long, default_value = "sample", value_name = "NAME")]
    sample_field: String,

    /// Name of the population column in the population table.
    #[arg(short = 'g', long, default_value = "population", value_name = "NAME")]
    population_field: String,

    /// Append population names to sample names.
    #[arg(short = 'a', long = "append-pop-names")]
    append_population_names: bool,

    /// Only keep loci with data in every population.
    #[arg(short = 'f', long)]
    filter: bool,

    /// Output Genepop path.
    ///
    /// By default, the output is written to the working directory, using the input file name up
    /// to its first '.' with a '.gen' extension.
    #[arg(short = 'o', long, value_name = "PATH")]
    output: Option<PathBuf>,
}

impl Genepop {
    fn source(&self) -> Result<Source, Error> {
        let table = self.table.as_ref().map(|path| Table {
            path: path.clone(),
            sample_field: self.sample_field.clone(),
            population_field: self.population_field.clone(),
        });

        Ok(Source::new(self.popfile.clone(), table)?)
    }

    pub fn run(self) -> Result<(), Error> {
        let source = self.source()?;

        let matrix = Matrix::from_path(&self.input).with_context(|| {
            format!("failed to read SNP matrix '{}'", self.input.display())
        })?;

        let populations =
            Populations::from_source(&source, &matrix).with_context(|| match &source {
                Source::File(path) => {
                    format!("failed to read population file '{}'", path.display())
                }
                Source::Table(table) => {
                    format!("failed to read population table '{}'", table.path.display())
                }
                Source::All => String::from("failed to group samples"),
            })?;
        log::info!("Grouped samples into {} populations", populations.len());

        let matrix = if self.filter {
            matrix.retain(&retained_loci(&matrix, &populations))
        } else {
            matrix
        };

        let output = self
            .output
            .unwrap_or_else(|| genepop::output_path(&self.input));

        genepop::write::Builder::new(genepop::source_name(&self.input))
            .set_append_population_names(self.append_population_names)
            .write_to_path(&output, &matrix, &populations)
            .with_context(|| format!("failed to write Genepop file '{}'", output.display()))?;

        log::info!("Wrote Genepop file '{}'", output.display());

        Ok(())
    }
}
