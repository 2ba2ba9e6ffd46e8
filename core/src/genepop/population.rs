//! Assignment of samples to populations.

use std::{
    collections::{hash_map::Entry, HashMap},
    fs::File,
    io,
    path::{Path, PathBuf},
};

use indexmap::{map, IndexMap, IndexSet};

use super::{ConfigurationError, Error, FormatError, Matrix};

/// The name of the single population used when no population assignment is provided.
pub const DEFAULT_POPULATION: &str = "ALLSAMPLES";

/// A source of population assignments.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Source {
    /// A whitespace-separated file with a population and a sample on each line.
    File(PathBuf),
    /// A CSV table with named sample and population columns.
    Table(Table),
    /// All samples in a single population.
    All,
}

impl Source {
    /// Creates a new source from optional population file and table options.
    ///
    /// # Errors
    ///
    /// If both a file and a table are provided.
    pub fn new(file: Option<PathBuf>, table: Option<Table>) -> Result<Self, ConfigurationError> {
        match (file, table) {
            (Some(_), Some(_)) => Err(ConfigurationError::ConflictingPopulationSources),
            (Some(path), None) => Ok(Self::File(path)),
            (None, Some(table)) => Ok(Self::Table(table)),
            (None, None) => Ok(Self::All),
        }
    }
}

/// A CSV population table and the names of its columns.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Table {
    /// The path to the table.
    pub path: PathBuf,
    /// The name of the column containing sample names.
    pub sample_field: String,
    /// The name of the column containing population names.
    pub population_field: String,
}

impl Table {
    /// Creates a new table using the default `sample` and `population` columns.
    pub fn new<P>(path: P) -> Self
    where
        P: AsRef<Path>,
    {
        Self {
            path: path.as_ref().to_path_buf(),
            sample_field: String::from("sample"),
            population_field: String::from("population"),
        }
    }
}

/// Named populations of samples.
///
/// Only samples present in the SNP matrix are members of a population. Samples in the matrix
/// without an assignment are not members of any population, and so are left out when writing.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Populations(IndexMap<String, IndexSet<String>>);

impl Populations {
    /// Creates a single population containing every sample in the matrix, sorted by name.
    pub fn from_all(matrix: &Matrix) -> Self {
        let mut samples = matrix.samples().map(String::from).collect::<Vec<_>>();
        samples.sort();

        let mut populations = IndexMap::new();
        populations.insert(
            String::from(DEFAULT_POPULATION),
            IndexSet::from_iter(samples),
        );

        Self(populations)
    }

    /// Creates populations from `(population, sample)` assignments.
    ///
    /// Populations and their members are kept in order of first assignment. Samples not in the
    /// matrix are skipped. A sample assigned to the same population more than once is kept once.
    ///
    /// # Errors
    ///
    /// If a sample is assigned to more than one population.
    pub fn from_assignments<I, P, S>(assignments: I, matrix: &Matrix) -> Result<Self, FormatError>
    where
        I: IntoIterator<Item = (P, S)>,
        P: Into<String>,
        S: Into<String>,
    {
        let mut populations: IndexMap<String, IndexSet<String>> = IndexMap::new();
        let mut assigned: HashMap<String, String> = HashMap::new();

        for (population, sample) in assignments {
            let (population, sample) = (population.into(), sample.into());

            if !matrix.contains(&sample) {
                log::debug!("Skipping sample '{sample}' not found in SNP matrix");
                continue;
            }

            match assigned.entry(sample.clone()) {
                Entry::Occupied(entry) if entry.get() == &population => {
                    log::debug!("Ignoring repeated assignment of sample '{sample}' to '{population}'");
                    continue;
                }
                Entry::Occupied(entry) => {
                    return Err(FormatError::ConflictingPopulations {
                        sample,
                        first: entry.get().clone(),
                        second: population,
                    });
                }
                Entry::Vacant(entry) => {
                    entry.insert(population.clone());
                }
            }

            populations.entry(population).or_default().insert(sample);
        }

        let unassigned = matrix
            .samples()
            .filter(|sample| !assigned.contains_key(*sample))
            .count();
        if unassigned > 0 {
            log::info!("Excluding {unassigned} samples without population assignment");
        }

        let populations = Self(populations);
        if populations.is_empty() {
            log::warn!("No sample in the SNP matrix was assigned to a population");
        }

        Ok(populations)
    }

    /// Creates populations from a source.
    pub fn from_source(source: &Source, matrix: &Matrix) -> Result<Self, Error> {
        match source {
            Source::File(path) => {
                let reader = io::BufReader::new(File::open(path)?);
                Self::read_file(reader, matrix)
            }
            Source::Table(table) => Self::read_table(
                File::open(&table.path)?,
                &table.sample_field,
                &table.population_field,
                matrix,
            ),
            Source::All => Ok(Self::from_all(matrix)),
        }
    }

    /// Returns the members of a population.
    pub fn get(&self, population: &str) -> Option<&IndexSet<String>> {
        self.0.get(population)
    }

    /// Returns `true` if there are no populations.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over populations and their members.
    pub fn iter(&self) -> map::Iter<'_, String, IndexSet<String>> {
        self.0.iter()
    }

    /// Returns the number of populations.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Reads populations from a population file.
    ///
    /// Each line holds a population name and a sample name, separated by whitespace.
    /// Blank lines and lines starting with `#` are skipped.
    pub fn read_file<R>(reader: R, matrix: &Matrix) -> Result<Self, Error>
    where
        R: io::BufRead,
    {
        let mut assignments = Vec::new();

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match line.split_whitespace().collect::<Vec<_>>().as_slice() {
                [population, sample] => {
                    assignments.push((population.to_string(), sample.to_string()))
                }
                fields => {
                    return Err(FormatError::InvalidPopulationLine {
                        line: i + 1,
                        fields: fields.len(),
                    }
                    .into())
                }
            }
        }

        Ok(Self::from_assignments(assignments, matrix)?)
    }

    /// Reads populations from a CSV table with a header.
    ///
    /// # Errors
    ///
    /// If the table lacks one of the named columns, or cannot be parsed.
    pub fn read_table<R>(
        reader: R,
        sample_field: &str,
        population_field: &str,
        matrix: &Matrix,
    ) -> Result<Self, Error>
    where
        R: io::Read,
    {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|header| header == name)
                .ok_or_else(|| ConfigurationError::MissingTableColumn {
                    column: name.to_string(),
                })
        };
        let sample_column = column(sample_field)?;
        let population_column = column(population_field)?;

        let assignments = reader
            .records()
            .map(|record| {
                record.map(|record| {
                    let field = |i| record.get(i).unwrap_or_default().to_string();
                    (field(population_column), field(sample_column))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::from_assignments(assignments, matrix)?)
    }
}

impl<'a> IntoIterator for &'a Populations {
    type Item = (&'a String, &'a IndexSet<String>);
    type IntoIter = map::Iter<'a, String, IndexSet<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(samples: &[&str]) -> Matrix {
        let s = samples
            .iter()
            .fold(String::from("header\n"), |s, sample| s + sample + " ACGT\n");

        Matrix::read(s.as_bytes()).unwrap()
    }

    fn members(populations: &Populations, population: &str) -> Vec<String> {
        populations
            .get(population)
            .map(|members| members.iter().cloned().collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_source_conflict() {
        let result = Source::new(
            Some(PathBuf::from("pops.txt")),
            Some(Table::new("pops.csv")),
        );

        assert_eq!(result, Err(ConfigurationError::ConflictingPopulationSources));
    }

    #[test]
    fn test_source_default() {
        assert_eq!(Source::new(None, None), Ok(Source::All));
    }

    #[test]
    fn test_from_all_sorted() {
        let populations = Populations::from_all(&matrix(&["c", "a", "b"]));

        assert_eq!(populations.len(), 1);
        assert_eq!(members(&populations, DEFAULT_POPULATION), ["a", "b", "c"]);
    }

    #[test]
    fn test_read_file() -> Result<(), Error> {
        let matrix = matrix(&["s1", "s2", "s3", "s4"]);
        let src = "# comment\npop2 s3\npop1 s1\n\npop2 s2\npop1 unknown\n";

        let populations = Populations::read_file(src.as_bytes(), &matrix)?;

        assert_eq!(
            populations.iter().map(|(name, _)| name.as_str()).collect::<Vec<_>>(),
            ["pop2", "pop1"]
        );
        assert_eq!(members(&populations, "pop2"), ["s3", "s2"]);
        assert_eq!(members(&populations, "pop1"), ["s1"]);

        // s4 is in the matrix but unassigned, so is not a member of any population
        assert!(populations
            .iter()
            .all(|(_, members)| !members.contains("s4")));

        Ok(())
    }

    #[test]
    fn test_read_file_invalid_line() {
        let matrix = matrix(&["s1"]);

        let result = Populations::read_file("pop1 s1\npop1 s1 extra\n".as_bytes(), &matrix);

        assert!(matches!(
            result,
            Err(Error::Format(FormatError::InvalidPopulationLine {
                line: 2,
                fields: 3
            }))
        ));
    }

    #[test]
    fn test_from_assignments_repeated() -> Result<(), FormatError> {
        let matrix = matrix(&["s1", "s2"]);

        let populations =
            Populations::from_assignments([("pop", "s1"), ("pop", "s2"), ("pop", "s1")], &matrix)?;

        assert_eq!(members(&populations, "pop"), ["s1", "s2"]);

        Ok(())
    }

    #[test]
    fn test_from_assignments_conflicting() {
        let matrix = matrix(&["s1"]);

        let result = Populations::from_assignments([("pop1", "s1"), ("pop2", "s1")], &matrix);

        assert!(matches!(
            result,
            Err(FormatError::ConflictingPopulations { .. })
        ));
    }

    #[test]
    fn test_from_assignments_none_in_matrix() -> Result<(), FormatError> {
        let matrix = matrix(&["s1"]);

        let populations = Populations::from_assignments([("pop1", "other")], &matrix)?;

        assert!(populations.is_empty());

        Ok(())
    }

    #[test]
    fn test_read_table() -> Result<(), Error> {
        let matrix = matrix(&["s1", "s2", "s3"]);
        let src = "id,site,region\ns2,x,north\ns1,y,south\ns9,z,north\ns3,w,north\n";

        let populations = Populations::read_table(src.as_bytes(), "id", "region", &matrix)?;

        assert_eq!(members(&populations, "north"), ["s2", "s3"]);
        assert_eq!(members(&populations, "south"), ["s1"]);

        Ok(())
    }

    #[test]
    fn test_read_table_missing_column() {
        let matrix = matrix(&["s1"]);
        let src = "sample,pop\ns1,a\n";

        let result = Populations::read_table(src.as_bytes(), "sample", "population", &matrix);

        match result {
            Err(Error::Configuration(e)) => assert_eq!(
                e,
                ConfigurationError::MissingTableColumn {
                    column: String::from("population")
                }
            ),
            result => panic!("unexpected result {result:?}"),
        }
    }

    #[test]
    fn test_read_table_ragged_row() {
        let matrix = matrix(&["s1"]);
        let src = "sample,population\ns1,a,extra\n";

        let result = Populations::read_table(src.as_bytes(), "sample", "population", &matrix);

        assert!(matches!(result, Err(Error::Format(FormatError::Table(_)))));
    }
}
