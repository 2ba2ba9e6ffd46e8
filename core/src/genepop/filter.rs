use super::{Locus, Matrix, Populations};

/// Returns the loci with at least one non-missing call in every population.
///
/// Only population members are considered. Loci are returned in matrix order.
pub fn retained_loci(matrix: &Matrix, populations: &Populations) -> Vec<Locus> {
    let members = populations
        .iter()
        .map(|(_, samples)| {
            samples
                .iter()
                .filter_map(|sample| matrix.get(sample))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    let retained = matrix
        .loci()
        .iter()
        .enumerate()
        .filter(|(column, _)| {
            members.iter().all(|population| {
                population
                    .iter()
                    .any(|calls| !calls[*column].is_missing())
            })
        })
        .map(|(_, &locus)| locus)
        .collect::<Vec<_>>();

    log::info!(
        "Retaining {} of {} loci with data in every population",
        retained.len(),
        matrix.loci().len()
    );

    retained
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retained_loci() {
        let matrix = Matrix::read("4 4\na1 NACN\na2 -NCN\nb1 ANNA\nb2 ANCN\n".as_bytes()).unwrap();
        let populations = Populations::from_assignments(
            [("A", "a1"), ("A", "a2"), ("B", "b1"), ("B", "b2")],
            &matrix,
        )
        .unwrap();

        assert_eq!(retained_loci(&matrix, &populations), [Locus(2)]);
    }

    #[test]
    fn test_retained_loci_ignores_unassigned() {
        let matrix = Matrix::read("3 2\na1 AN\nb1 AN\nc1 AC\n".as_bytes()).unwrap();
        let populations =
            Populations::from_assignments([("A", "a1"), ("B", "b1")], &matrix).unwrap();

        assert_eq!(retained_loci(&matrix, &populations), [Locus(0)]);
    }

    #[test]
    fn test_retained_loci_keeps_original_indices() {
        let matrix = Matrix::read("1 3\na1 ANC\n".as_bytes()).unwrap();
        let populations = Populations::from_all(&matrix);

        let matrix = matrix.retain(&retained_loci(&matrix, &populations));

        assert_eq!(matrix.loci(), [Locus(0), Locus(2)]);
        assert_eq!(retained_loci(&matrix, &populations), [Locus(0), Locus(2)]);
    }
}
