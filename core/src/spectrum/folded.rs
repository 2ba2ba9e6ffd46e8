use std::cmp::Ordering;

use crate::Array;

use super::Spectrum;

/// A folded spectrum.
///
/// Folding collapses each entry onto its mirror image, so that the spectrum is indexed by minor
/// rather than derived allele counts. Entries whose allele count sum lies above the midpoint are
/// folded away and hold no value.
///
/// If the unfolded spectrum is masked, an entry stays masked after folding if either it or its
/// mirror image was masked.
#[derive(Clone, Debug, PartialEq)]
pub struct Folded {
    array: Array<Option<f64>>,
    masked: Option<Vec<bool>>,
}

impl Folded {
    pub(super) fn from_spectrum(spectrum: &Spectrum) -> Self {
        let shape = spectrum.shape();
        let n = spectrum.elements();
        // Saturates for shapes with an empty axis, which have no elements to fold
        let total_count = shape.iter().sum::<usize>().saturating_sub(shape.len());
        let mid_count = total_count / 2;

        // With an even total count, some entries sit exactly on the folding line.
        // In 1D, five elements give [-, -, X, -, -], whereas four elements have no such entry.
        // In 2D, three-by-three elements have the anti-diagonal:
        // [-, -, X]
        // [-, X, -]
        // [X, -, -]
        let has_diagonal = total_count % 2 == 0;

        // Folding in place would let the reversed index read already folded values.
        let mut array = Array::from_element(None, shape.clone());

        let src = spectrum.array.as_slice();
        let dst = array.as_mut_slice();

        for (i, rev_i) in (0..n).zip((0..n).rev()) {
            let count = shape.index_sum_from_flat_unchecked(i);

            dst[i] = match (count.cmp(&mid_count), has_diagonal) {
                (Ordering::Less, _) | (Ordering::Equal, false) => Some(src[i] + src[rev_i]),
                // Same convention as dadi: the diagonal keeps the mean of both halves
                (Ordering::Equal, true) => Some(0.5 * src[i] + 0.5 * src[rev_i]),
                (Ordering::Greater, _) => None,
            };
        }

        let masked = spectrum
            .mask()
            .map(|mask| (0..n).map(|i| mask[i] || mask[n - 1 - i]).collect());

        Self { array, masked }
    }

    /// Returns the folded values, where `None` marks entries that were folded away.
    pub fn inner(&self) -> &Array<Option<f64>> {
        &self.array
    }

    /// Returns an unfolded spectrum based on the folded spectrum, filling the folded elements with
    /// the provided element.
    pub fn into_spectrum(&self, fill: f64) -> Spectrum {
        let data = Vec::from_iter(self.array.iter().map(|x| x.unwrap_or(fill)));
        let shape = self.array.shape().clone();

        Spectrum::from(Array::new_unchecked(data, shape))
    }

    /// Returns a mask where `true` marks entries that were folded away or masked.
    pub fn mask(&self) -> impl Iterator<Item = bool> + '_ {
        self.array.iter().enumerate().map(|(i, x)| {
            x.is_none() || self.masked.as_ref().map_or(false, |masked| masked[i])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_4() {
        let spectrum = Spectrum::from_range(0..4, 4).unwrap();
        let expected = Spectrum::new([3., 3., 0., 0.], 4).unwrap();
        assert_eq!(spectrum.fold().into_spectrum(0.0), expected);
    }

    #[test]
    fn test_fold_5() {
        let spectrum = Spectrum::from_range(0..5, 5).unwrap();
        let expected = Spectrum::new([4., 4., 2., -1., -1.], 5).unwrap();
        assert_eq!(spectrum.fold().into_spectrum(-1.), expected);
    }

    #[test]
    fn test_fold_3x3() {
        let spectrum = Spectrum::from_range(0..9, [3, 3]).unwrap();

        #[rustfmt::skip]
        let expected = Spectrum::new(
            [
                8., 8., 4.,
                8., 4., 0.,
                4., 0., 0.,
            ],
            [3, 3]
        ).unwrap();

        assert_eq!(spectrum.fold().into_spectrum(0.0), expected);
    }

    #[test]
    fn test_fold_2x4() {
        let spectrum = Spectrum::from_range(0..8, [2, 4]).unwrap();

        #[rustfmt::skip]
        let expected = Spectrum::new(
            [
                7., 7.,            3.5, f64::INFINITY,
                7., 3.5, f64::INFINITY, f64::INFINITY,
            ],
            [2, 4]
        ).unwrap();

        assert_eq!(spectrum.fold().into_spectrum(f64::INFINITY), expected);
    }

    #[test]
    fn test_fold_3x4() {
        let spectrum = Spectrum::from_range(0..12, [3, 4]).unwrap();

        #[rustfmt::skip]
        let expected = Spectrum::new(
            [
                11., 11., 11., 0.,
                11., 11.,  0., 0.,
                11.,  0.,  0., 0.,
            ],
            [3, 4]
        ).unwrap();

        assert_eq!(spectrum.fold().into_spectrum(0.), expected);
    }

    #[test]
    fn test_fold_2x3x2() {
        let spectrum = Spectrum::from_range(0..12, [2, 3, 2]).unwrap();

        #[rustfmt::skip]
        let expected = Spectrum::new(
            [
                11., 11.,
                11.,  5.5,
                5.5,  0.,

                11.,  5.5,
                 5.5, 0.,
                 0.,  0.,
            ],
            [2, 3, 2]
        ).unwrap();

        assert_eq!(spectrum.fold().into_spectrum(0.0), expected);
    }

    #[test]
    fn test_fold_empty_axis() {
        let spectrum = Spectrum::new(Vec::<f64>::new(), 0).unwrap();

        assert_eq!(spectrum.fold().inner().elements(), 0);
    }

    #[test]
    fn test_fold_keeps_mirrored_input_mask() {
        let spectrum = Spectrum::from_range(0..5, 5)
            .unwrap()
            .with_mask(vec![true, false, false, false, true])
            .unwrap();

        assert_eq!(
            spectrum.fold().mask().collect::<Vec<_>>(),
            vec![true, false, false, true, true]
        );

        let spectrum = Spectrum::from_range(0..6, 6)
            .unwrap()
            .with_mask(vec![false, true, false, false, false, false])
            .unwrap();

        assert_eq!(
            spectrum.fold().mask().collect::<Vec<_>>(),
            vec![false, true, false, true, true, true]
        );
    }

    #[test]
    fn test_fold_mask() {
        let spectrum = Spectrum::from_range(0..5, 5).unwrap();

        assert_eq!(
            spectrum.fold().mask().collect::<Vec<_>>(),
            vec![false, false, false, true, true]
        );
    }
}
