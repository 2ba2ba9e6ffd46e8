//! Site frequency spectra.

use std::ops::Range;

mod folded;
pub use folded::Folded;

pub mod io;

use crate::array::{Array, Shape, ShapeError};

/// A site frequency spectrum backed by an N-dimensional [`Array`].
///
/// Each axis corresponds to a population, and the index along an axis gives the derived allele
/// count in that population. A spectrum may hold counts or frequencies; folding treats both alike.
///
/// A spectrum may carry a mask, where `true` marks entries that should not be treated as data.
#[derive(Clone, Debug, PartialEq)]
pub struct Spectrum {
    array: Array<f64>,
    mask: Option<Vec<bool>>,
}

impl Spectrum {
    /// Returns the number of dimensions (populations).
    pub fn dimensions(&self) -> usize {
        self.array.dimensions()
    }

    /// Returns the number of elements.
    pub fn elements(&self) -> usize {
        self.array.elements()
    }

    /// Returns the folded spectrum.
    ///
    /// See [`Folded`] for details.
    pub fn fold(&self) -> Folded {
        Folded::from_spectrum(self)
    }

    /// Returns the underlying array.
    pub fn inner(&self) -> &Array<f64> {
        &self.array
    }

    /// Returns the mask in row-major order, if any.
    pub fn mask(&self) -> Option<&[bool]> {
        self.mask.as_deref()
    }

    /// Returns the spectrum with the provided mask in row-major order.
    ///
    /// # Errors
    ///
    /// If the mask does not have one entry per element.
    pub fn with_mask(self, mask: Vec<bool>) -> Result<Self, ShapeError> {
        if mask.len() == self.elements() {
            Ok(Self {
                mask: Some(mask),
                ..self
            })
        } else {
            Err(ShapeError::new(self.shape().clone(), mask.len()))
        }
    }

    /// Creates a new spectrum from data in row-major order.
    pub fn new<D, S>(data: D, shape: S) -> Result<Self, ShapeError>
    where
        Vec<f64>: From<D>,
        Shape: From<S>,
    {
        Array::new(data, shape).map(Self::from)
    }

    /// Creates a new spectrum with values taken from a range.
    pub fn from_range<S>(range: Range<usize>, shape: S) -> Result<Self, ShapeError>
    where
        Shape: From<S>,
    {
        Array::from_iter(range.map(|v| v as f64), shape).map(Self::from)
    }

    /// Returns the shape.
    pub fn shape(&self) -> &Shape {
        self.array.shape()
    }
}

impl From<Array<f64>> for Spectrum {
    fn from(array: Array<f64>) -> Self {
        Self { array, mask: None }
    }
}
