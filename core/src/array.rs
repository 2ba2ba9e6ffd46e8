//! N-dimensional arrays backing spectra and per-site statistics.

use std::{fmt, io};

pub mod npy;

pub mod shape;
pub use shape::Shape;

/// A dense, row-major N-dimensional array.
#[derive(Clone, Debug, PartialEq)]
pub struct Array<T> {
    data: Vec<T>,
    shape: Shape,
}

impl<T> Array<T> {
    /// Returns the underlying data as a mutable slice in row-major order.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.data.as_mut_slice()
    }

    /// Returns the underlying data as a slice in row-major order.
    pub fn as_slice(&self) -> &[T] {
        self.data.as_slice()
    }

    /// Returns the number of dimensions.
    pub fn dimensions(&self) -> usize {
        self.shape.len()
    }

    /// Returns the total number of elements.
    pub fn elements(&self) -> usize {
        self.data.len()
    }

    /// Creates a new array filled with a single element.
    pub fn from_element<S>(element: T, shape: S) -> Self
    where
        T: Clone,
        Shape: From<S>,
    {
        let shape = Shape::from(shape);
        let elements = shape.elements();

        Self::new_unchecked::<_, Shape>(vec![element; elements], shape)
    }

    /// Creates a new array from an iterator in row-major order.
    pub fn from_iter<I, S>(iter: I, shape: S) -> Result<Self, ShapeError>
    where
        I: IntoIterator<Item = T>,
        Shape: From<S>,
    {
        Self::new(Vec::from_iter(iter), shape)
    }

    /// Consumes the array, returning the underlying data.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Returns an iterator over the elements in row-major order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Creates a new array, checking that the data fits the shape.
    pub fn new<D, S>(data: D, shape: S) -> Result<Self, ShapeError>
    where
        Vec<T>: From<D>,
        Shape: From<S>,
    {
        let data = Vec::from(data);
        let shape = Shape::from(shape);

        if data.len() == shape.elements() {
            Ok(Array::new_unchecked::<Vec<T>, Shape>(data, shape))
        } else {
            Err(ShapeError::new(shape, data.len()))
        }
    }

    /// Creates a new array without checking that the data fits the shape.
    pub fn new_unchecked<D, S>(data: D, shape: S) -> Self
    where
        Vec<T>: From<D>,
        Shape: From<S>,
    {
        Self {
            data: Vec::from(data),
            shape: Shape::from(shape),
        }
    }

    /// Returns the shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }
}

impl Array<f64> {
    /// Reads an array in npy format.
    pub fn read_npy<R>(mut reader: R) -> io::Result<Self>
    where
        R: io::BufRead,
    {
        npy::read_array(&mut reader)
    }

    /// Writes the array in npy format.
    pub fn write_npy<W>(&self, mut writer: W) -> io::Result<()>
    where
        W: io::Write,
    {
        npy::write_array(&mut writer, self)
    }
}

/// An error associated with an array shape that does not fit the number of elements.
#[derive(Debug)]
pub struct ShapeError {
    shape: Shape,
    n: usize,
}

impl ShapeError {
    pub(crate) fn new(shape: Shape, n: usize) -> Self {
        Self { shape, n }
    }
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ShapeError { shape, n } = self;
        write!(
            f,
            "cannot construct array with shape {shape} from {n} elements"
        )
    }
}

impl std::error::Error for ShapeError {}
