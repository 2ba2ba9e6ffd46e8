use std::{fmt, ops::Deref};

/// The shape of an [`Array`](super::Array).
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Shape(pub Vec<usize>);

impl Shape {
    /// Returns the number of elements an array with this shape holds.
    pub fn elements(&self) -> usize {
        self.iter().product()
    }

    pub(crate) fn index_sum_from_flat_unchecked(&self, mut flat: usize) -> usize {
        let mut n = self.elements();
        let mut sum = 0;
        for v in self.iter() {
            n /= v;
            sum += flat / n;
            flat %= n;
        }
        sum
    }
}

impl AsRef<[usize]> for Shape {
    fn as_ref(&self) -> &[usize] {
        self
    }
}

impl Deref for Shape {
    type Target = [usize];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<usize>> for Shape {
    fn from(shape: Vec<usize>) -> Self {
        Self(shape)
    }
}

impl From<usize> for Shape {
    fn from(n: usize) -> Self {
        Self(vec![n])
    }
}

impl<const N: usize> From<[usize; N]> for Shape {
    fn from(shape: [usize; N]) -> Self {
        Self(shape.to_vec())
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.split_first() {
            Some((first, rest)) => {
                write!(f, "{first}")?;
                for v in rest {
                    write!(f, "/{v}")?;
                }
                Ok(())
            }
            None => Ok(()),
        }
    }
}
