use itertools::izip;

pub trait VectorOps<const D: usize> {
    /// Vector [dot product](https://en.wikipedia.org/wiki/Dot_product).
    fn dot_product(&self, other: &[f64; D]) -> f64;

    /// Euclidean norm.
    fn norm(&self) -> f64 {
        self.squared_norm().sqrt()
    }

    /// Squared Euclidean norm.
    fn squared_norm(&self) -> f64;
}

impl<const D: usize> VectorOps<D> for [f64; D] {
    fn dot_product(&self, other: &[f64; D]) -> f64 {
        izip!(self, other).fold(0.0, |acc, (first, second)| acc + first * second)
    }

    fn squared_norm(&self) -> f64 {
        self.dot_product(self)
    }
}

/// Lattice vector as floating point components.
pub fn to_float<const D: usize>(c: &[isize; D]) -> [f64; D] {
    c.map(|val| val as f64)
}
