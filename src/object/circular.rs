use itertools::izip;

use super::Object;

/// A type describing an object that is circular in each dimension (e.g. circle, sphere).
#[derive(Clone, Debug)]
pub struct Circular<const D: usize> {
    /// Position
    pos: [f64; D],
    /// Radius squared.
    rxr: f64,
    /// Characteristic length.
    characteristic_length: f64,
}

impl<const D: usize> Circular<D> {
    /// Create a new `Circular`.
    pub fn new(pos: [f64; D], r: f64) -> Self {
        Self {
            pos,
            rxr: r * r,
            characteristic_length: r + r,
        }
    }
}

impl<const D: usize> Object<D> for Circular<D> {
    fn characteristic_length(&self) -> f64 {
        self.characteristic_length
    }

    /// Strictly inside: positions at exactly the radius are not contained.
    fn contains(&self, pos: &[f64; D]) -> bool {
        izip!(pos, self.pos).fold(0.0, |acc, (first, second)| {
            let d = first - second;
            acc + d * d
        }) < self.rxr
    }
}
