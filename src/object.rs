pub mod circular;
pub mod mask;

pub trait Object<const D: usize> {
    /// The [characteristic length](https://en.wikipedia.org/wiki/Characteristic_length) of the object.
    fn characteristic_length(&self) -> f64;

    /// Calculate whether the object contains a position.
    fn contains(&self, pos: &[f64; D]) -> bool;
}
