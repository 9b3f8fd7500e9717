/// Scalar value per lattice position, stored row by row.
#[derive(Clone, Debug, PartialEq)]
pub struct ScalarField {
    size: [usize; 2],
    // note: flat vectors reduce cache loads
    values: Vec<f64>,
}

impl ScalarField {
    /// Create a `ScalarField` filled with zeros.
    pub fn new(size: &[usize; 2]) -> Self {
        Self {
            size: *size,
            values: vec![0.0; size[0] * size[1]],
        }
    }

    /// Create a `ScalarField` from a value function of the lattice position.
    pub fn from_fn(size: &[usize; 2], mut f: impl FnMut([usize; 2]) -> f64) -> Self {
        let mut values = Vec::with_capacity(size[0] * size[1]);
        for y in 0..size[1] {
            for x in 0..size[0] {
                values.push(f([x, y]));
            }
        }
        Self {
            size: *size,
            values,
        }
    }

    /// Width and height.
    pub fn size(&self) -> [usize; 2] {
        self.size
    }

    /// Value at lattice position.
    pub fn get(&self, pos: &[usize; 2]) -> f64 {
        self.values[self.size[0] * pos[1] + pos[0]]
    }

    /// All values, row by row.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Minimum and maximum value, `None` for an empty field.
    pub fn range(&self) -> Option<(f64, f64)> {
        self.values.iter().fold(None, |acc, &val| match acc {
            None => Some((val, val)),
            Some((min, max)) => Some((min.min(val), max.max(val))),
        })
    }
}
