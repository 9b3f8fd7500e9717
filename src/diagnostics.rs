//! Read-only view of the macroscopic state for visualisation consumers.

use crate::field::ScalarField;
use crate::lbgk::macroscopic::MacroscopicFields;
use crate::linear_algebra::VectorOps;

/// Density and velocity after streaming and obstacle correction of one
/// iteration, before collision.
#[derive(Clone, Copy)]
pub struct Snapshot<'a> {
    iteration: usize,
    fields: &'a MacroscopicFields,
}

impl<'a> Snapshot<'a> {
    pub(crate) fn new(iteration: usize, fields: &'a MacroscopicFields) -> Self {
        Self { iteration, fields }
    }

    /// Index of the iteration that produced the snapshot, starting at zero.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Width and height.
    pub fn size(&self) -> [usize; 2] {
        self.fields.size()
    }

    /// Density at lattice position.
    pub fn density(&self, pos: &[usize; 2]) -> f64 {
        self.fields.get(pos).density
    }

    /// Velocity vector at lattice position.
    pub fn velocity_vector(&self, pos: &[usize; 2]) -> [f64; 2] {
        self.fields.get(pos).velocity_vector
    }

    /// Velocity at lattice position.
    pub fn velocity(&self, pos: &[usize; 2]) -> f64 {
        self.velocity_vector(pos).norm()
    }

    pub fn density_field(&self) -> ScalarField {
        ScalarField::from_fn(&self.size(), |pos| self.density(&pos))
    }

    /// Velocity magnitude of every cell.
    pub fn velocity_magnitude(&self) -> ScalarField {
        ScalarField::from_fn(&self.size(), |pos| self.velocity(&pos))
    }

    /// Discrete curl of the interior cells, `(Nx - 2) x (Ny - 2)`:
    /// `(ux[y+1][x] - ux[y-1][x]) - (uy[y][x+1] - uy[y][x-1])`.
    pub fn curl(&self) -> ScalarField {
        let [width, height] = self.size();
        if width < 3 || height < 3 {
            return ScalarField::new(&[0, 0]);
        }
        ScalarField::from_fn(&[width - 2, height - 2], |[x, y]| {
            let (x, y) = (x + 1, y + 1);
            let dux = self.velocity_vector(&[x, y + 1])[0] - self.velocity_vector(&[x, y - 1])[0];
            let duy = self.velocity_vector(&[x + 1, y])[1] - self.velocity_vector(&[x - 1, y])[1];
            dux - duy
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lbgk::macroscopic::Moments;

    use approx::assert_abs_diff_eq;

    #[test]
    fn test_velocity_magnitude() {
        let fields = MacroscopicFields::from_fn(&[3, 2], |[x, y]| Moments {
            density: 1.0,
            velocity_vector: [3.0 * x as f64, 4.0 * y as f64],
        });
        let snapshot = Snapshot::new(0, &fields);
        let magnitude = snapshot.velocity_magnitude();
        assert_eq!(magnitude.size(), [3, 2]);
        assert_abs_diff_eq!(magnitude.get(&[1, 1]), 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(magnitude.get(&[2, 0]), 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_curl_of_shear_and_rotation() {
        // ux = y, uy = 2x
        let fields = MacroscopicFields::from_fn(&[5, 4], |[x, y]| Moments {
            density: 1.0,
            velocity_vector: [y as f64, 2.0 * x as f64],
        });
        let curl = Snapshot::new(0, &fields).curl();
        assert_eq!(curl.size(), [3, 2]);
        for value in curl.values() {
            assert_abs_diff_eq!(*value, 2.0 - 4.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_curl_of_thin_grid_is_empty() {
        let fields = MacroscopicFields::from_fn(&[5, 2], |_| Moments::default());
        let curl = Snapshot::new(0, &fields).curl();
        assert_eq!(curl.size(), [0, 0]);
        assert!(curl.values().is_empty());
    }
}
