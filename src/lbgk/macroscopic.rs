use super::distribution::DistributionField;
use super::velocity_set::VelocitySet;
use crate::object::mask::ObstacleMask;

use itertools::izip;
use rayon::prelude::*;

/// Density and velocity of a cell.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Moments {
    pub density: f64,
    pub velocity_vector: [f64; 2],
}

/// Macroscopic moments of every cell, overwritten each iteration.
#[derive(Clone, Debug)]
pub struct MacroscopicFields {
    size: [usize; 2],
    moments: Vec<Moments>,
}

impl MacroscopicFields {
    pub fn new(size: &[usize; 2]) -> Self {
        Self {
            size: *size,
            moments: vec![Moments::default(); size[0] * size[1]],
        }
    }

    #[cfg(test)]
    pub(crate) fn from_fn(size: &[usize; 2], mut f: impl FnMut([usize; 2]) -> Moments) -> Self {
        let moments = itertools::iproduct!(0..size[1], 0..size[0])
            .map(|(y, x)| f([x, y]))
            .collect();
        Self {
            size: *size,
            moments,
        }
    }

    /// Width and height.
    pub fn size(&self) -> [usize; 2] {
        self.size
    }

    /// Moments at lattice position.
    pub fn get(&self, pos: &[usize; 2]) -> Moments {
        self.moments[self.size[0] * pos[1] + pos[0]]
    }

    /// Row-major moments.
    pub fn moments(&self) -> &[Moments] {
        &self.moments
    }
}

/// Cell whose density cannot be divided by.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InvalidDensity {
    pub pos: [usize; 2],
    pub density: f64,
}

/// Moments, obstacle correction and the
/// [Bhatnagar–Gross–Krook (BGK) operator](https://en.wikipedia.org/wiki/Bhatnagar%E2%80%93Gross%E2%80%93Krook_operator)
/// collision.
#[derive(Clone, Debug)]
pub struct MacroscopicSolver<const Q: usize> {
    velocity_set: VelocitySet<Q>,
    relaxation_time: f64,
}

impl<const Q: usize> MacroscopicSolver<Q> {
    pub fn new(velocity_set: &VelocitySet<Q>, relaxation_time: f64) -> Self {
        Self {
            velocity_set: velocity_set.clone(),
            relaxation_time,
        }
    }

    pub fn relaxation_time(&self) -> f64 {
        self.relaxation_time
    }

    /// Kinematic viscosity in lattice units, `cs² (τ - 1/2)`.
    pub fn viscosity(&self) -> f64 {
        self.velocity_set.viscosity(self.relaxation_time)
    }

    /// Density and velocity of every cell.
    ///
    /// Fails on the first cell (row-major) whose density is not positive and
    /// finite. All cells are still written.
    pub fn compute_moments(
        &self,
        field: &DistributionField<Q>,
        fields: &mut MacroscopicFields,
    ) -> Result<(), InvalidDensity> {
        debug_assert_eq!(field.size(), fields.size);

        let width = fields.size[0];
        let invalid = fields
            .moments
            .par_iter_mut()
            .zip(field.distributions().par_iter())
            .enumerate()
            .filter_map(|(index, (moments, distributions))| {
                let (density, momentum) = self.velocity_set.moments(distributions);
                moments.density = density;
                moments.velocity_vector = momentum.map(|m| m / density);
                match density.is_finite() && density > 0.0 {
                    true => None,
                    false => Some((index, density)),
                }
            })
            .min_by_key(|(index, _)| *index);

        match invalid {
            Some((index, density)) => Err(InvalidDensity {
                pos: [index % width, index / width],
                density,
            }),
            None => Ok(()),
        }
    }

    /// Full bounce-back at solid cells: populations are reversed and the
    /// velocity used for the equilibrium is zero.
    pub fn enforce_obstacle(
        &self,
        field: &mut DistributionField<Q>,
        mask: &ObstacleMask,
        fields: &mut MacroscopicFields,
    ) {
        debug_assert_eq!(field.size(), mask.size());
        debug_assert_eq!(field.size(), fields.size);

        field
            .distributions_mut()
            .par_iter_mut()
            .zip(fields.moments.par_iter_mut())
            .zip(mask.cells().par_iter())
            .for_each(|((distributions, moments), &solid)| {
                if solid {
                    *distributions = self.velocity_set.reverse(distributions);
                    moments.velocity_vector = [0.0; 2];
                }
            });
    }

    /// Relax every cell towards its local equilibrium.
    pub fn relax(&self, field: &mut DistributionField<Q>, fields: &MacroscopicFields) {
        debug_assert_eq!(field.size(), fields.size);

        let relaxation_time = self.relaxation_time;
        field
            .distributions_mut()
            .par_iter_mut()
            .zip(fields.moments.par_iter())
            .for_each(|(distributions, moments)| {
                let equilibrium_distributions = self
                    .velocity_set
                    .equilibrium(moments.density, &moments.velocity_vector);
                for (f, f_eq) in izip!(distributions.iter_mut(), equilibrium_distributions) {
                    *f -= (*f - f_eq) / relaxation_time;
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_abs_diff_eq;

    const EPS: f64 = 1e-12;

    fn solver() -> MacroscopicSolver<9> {
        MacroscopicSolver::new(&VelocitySet::d2q9(), 0.6)
    }

    #[test]
    fn test_moments_of_equilibrium() {
        let set = VelocitySet::d2q9();
        let field = DistributionField::from_equilibrium(&[4, 3], &set, 1.2, &[0.05, -0.02]);
        let mut fields = MacroscopicFields::new(&[4, 3]);
        solver().compute_moments(&field, &mut fields).unwrap();
        for moments in fields.moments() {
            assert_abs_diff_eq!(moments.density, 1.2, epsilon = EPS);
            assert_abs_diff_eq!(moments.velocity_vector[0], 0.05, epsilon = EPS);
            assert_abs_diff_eq!(moments.velocity_vector[1], -0.02, epsilon = EPS);
        }
    }

    #[test]
    fn test_moments_detect_divergence() {
        let set = VelocitySet::d2q9();
        let mut field = DistributionField::from_equilibrium(&[4, 3], &set, 1.0, &[0.0, 0.0]);
        field.set_populations(&[3, 2], [0.0; 9]);
        field.set_populations(&[2, 1], [-0.1; 9]);
        let mut fields = MacroscopicFields::new(&[4, 3]);

        let error = solver().compute_moments(&field, &mut fields).unwrap_err();
        assert_eq!(error.pos, [2, 1]);
        assert!(error.density < 0.0);

        field.set_populations(&[2, 1], [1.0; 9]);
        field.set_populations(&[0, 0], [f64::NAN; 9]);
        let error = solver().compute_moments(&field, &mut fields).unwrap_err();
        assert_eq!(error.pos, [0, 0]);
        assert!(error.density.is_nan());
    }

    #[test]
    fn test_enforce_obstacle_bounces_back() {
        let set = VelocitySet::d2q9();
        let size = [3, 3];
        let mut field = DistributionField::from_equilibrium(&size, &set, 1.0, &[0.1, 0.05]);
        let mut cells = vec![false; 9];
        cells[4] = true;
        let mask = ObstacleMask::from_cells(&size, cells).unwrap();
        let mut fields = MacroscopicFields::new(&size);
        let solver = solver();
        solver.compute_moments(&field, &mut fields).unwrap();

        let before = field.clone();
        solver.enforce_obstacle(&mut field, &mask, &mut fields);

        assert_eq!(fields.get(&[1, 1]).velocity_vector, [0.0, 0.0]);
        assert_eq!(
            field.populations(&[1, 1]),
            &set.reverse(before.populations(&[1, 1]))
        );
        assert_eq!(field.populations(&[0, 1]), before.populations(&[0, 1]));
        assert_ne!(fields.get(&[0, 1]).velocity_vector, [0.0, 0.0]);
    }

    #[test]
    fn test_relax_reaches_equilibrium_with_unit_relaxation_time() {
        let set = VelocitySet::d2q9();
        let size = [2, 2];
        let mut field = DistributionField::from_equilibrium(&size, &set, 1.0, &[0.0, 0.0]);
        let mut f = *field.populations(&[1, 0]);
        f[1] += 0.05;
        f[3] -= 0.02;
        field.set_populations(&[1, 0], f);

        let solver = MacroscopicSolver::new(&set, 1.0);
        let mut fields = MacroscopicFields::new(&size);
        solver.compute_moments(&field, &mut fields).unwrap();
        solver.relax(&mut field, &fields);

        let moments = fields.get(&[1, 0]);
        let expected = set.equilibrium(moments.density, &moments.velocity_vector);
        for (f, f_eq) in izip!(field.populations(&[1, 0]), expected) {
            assert_abs_diff_eq!(*f, f_eq, epsilon = EPS);
        }
    }

    #[test]
    fn test_relax_conserves_mass_and_momentum() {
        let set = VelocitySet::d2q9();
        let size = [5, 4];
        let mut field = DistributionField::perturbed(
            &size,
            &set,
            &crate::config::InitialConditions::default(),
        );
        let solver = solver();
        let mut fields = MacroscopicFields::new(&size);
        solver.compute_moments(&field, &mut fields).unwrap();
        let before = field.clone();
        solver.relax(&mut field, &fields);

        for (after, before) in izip!(field.distributions(), before.distributions()) {
            let (density_after, momentum_after) = set.moments(after);
            let (density_before, momentum_before) = set.moments(before);
            assert_abs_diff_eq!(density_after, density_before, epsilon = 1e-10);
            assert_abs_diff_eq!(momentum_after[0], momentum_before[0], epsilon = 1e-10);
            assert_abs_diff_eq!(momentum_after[1], momentum_before[1], epsilon = 1e-10);
        }
    }

    #[test]
    fn test_viscosity() {
        assert_abs_diff_eq!(solver().viscosity(), 0.1 / 3.0, epsilon = EPS);
    }
}
