use super::velocity_set::VelocitySet;
use crate::config::InitialConditions;
use crate::error::{LbmError, Result};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;
use rayon::prelude::*;

/// Particle populations `F[y][x][i]` of every lattice cell.
///
/// Streaming pulls from the neighbouring cells into a second buffer which is
/// then swapped in, so no cell reads a value written in the same pass.
#[derive(Clone, Debug)]
pub struct DistributionField<const Q: usize> {
    size: [usize; 2],
    velocity_set: VelocitySet<Q>,
    // note: flat vectors reduce cache loads
    distributions: Vec<[f64; Q]>,
    scratch: Vec<[f64; Q]>,
}

impl<const Q: usize> DistributionField<Q> {
    /// Every cell at the equilibrium of the given density and velocity.
    pub fn from_equilibrium(
        size: &[usize; 2],
        velocity_set: &VelocitySet<Q>,
        density: f64,
        velocity_vector: &[f64; 2],
    ) -> Self {
        let distributions = velocity_set.equilibrium(density, velocity_vector);
        Self::with_cells(size, velocity_set, vec![distributions; size[0] * size[1]])
    }

    /// Baseline populations with seeded Gaussian noise, the +x direction set
    /// to the inflow bias.
    pub fn perturbed(
        size: &[usize; 2],
        velocity_set: &VelocitySet<Q>,
        initial: &InitialConditions,
    ) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(initial.seed);
        let east = velocity_set
            .lattice_parameters()
            .iter()
            .position(|lattice_parameters| lattice_parameters.lattice_vector == [1, 0]);

        let distributions = (0..size[0] * size[1])
            .map(|_| {
                let mut f: [f64; Q] = std::array::from_fn(|_| {
                    let noise: f64 = rng.sample(StandardNormal);
                    initial.baseline + initial.perturbation * noise
                });
                if let Some(east) = east {
                    f[east] = initial.inflow_bias;
                }
                f
            })
            .collect();
        Self::with_cells(size, velocity_set, distributions)
    }

    /// Field from row-major population vectors.
    pub fn from_distributions(
        size: &[usize; 2],
        velocity_set: &VelocitySet<Q>,
        distributions: Vec<[f64; Q]>,
    ) -> Result<Self> {
        if distributions.len() != size[0] * size[1] {
            return Err(LbmError::InvalidConfig(format!(
                "distribution field has {} cells, expected {}x{}",
                distributions.len(),
                size[0],
                size[1]
            )));
        }
        Ok(Self::with_cells(size, velocity_set, distributions))
    }

    fn with_cells(
        size: &[usize; 2],
        velocity_set: &VelocitySet<Q>,
        distributions: Vec<[f64; Q]>,
    ) -> Self {
        let scratch = vec![[0.0; Q]; distributions.len()];
        Self {
            size: *size,
            velocity_set: velocity_set.clone(),
            distributions,
            scratch,
        }
    }

    fn index(&self, pos: &[usize; 2]) -> usize {
        self.size[0] * pos[1] + pos[0]
    }

    /// Width and height.
    pub fn size(&self) -> [usize; 2] {
        self.size
    }

    pub fn velocity_set(&self) -> &VelocitySet<Q> {
        &self.velocity_set
    }

    /// Populations at lattice position.
    pub fn populations(&self, pos: &[usize; 2]) -> &[f64; Q] {
        &self.distributions[self.index(pos)]
    }

    /// Set populations at lattice position.
    pub fn set_populations(&mut self, pos: &[usize; 2], distributions: [f64; Q]) {
        let index = self.index(pos);
        self.distributions[index] = distributions;
    }

    /// Row-major population vectors.
    pub fn distributions(&self) -> &[[f64; Q]] {
        &self.distributions
    }

    pub(crate) fn distributions_mut(&mut self) -> &mut [[f64; Q]] {
        &mut self.distributions
    }

    /// Sum of all populations.
    pub fn total_mass(&self) -> f64 {
        self.distributions.iter().flatten().sum()
    }

    /// Zero-gradient open boundary at the left and right edges.
    ///
    /// The directions that stream into the domain from the right edge are
    /// copied from the second-to-last column, and those streaming in from
    /// the left edge from the second column. The vertical extent stays
    /// periodic.
    pub fn apply_open_boundary(&mut self) {
        let width = self.size[0];
        if width < 2 {
            return;
        }

        let lattice_parameters = self.velocity_set.lattice_parameters();
        self.distributions
            .par_chunks_mut(width)
            .for_each(|row| {
                for (i, lattice_parameters) in lattice_parameters.iter().enumerate() {
                    match lattice_parameters.lattice_vector[0] {
                        c if c < 0 => row[width - 1][i] = row[width - 2][i],
                        c if c > 0 => row[0][i] = row[1][i],
                        _ => {}
                    }
                }
            });
    }

    /// Move every population one lattice step along its lattice vector,
    /// wrapping around both axes.
    pub fn stream(&mut self) {
        let [width, height] = self.size.map(|size| size as isize);
        if width == 0 || height == 0 {
            return;
        }

        let source = &self.distributions;
        let lattice_parameters = self.velocity_set.lattice_parameters();
        self.scratch
            .par_chunks_mut(width as usize)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, cell) in row.iter_mut().enumerate() {
                    for (i, lattice_parameters) in lattice_parameters.iter().enumerate() {
                        let [cx, cy] = lattice_parameters.lattice_vector;
                        let from_x = (x as isize - cx).rem_euclid(width);
                        let from_y = (y as isize - cy).rem_euclid(height);
                        cell[i] = source[(from_y * width + from_x) as usize][i];
                    }
                }
            });
        std::mem::swap(&mut self.distributions, &mut self.scratch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_abs_diff_eq;

    fn numbered(size: &[usize; 2]) -> DistributionField<9> {
        let distributions = (0..size[0] * size[1])
            .map(|cell| std::array::from_fn(|i| (cell * 9 + i) as f64))
            .collect();
        DistributionField::from_distributions(size, &VelocitySet::d2q9(), distributions).unwrap()
    }

    #[test]
    fn test_stream_uniform_is_identity() {
        let set = VelocitySet::d2q9();
        let mut field = DistributionField::from_equilibrium(&[7, 5], &set, 1.0, &[0.0, 0.0]);
        let before = field.distributions().to_vec();
        field.apply_open_boundary();
        field.stream();
        assert_eq!(field.distributions(), &before[..]);
    }

    #[test]
    fn test_stream_conserves_mass() {
        let mut field = DistributionField::perturbed(
            &[12, 8],
            &VelocitySet::d2q9(),
            &InitialConditions::default(),
        );
        let mass = field.total_mass();
        for _ in 0..5 {
            field.stream();
        }
        assert_abs_diff_eq!(field.total_mass(), mass, epsilon = 1e-9);
    }

    #[test]
    fn test_stream_moves_one_step() {
        let set = VelocitySet::d2q9();
        let size = [6, 4];
        let before = numbered(&size);
        let mut field = before.clone();
        field.stream();
        for (y, x, i) in itertools::iproduct!(0..size[1], 0..size[0], 0..9) {
            let [cx, cy] = set.lattice_vector(i);
            let to = [
                (x as isize + cx).rem_euclid(size[0] as isize) as usize,
                (y as isize + cy).rem_euclid(size[1] as isize) as usize,
            ];
            assert_eq!(field.populations(&to)[i], before.populations(&[x, y])[i]);
        }
    }

    #[test]
    fn test_open_boundary_copies_entering_directions() {
        let set = VelocitySet::d2q9();
        let size = [5, 3];
        let before = numbered(&size);
        let mut field = before.clone();
        field.apply_open_boundary();

        for y in 0..size[1] {
            for i in 0..9 {
                let cx = set.lattice_vector(i)[0];
                let right = field.populations(&[4, y])[i];
                let left = field.populations(&[0, y])[i];
                match cx {
                    -1 => assert_eq!(right, before.populations(&[3, y])[i]),
                    _ => assert_eq!(right, before.populations(&[4, y])[i]),
                }
                match cx {
                    1 => assert_eq!(left, before.populations(&[1, y])[i]),
                    _ => assert_eq!(left, before.populations(&[0, y])[i]),
                }
            }
            for x in 1..4 {
                assert_eq!(field.populations(&[x, y]), before.populations(&[x, y]));
            }
        }
    }

    #[test]
    fn test_perturbed_is_reproducible() {
        let set = VelocitySet::d2q9();
        let initial = InitialConditions {
            seed: 7,
            ..InitialConditions::default()
        };
        let first = DistributionField::perturbed(&[8, 4], &set, &initial);
        let second = DistributionField::perturbed(&[8, 4], &set, &initial);
        assert_eq!(first.distributions(), second.distributions());

        let other = DistributionField::perturbed(
            &[8, 4],
            &set,
            &InitialConditions {
                seed: 8,
                ..initial
            },
        );
        assert_ne!(first.distributions(), other.distributions());

        for f in first.distributions() {
            assert_eq!(f[1], initial.inflow_bias);
            assert!((f[0] - initial.baseline).abs() < 0.1);
        }
    }

    #[test]
    fn test_from_distributions_checks_length() {
        let result = DistributionField::from_distributions(
            &[3, 3],
            &VelocitySet::d2q9(),
            vec![[0.0; 9]; 8],
        );
        assert!(matches!(result, Err(LbmError::InvalidConfig(_))));
    }
}
