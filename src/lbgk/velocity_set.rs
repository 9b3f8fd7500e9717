use super::parameters;
use crate::linear_algebra::{to_float, VectorOps};

use itertools::izip;

/// Lattice parameters of a single discrete velocity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatticeParameters {
    pub lattice_vector: [isize; 2],
    pub weight: f64,
}

impl Default for LatticeParameters {
    fn default() -> Self {
        Self {
            lattice_vector: [0; 2],
            weight: 0.0,
        }
    }
}

/// Discrete velocity set of a 2D lattice model.
///
/// Index 0 is the rest particle, the weights sum to one and every lattice
/// vector has an opposite (`c[opposite(i)] == -c[i]`).
#[derive(Clone, Debug)]
pub struct VelocitySet<const Q: usize> {
    lattice_parameters: [LatticeParameters; Q],
    opposite: [usize; Q],
    sound_speed_squared: f64,
}

impl VelocitySet<9> {
    /// Create the D2Q9 velocity set.
    pub fn d2q9() -> Self {
        let mut lattice_parameters = [LatticeParameters::default(); 9];
        for (lattice_parameters, c, w) in izip!(
            &mut lattice_parameters,
            parameters::d2q9::C,
            parameters::d2q9::W
        ) {
            lattice_parameters.lattice_vector = c;
            lattice_parameters.weight = w;
        }

        Self {
            lattice_parameters,
            opposite: parameters::d2q9::OPPOSITE,
            sound_speed_squared: parameters::d2q9::CS2,
        }
    }
}

impl Default for VelocitySet<9> {
    fn default() -> Self {
        Self::d2q9()
    }
}

impl<const Q: usize> VelocitySet<Q> {
    /// All lattice parameters, in direction order.
    pub fn lattice_parameters(&self) -> &[LatticeParameters; Q] {
        &self.lattice_parameters
    }

    /// Lattice vector of direction `i`.
    pub fn lattice_vector(&self, i: usize) -> [isize; 2] {
        self.lattice_parameters[i].lattice_vector
    }

    /// Weight of direction `i`.
    pub fn weight(&self, i: usize) -> f64 {
        self.lattice_parameters[i].weight
    }

    /// Direction opposite to direction `i`.
    pub fn opposite(&self, i: usize) -> usize {
        self.opposite[i]
    }

    pub fn sound_speed_squared(&self) -> f64 {
        self.sound_speed_squared
    }

    /// Populations reordered by the opposite-direction table (bounce-back).
    pub fn reverse(&self, distributions: &[f64; Q]) -> [f64; Q] {
        std::array::from_fn(|i| distributions[self.opposite[i]])
    }

    /// Zeroth and first moments of a population vector: density and momentum.
    pub fn moments(&self, distributions: &[f64; Q]) -> (f64, [f64; 2]) {
        let mut density = 0.0;
        let mut momentum = [0.0; 2];
        for (lattice_parameters, f) in izip!(&self.lattice_parameters, distributions) {
            density += f;
            for (m, c) in izip!(&mut momentum, lattice_parameters.lattice_vector) {
                *m += c as f64 * f;
            }
        }
        (density, momentum)
    }

    /// Calculate equilibrium distributions.
    ///
    /// Second order expansion of the Maxwell-Boltzmann distribution:
    /// `w_i ρ (1 + (c_i·u)/cs² + (c_i·u)²/(2cs⁴) - (u·u)/(2cs²))`.
    pub fn equilibrium(&self, density: f64, velocity_vector: &[f64; 2]) -> [f64; Q] {
        let cs2x2 = self.sound_speed_squared + self.sound_speed_squared;
        let cs4x2 = {
            let cs4 = self.sound_speed_squared * self.sound_speed_squared;
            cs4 + cs4
        };
        let u_dot_u = velocity_vector.squared_norm();

        let mut result = [0.0; Q];
        for (val, lattice_parameters) in izip!(&mut result, &self.lattice_parameters) {
            let c_dot_u = to_float(&lattice_parameters.lattice_vector).dot_product(velocity_vector);
            *val = lattice_parameters.weight
                * density
                * (1.0 + c_dot_u / self.sound_speed_squared + (c_dot_u * c_dot_u) / cs4x2
                    - u_dot_u / cs2x2);
        }
        result
    }

    /// Kinematic viscosity in lattice units for a relaxation time.
    pub fn viscosity(&self, relaxation_time: f64) -> f64 {
        self.sound_speed_squared * (relaxation_time - 0.5)
    }

    /// Relaxation time reaching a [Reynolds number](https://en.wikipedia.org/wiki/Reynolds_number)
    /// for a characteristic velocity and length (lattice units).
    pub fn relaxation_time(
        &self,
        velocity: f64,
        characteristic_length: f64,
        reynolds_number: f64,
    ) -> f64 {
        characteristic_length * velocity / (self.sound_speed_squared * reynolds_number) + 0.5
    }
}
