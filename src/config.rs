//! Static simulation parameters, fixed at construction.

use crate::error::{LbmError, Result};
use crate::object::circular::Circular;
use crate::object::Object;

use serde::{Deserialize, Serialize};

/// Circular obstacle placed in the channel.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObstacleConfig {
    /// Centre in lattice units.
    pub center: [f64; 2],
    pub radius: f64,
}

/// Initial populations: `baseline + perturbation * N(0, 1)` in every
/// direction, with the +x direction set to `inflow_bias` to seed a mean flow.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialConditions {
    pub baseline: f64,
    pub perturbation: f64,
    pub inflow_bias: f64,
    pub seed: u64,
}

impl Default for InitialConditions {
    fn default() -> Self {
        Self {
            baseline: 1.0,
            perturbation: 0.01,
            inflow_bias: 2.3,
            seed: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub width: usize,
    pub height: usize,
    /// BGK relaxation time.
    pub relaxation_time: f64,
    pub iterations: usize,
    /// Iterations between diagnostics snapshots, 0 disables them.
    pub snapshot_interval: usize,
    pub obstacle: Option<ObstacleConfig>,
    pub initial: InitialConditions,
}

impl Default for Config {
    fn default() -> Self {
        let (width, height) = (400, 100);
        Self {
            width,
            height,
            relaxation_time: 0.53,
            iterations: 20_000,
            snapshot_interval: 100,
            obstacle: Some(ObstacleConfig {
                center: [(width / 4) as f64, (height / 2) as f64],
                radius: 13.0,
            }),
            initial: InitialConditions::default(),
        }
    }
}

impl Config {
    /// Parse a JSON document, missing fields take their default value.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Width and height.
    pub fn size(&self) -> [usize; 2] {
        [self.width, self.height]
    }

    /// Reject parameters that cannot start a run.
    pub fn validate(&self) -> Result<()> {
        if self.width < 2 {
            return Err(invalid(format!(
                "grid width must be at least 2, got {}",
                self.width
            )));
        }
        if self.height == 0 {
            return Err(invalid("grid height must be positive".to_string()));
        }
        if !(self.relaxation_time.is_finite() && self.relaxation_time > 0.0) {
            return Err(invalid(format!(
                "relaxation time must be positive, got {}",
                self.relaxation_time
            )));
        }
        if self.relaxation_time <= 0.5 {
            log::warn!(
                "relaxation time {} gives a non-positive viscosity",
                self.relaxation_time
            );
        }

        if let Some(obstacle) = &self.obstacle {
            if !(obstacle.radius.is_finite() && obstacle.radius > 0.0) {
                return Err(invalid(format!(
                    "obstacle radius must be positive, got {}",
                    obstacle.radius
                )));
            }
            let inside = obstacle
                .center
                .iter()
                .zip(self.size())
                .all(|(c, size)| c.is_finite() && (0.0..size as f64).contains(c));
            if !inside {
                return Err(invalid(format!(
                    "obstacle centre {:?} is outside the {}x{} grid",
                    obstacle.center, self.width, self.height
                )));
            }

            let diagonal = (self.width as f64).hypot(self.height as f64);
            if obstacle.radius > diagonal {
                return Err(invalid(format!(
                    "obstacle radius {} exceeds the grid diagonal {:.3}",
                    obstacle.radius, diagonal
                )));
            }
            // the cell centre closest to the obstacle centre
            let nearest = [0, 1].map(|axis| {
                let last = (self.size()[axis] - 1) as f64;
                obstacle.center[axis].round().min(last)
            });
            if !Circular::new(obstacle.center, obstacle.radius).contains(&nearest) {
                return Err(invalid(format!(
                    "obstacle at {:?} with radius {} covers no cell",
                    obstacle.center, obstacle.radius
                )));
            }
        }

        let initial = &self.initial;
        if !(initial.perturbation.is_finite() && initial.perturbation >= 0.0) {
            return Err(invalid(format!(
                "perturbation must be non-negative, got {}",
                initial.perturbation
            )));
        }
        if !(initial.baseline.is_finite() && initial.inflow_bias.is_finite()) {
            return Err(invalid(
                "initial baseline and inflow bias must be finite".to_string(),
            ));
        }

        Ok(())
    }
}

fn invalid(message: String) -> LbmError {
    LbmError::InvalidConfig(message)
}
