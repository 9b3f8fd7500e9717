pub mod distribution;
pub mod macroscopic;
pub mod parameters;
pub mod phase;
pub mod velocity_set;

use crate::config::Config;
use crate::diagnostics::Snapshot;
use crate::error::{Divergence, LbmError, Result};
use crate::object::mask::ObstacleMask;
use distribution::DistributionField;
use macroscopic::{MacroscopicFields, MacroscopicSolver};
use phase::{Pending, Phase};
use velocity_set::VelocitySet;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Status {
    /// No iteration completed yet.
    Initial,
    Ready,
    /// An iteration was started and its phases not all completed.
    InProgress,
    Diverged(Divergence),
}

/// Implementation of the [Lattice Boltzmann method (LBM)](https://en.wikipedia.org/wiki/Lattice_Boltzmann_methods) for the
/// [Bhatnagar–Gross–Krook (BGK) operator](https://en.wikipedia.org/wiki/Bhatnagar%E2%80%93Gross%E2%80%93Krook_operator)
/// model for relaxation, with an open inlet and outlet along `x`, periodic
/// `y` and bounce-back at obstacle cells.
pub struct Lbgk<const Q: usize> {
    config: Config,
    distribution: DistributionField<Q>,
    mask: ObstacleMask,
    solver: MacroscopicSolver<Q>,
    // recomputed every iteration
    macroscopic: MacroscopicFields,
    iteration: usize,
    status: Status,
}

impl Lbgk<9> {
    /// Create `Lbgk` for the D2Q9 parameters, with the configured obstacle
    /// and perturbed initial populations.
    pub fn new_d2q9(config: Config) -> Result<Self> {
        config.validate()?;
        let velocity_set = VelocitySet::d2q9();
        let distribution =
            DistributionField::perturbed(&config.size(), &velocity_set, &config.initial);
        let mask = ObstacleMask::from_config(&config);
        Self::with_field(config, distribution, mask)
    }
}

impl<const Q: usize> Lbgk<Q> {
    /// Create `Lbgk` from explicit initial populations and obstacle mask.
    pub fn with_field(
        config: Config,
        distribution: DistributionField<Q>,
        mask: ObstacleMask,
    ) -> Result<Self> {
        config.validate()?;
        let size = config.size();
        if distribution.size() != size || mask.size() != size {
            return Err(LbmError::InvalidConfig(format!(
                "field {:?} and mask {:?} do not match the {}x{} grid",
                distribution.size(),
                mask.size(),
                size[0],
                size[1]
            )));
        }

        let solver = MacroscopicSolver::new(distribution.velocity_set(), config.relaxation_time);
        log::info!(
            "D2Q{} lattice {}x{}, relaxation time {}, viscosity {:.5}, {} solid cells",
            Q,
            size[0],
            size[1],
            solver.relaxation_time(),
            solver.viscosity(),
            mask.solid_count()
        );

        Ok(Self {
            config,
            distribution,
            mask,
            solver,
            macroscopic: MacroscopicFields::new(&size),
            iteration: 0,
            status: Status::Initial,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of completed iterations.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn distribution(&self) -> &DistributionField<Q> {
        &self.distribution
    }

    pub fn mask(&self) -> &ObstacleMask {
        &self.mask
    }

    pub fn solver(&self) -> &MacroscopicSolver<Q> {
        &self.solver
    }

    /// Sum of all populations.
    pub fn total_mass(&self) -> f64 {
        self.distribution.total_mass()
    }

    /// Start an iteration; see [`phase`] for the order of its phases.
    ///
    /// Dropping the phase token before `relax` leaves the simulation
    /// unusable: later iterations fail with [`LbmError::Abandoned`].
    pub fn begin_iteration(&mut self) -> Result<Phase<'_, Q, Pending>> {
        let status = self.status;
        match status {
            Status::Diverged(divergence) => Err(LbmError::Divergence(divergence)),
            Status::InProgress => Err(LbmError::Abandoned(self.iteration)),
            Status::Initial | Status::Ready => Ok(Phase::begin(self)),
        }
    }

    /// Perform iteration.
    pub fn step(&mut self) -> Result<()> {
        self.begin_iteration()?
            .apply_open_boundary()
            .stream()
            .compute_moments()?
            .enforce_obstacle()
            .relax();
        log::trace!("iteration {} done", self.iteration);
        Ok(())
    }

    /// Macroscopic state of the last completed iteration, taken after the
    /// obstacle correction. `None` before the first iteration, after a
    /// divergence and while an iteration is unfinished.
    pub fn snapshot(&self) -> Option<Snapshot<'_>> {
        match self.status {
            Status::Ready => Some(Snapshot::new(self.iteration - 1, &self.macroscopic)),
            Status::Initial | Status::InProgress | Status::Diverged(_) => None,
        }
    }

    /// Perform the configured number of iterations, handing a snapshot to
    /// `on_snapshot` every `snapshot_interval` iterations (starting with the
    /// first).
    pub fn run(&mut self, mut on_snapshot: impl FnMut(&Snapshot<'_>)) -> Result<()> {
        let interval = self.config.snapshot_interval;
        for _ in 0..self.config.iterations {
            self.step()?;
            let Some(snapshot) = self.snapshot() else {
                continue;
            };
            if interval > 0 && snapshot.iteration() % interval == 0 {
                log::debug!(
                    "iteration {}: total mass {:.6}",
                    snapshot.iteration(),
                    self.distribution.total_mass()
                );
                on_snapshot(&snapshot);
            }
        }
        Ok(())
    }
}
