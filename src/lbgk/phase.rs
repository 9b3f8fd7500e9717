//! The fixed order of the phases of one iteration.
//!
//! Every phase consumes the token of the previous one, so an iteration can
//! only run as open boundary → streaming → moments → obstacle → relaxation.

use super::{Lbgk, Status};
use crate::diagnostics::Snapshot;
use crate::error::{Divergence, LbmError, Result};

use std::marker::PhantomData;

pub enum Pending {}
pub enum BoundaryApplied {}
pub enum Streamed {}
pub enum MomentsComputed {}
pub enum ObstacleEnforced {}

/// An iteration in progress, `S` is the last completed phase.
#[must_use = "an iteration must be completed with `relax`"]
pub struct Phase<'a, const Q: usize, S> {
    lbgk: &'a mut Lbgk<Q>,
    state: PhantomData<S>,
}

impl<'a, const Q: usize, S> Phase<'a, Q, S> {
    fn advance<T>(self) -> Phase<'a, Q, T> {
        Phase {
            lbgk: self.lbgk,
            state: PhantomData,
        }
    }
}

impl<'a, const Q: usize> Phase<'a, Q, Pending> {
    pub(super) fn begin(lbgk: &'a mut Lbgk<Q>) -> Self {
        lbgk.status = Status::InProgress;
        Self {
            lbgk,
            state: PhantomData,
        }
    }

    pub fn apply_open_boundary(self) -> Phase<'a, Q, BoundaryApplied> {
        self.lbgk.distribution.apply_open_boundary();
        self.advance()
    }
}

impl<'a, const Q: usize> Phase<'a, Q, BoundaryApplied> {
    pub fn stream(self) -> Phase<'a, Q, Streamed> {
        self.lbgk.distribution.stream();
        self.advance()
    }
}

impl<'a, const Q: usize> Phase<'a, Q, Streamed> {
    /// Fails when a density is not positive and finite; the simulation then
    /// refuses further iterations.
    pub fn compute_moments(self) -> Result<Phase<'a, Q, MomentsComputed>> {
        let lbgk = &mut *self.lbgk;
        if let Err(invalid) = lbgk
            .solver
            .compute_moments(&lbgk.distribution, &mut lbgk.macroscopic)
        {
            let divergence = Divergence {
                iteration: lbgk.iteration,
                x: invalid.pos[0],
                y: invalid.pos[1],
                density: invalid.density,
            };
            log::error!("simulation diverged: {divergence}");
            lbgk.status = Status::Diverged(divergence);
            return Err(LbmError::Divergence(divergence));
        }
        Ok(self.advance())
    }
}

impl<'a, const Q: usize> Phase<'a, Q, MomentsComputed> {
    pub fn enforce_obstacle(self) -> Phase<'a, Q, ObstacleEnforced> {
        let lbgk = &mut *self.lbgk;
        lbgk.solver
            .enforce_obstacle(&mut lbgk.distribution, &lbgk.mask, &mut lbgk.macroscopic);
        self.advance()
    }
}

impl<'a, const Q: usize> Phase<'a, Q, ObstacleEnforced> {
    /// Macroscopic state the collision will relax towards.
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot::new(self.lbgk.iteration, &self.lbgk.macroscopic)
    }

    /// Collide and complete the iteration.
    pub fn relax(self) {
        let lbgk = self.lbgk;
        lbgk.solver.relax(&mut lbgk.distribution, &lbgk.macroscopic);
        lbgk.iteration += 1;
        lbgk.status = Status::Ready;
    }
}
