use super::circular::Circular;
use super::Object;
use crate::config::Config;
use crate::error::{LbmError, Result};

use itertools::iproduct;

/// Solid cells of the lattice, fixed for the lifetime of a simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct ObstacleMask {
    size: [usize; 2],
    // note: flat vectors reduce cache loads
    cells: Vec<bool>,
}

impl ObstacleMask {
    /// Mask without solid cells.
    pub fn empty(size: &[usize; 2]) -> Self {
        Self {
            size: *size,
            cells: vec![false; size[0] * size[1]],
        }
    }

    /// Mark every cell whose centre lies in one of the objects.
    pub fn from_objects(size: &[usize; 2], objects: &[&dyn Object<2>]) -> Self {
        let cells = iproduct!(0..size[1], 0..size[0])
            .map(|(y, x)| {
                objects
                    .iter()
                    .any(|object| object.contains(&[x as f64, y as f64]))
            })
            .collect();
        Self { size: *size, cells }
    }

    /// Mask from row-major cell flags.
    pub fn from_cells(size: &[usize; 2], cells: Vec<bool>) -> Result<Self> {
        if cells.len() != size[0] * size[1] {
            return Err(LbmError::InvalidConfig(format!(
                "obstacle mask has {} cells, expected {}x{}",
                cells.len(),
                size[0],
                size[1]
            )));
        }
        Ok(Self { size: *size, cells })
    }

    /// Mask of the configured obstacle, empty without one.
    pub fn from_config(config: &Config) -> Self {
        match &config.obstacle {
            Some(obstacle) => {
                let circle = Circular::new(obstacle.center, obstacle.radius);
                Self::from_objects(&config.size(), &[&circle])
            }
            None => Self::empty(&config.size()),
        }
    }

    /// Width and height.
    pub fn size(&self) -> [usize; 2] {
        self.size
    }

    /// Whether the cell at lattice position is solid.
    pub fn is_solid(&self, pos: &[usize; 2]) -> bool {
        self.cells[self.size[0] * pos[1] + pos[0]]
    }

    /// Row-major cell flags.
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    pub fn solid_count(&self) -> usize {
        self.cells.iter().filter(|&&solid| solid).count()
    }
}
