//! Constants of the supported lattice models.

pub mod d2q9;
