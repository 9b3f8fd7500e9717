/// Lattice vectors for the LBGK D2Q9 model.
/// Index for vectors:
///     6   2   5
///       \ | /
///     3 — 0 — 1
///       / | \
///     7   4   8
pub const C: [[isize; 2]; 9] = [
    [0, 0],
    [1, 0],
    [0, 1],
    [-1, 0],
    [0, -1],
    [1, 1],
    [-1, 1],
    [-1, -1],
    [1, -1],
];

/// Weights corresponding to the lattice vectors for the LBGK D2Q9 model.
pub const W: [f64; 9] = [
    4.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
];

/// Index of the opposite lattice vector, used for bounce-back.
pub const OPPOSITE: [usize; 9] = [0, 3, 4, 1, 2, 7, 8, 5, 6];

/// Sound speed squared for the LBGK D2Q9 model.
pub const CS2: f64 = 1.0 / 3.0;
