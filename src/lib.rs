//! Flow past an obstacle with the D2Q9 lattice Boltzmann method.
//!
//! The core is [`Lbgk`]: every iteration applies the open inlet/outlet
//! boundary, streams, computes the macroscopic moments, bounces populations
//! back at obstacle cells and relaxes towards the local equilibrium. The
//! [`Simulation`] type exposes it to JavaScript; drawing the diagnostics is
//! left to the page.
//!
//! ```
//! use obstacle_lbm::{Config, Lbgk, ObstacleConfig};
//!
//! let config = Config {
//!     width: 80,
//!     height: 30,
//!     iterations: 20,
//!     obstacle: Some(ObstacleConfig {
//!         center: [20.0, 15.0],
//!         radius: 4.0,
//!     }),
//!     ..Config::default()
//! };
//! let mut lbgk = Lbgk::new_d2q9(config).unwrap();
//! lbgk.run(|snapshot| {
//!     let (min, max) = snapshot.curl().range().unwrap();
//!     println!("iteration {}: curl in [{min:.4}, {max:.4}]", snapshot.iteration());
//! })
//! .unwrap();
//! ```

pub mod config;
pub mod console;
pub mod diagnostics;
pub mod error;
pub mod field;
pub mod lbgk;
pub mod linear_algebra;
pub mod object;

pub use config::{Config, InitialConditions, ObstacleConfig};
pub use diagnostics::Snapshot;
pub use error::{Divergence, LbmError};
pub use field::ScalarField;
pub use lbgk::Lbgk;
pub use object::mask::ObstacleMask;

use js_sys::Float64Array;
use wasm_bindgen::prelude::*;

/// Install a logger writing to the browser console.
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(level: &str) {
    console::init(console::parse_level(level));
}

/// D2Q9 simulation handle for JavaScript.
#[wasm_bindgen]
pub struct Simulation {
    lbgk: Lbgk<9>,
}

#[wasm_bindgen]
impl Simulation {
    /// Create a simulation from a JSON configuration, an empty string selects
    /// the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: &str) -> Result<Simulation, JsValue> {
        let config = match config.trim() {
            "" => Config::default(),
            json => Config::from_json(json).map_err(to_js)?,
        };
        let lbgk = Lbgk::new_d2q9(config).map_err(to_js)?;
        Ok(Self { lbgk })
    }

    /// Perform `count` iterations.
    pub fn step(&mut self, count: usize) -> Result<(), JsValue> {
        for _ in 0..count {
            self.lbgk.step().map_err(to_js)?;
        }
        Ok(())
    }

    /// Number of completed iterations.
    pub fn iteration(&self) -> usize {
        self.lbgk.iteration()
    }

    /// Grid width in cells.
    pub fn width(&self) -> usize {
        self.lbgk.config().width
    }

    /// Grid height in cells.
    pub fn height(&self) -> usize {
        self.lbgk.config().height
    }

    /// Row-major velocity magnitude of the last iteration.
    #[wasm_bindgen(js_name = velocityMagnitude)]
    pub fn velocity_magnitude(&self) -> Option<Float64Array> {
        self.lbgk
            .snapshot()
            .map(|snapshot| Float64Array::from(snapshot.velocity_magnitude().values()))
    }

    /// Row-major curl of the interior cells, `(width - 2) x (height - 2)`.
    pub fn curl(&self) -> Option<Float64Array> {
        self.lbgk
            .snapshot()
            .map(|snapshot| Float64Array::from(snapshot.curl().values()))
    }

    /// Row-major obstacle cells, 1 for solid.
    pub fn obstacle(&self) -> Vec<u8> {
        self.lbgk
            .mask()
            .cells()
            .iter()
            .map(|&solid| u8::from(solid))
            .collect()
    }
}

fn to_js(error: LbmError) -> JsValue {
    JsValue::from_str(&error.to_string())
}
