//! WebAssembly maze generator.
//!
//! Builds an odd-sized grid maze with a guaranteed solution path from a
//! border start to an end cell, optionally routed through portal pairs and
//! past a key, then adds dead-end branches and fills every remaining room.
//! Exports high-level functions callable from JavaScript via wasm-bindgen;
//! cells are passed back as a flat row-major `Uint8Array` of mark weights:
//! `cells[row * columns + col]`.

pub mod board;
pub mod branches;
pub mod carver;
pub mod config;
pub mod error;
pub mod fill;
pub mod maze;
pub mod planner;
pub mod rng;
pub mod types;

pub use board::Board;
pub use config::{MazeConfig, Preset};
pub use error::ConfigError;
pub use maze::{Maze, MazeSnapshot, MazeStats};
pub use rng::MazeRng;
pub use types::{mark_table, Coord, Mark};

// ─── WASM Exports (only compiled for wasm32 target) ─────────────────────────

#[cfg(target_arch = "wasm32")]
mod wasm_exports {
    use wasm_bindgen::prelude::*;
    use crate::{mark_table, Maze, MazeConfig, MazeRng, Preset};

    fn rng_for(seed: Option<u64>) -> MazeRng {
        match seed {
            Some(seed) => MazeRng::from_seed(seed),
            None => MazeRng::new(),
        }
    }

    /// Snapshot as a JS object with `cells` swapped for a `Uint8Array`.
    fn to_js(maze: &Maze) -> Result<JsValue, JsError> {
        let snapshot = maze.snapshot();
        let obj = serde_wasm_bindgen::to_value(&snapshot)?;

        let cells = js_sys::Uint8Array::new_with_length(snapshot.cells.len() as u32);
        cells.copy_from(&snapshot.cells);
        js_sys::Reflect::set(&obj, &"cells".into(), &cells.into())
            .map_err(|_| JsError::new("failed to attach cells"))?;

        Ok(obj)
    }

    /// Generate a maze from explicit parameters.
    /// Returns `{ rows, columns, cells, marks, start, end, solution, portals, keys, stats }`.
    #[wasm_bindgen(js_name = "generateMaze")]
    pub fn wasm_generate_maze(
        rows: usize,
        columns: usize,
        complexity: f64,
        num_portals: usize,
        has_key: bool,
        seed: Option<u64>,
    ) -> Result<JsValue, JsError> {
        let config = MazeConfig::new(rows, columns, complexity, num_portals, has_key)?;
        let maze = Maze::generate(config, &mut rng_for(seed))?;
        to_js(&maze)
    }

    /// Generate a maze from a preset name: `easy`, `median` or `hard`.
    #[wasm_bindgen(js_name = "generatePreset")]
    pub fn wasm_generate_preset(name: &str, seed: Option<u64>) -> Result<JsValue, JsError> {
        let preset: Preset = name.parse()?;
        to_js(&Maze::from_preset(preset, &mut rng_for(seed)))
    }

    /// Generate a maze from a `{ rows, columns, complexity, num_portals, has_key }` object.
    #[wasm_bindgen(js_name = "generateFromConfig")]
    pub fn wasm_generate_from_config(config: JsValue, seed: Option<u64>) -> Result<JsValue, JsError> {
        let config: MazeConfig = serde_wasm_bindgen::from_value(config)?;
        let maze = Maze::generate(config, &mut rng_for(seed))?;
        to_js(&maze)
    }

    /// Mark names and weights, for mapping cells to colors.
    #[wasm_bindgen(js_name = "markTable")]
    pub fn wasm_mark_table() -> Result<JsValue, JsError> {
        Ok(serde_wasm_bindgen::to_value(&mark_table())?)
    }

    /// Ping function to verify WASM is loaded.
    #[wasm_bindgen(js_name = "ping")]
    pub fn wasm_ping() -> String {
        "WASM maze generator ready".to_string()
    }
}
