//! Scene composition and procedural rendering for vista.
//!
//! A [`Scene`] is built from four character grids and the weather it should
//! depict. Every displayed cell is computed on demand by
//! [`Scene::get_cell`] from the cell position and the elapsed time, sampling
//! a shared [`NoiseField`] for wind gusts, rain and drifting clouds.
//! Switching between scenes is sequenced by the [`TransitionController`].

mod chars;
mod error;
mod loader;
mod noise;
mod render;
mod scene;
mod transition;

pub use chars::{BLANK, RAIN, SLANTED_RAIN};
pub use error::LoadError;
pub use loader::{DEPTH_FILE, FOREGROUND_FILE, WIND_FILE, background_file, load_scene};
pub use noise::NoiseField;
pub use scene::{Grid, RawGrid, SKY_DEPTH, Scene, SceneLayers};
pub use transition::{Phase, TransitionController};
