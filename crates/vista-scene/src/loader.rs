//! Loading scene assets from disk.
//!
//! A scene directory holds a foreground, a windswept variant of it, a depth
//! map and one backdrop per time of day.

use std::fs;
use std::path::Path;

use vista_core::{TimeOfDay, WeatherAttributes};

use crate::error::LoadError;
use crate::scene::{RawGrid, Scene, SceneLayers};

pub const FOREGROUND_FILE: &str = "foreground.txt";
pub const WIND_FILE: &str = "wind.txt";
pub const DEPTH_FILE: &str = "depth.txt";

/// Backdrop file drawn behind the sky at the given time of day.
pub fn background_file(time: TimeOfDay) -> &'static str {
    match time {
        TimeOfDay::EarlyMorning => "early.txt",
        TimeOfDay::Morning => "morning.txt",
        TimeOfDay::Afternoon => "afternoon.txt",
        TimeOfDay::Night => "night.txt",
    }
}

/// Split raw file contents into rows of characters.
///
/// Invalid UTF-8 sequences are skipped rather than rejected.
fn parse_grid(bytes: &[u8]) -> RawGrid {
    let text: String = bytes.utf8_chunks().map(|chunk| chunk.valid()).collect();
    text.lines().map(|line| line.chars().collect()).collect()
}

/// Read one character grid from `path`.
fn read_grid(path: &Path) -> Result<RawGrid, LoadError> {
    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_grid(&bytes))
}

/// Load the assets in `dir` and compose a scene for `attributes`.
pub fn load_scene(dir: &Path, attributes: WeatherAttributes) -> Result<Scene, LoadError> {
    let layers = SceneLayers {
        foreground: read_grid(&dir.join(FOREGROUND_FILE))?,
        windground: read_grid(&dir.join(WIND_FILE))?,
        depth: read_grid(&dir.join(DEPTH_FILE))?,
        background: read_grid(&dir.join(background_file(attributes.time_of_day)))?,
    };
    let scene = Scene::compose(layers, attributes);
    tracing::info!(
        dir = %dir.display(),
        width = scene.width(),
        height = scene.height(),
        "composed scene"
    );
    Ok(scene)
}
