//! Scene composition from raw character grids.

use vista_core::WeatherAttributes;

use crate::noise::NoiseField;

/// Depth value marking a transparent foreground cell that shows the sky.
pub const SKY_DEPTH: u8 = 9;

/// A character grid as loaded from disk. Rows may differ in length.
pub type RawGrid = Vec<Vec<char>>;

/// The four raw layers a scene is composed from.
#[derive(Debug, Clone, Default)]
pub struct SceneLayers {
    pub foreground: RawGrid,
    pub windground: RawGrid,
    pub depth: RawGrid,
    pub background: RawGrid,
}

/// A rectangular grid stored row-major in a flat buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T: Copy> Grid<T> {
    /// Crop `rows` to `width` x `height`, converting each cell with `f`.
    ///
    /// Every one of the first `height` rows must hold at least `width` cells.
    fn crop(rows: &[Vec<char>], width: usize, height: usize, mut f: impl FnMut(char) -> T) -> Self {
        let mut cells = Vec::with_capacity(width * height);
        for row in &rows[..height] {
            cells.extend(row[..width].iter().map(|&c| f(c)));
        }
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<T> {
        if x < self.width && y < self.height {
            self.cells.get(y * self.width + x).copied()
        } else {
            None
        }
    }

    /// Cell at a flat index already checked against the bounds.
    pub(crate) fn at(&self, index: usize) -> T {
        self.cells[index]
    }
}

/// Everything needed to draw an animated landscape for one forecast.
///
/// Scenes are immutable once composed. A change in weather builds a new one.
#[derive(Debug)]
pub struct Scene {
    pub(crate) foreground: Grid<char>,
    pub(crate) windground: Grid<char>,
    pub(crate) depth: Grid<u8>,
    pub(crate) background: Grid<char>,
    pub(crate) attributes: WeatherAttributes,
    pub(crate) noise: NoiseField,
}

impl Scene {
    /// Align the four layers into one rectangular scene.
    ///
    /// All layers are cropped to the fewest rows of any layer, then to the
    /// shortest row of any layer. Ragged input is never padded.
    pub fn compose(layers: SceneLayers, attributes: WeatherAttributes) -> Self {
        let all = [
            &layers.foreground,
            &layers.windground,
            &layers.depth,
            &layers.background,
        ];

        let height = all.iter().map(|grid| grid.len()).min().unwrap_or(0);
        let width = (0..height)
            .map(|y| all.iter().map(|grid| grid[y].len()).min().unwrap_or(0))
            .min()
            .unwrap_or(0);

        let mut clamped = 0usize;
        let depth = Grid::crop(&layers.depth, width, height, |c| match c.to_digit(10) {
            Some(d) => d as u8,
            None => {
                clamped += 1;
                0
            }
        });
        if clamped > 0 {
            tracing::debug!(clamped, "depth map has non-digit cells, treating them as depth 0");
        }

        Self {
            foreground: Grid::crop(&layers.foreground, width, height, |c| c),
            windground: Grid::crop(&layers.windground, width, height, |c| c),
            depth,
            background: Grid::crop(&layers.background, width, height, |c| c),
            attributes,
            noise: NoiseField::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.foreground.width
    }

    pub fn height(&self) -> usize {
        self.foreground.height
    }

    /// The weather this scene was composed for.
    pub fn attributes(&self) -> WeatherAttributes {
        self.attributes
    }

    pub fn foreground(&self) -> &Grid<char> {
        &self.foreground
    }

    pub fn windground(&self) -> &Grid<char> {
        &self.windground
    }

    pub fn depth(&self) -> &Grid<u8> {
        &self.depth
    }

    pub fn background(&self) -> &Grid<char> {
        &self.background
    }

    /// Flat index of `(x, y)`, or `None` when it lies outside the scene.
    pub(crate) fn index(&self, x: i32, y: i32) -> Option<usize> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        (x < self.width() && y < self.height()).then(|| y * self.width() + x)
    }
}

#[cfg(test)]
pub(crate) fn grid(rows: &[&str]) -> RawGrid {
    rows.iter().map(|row| row.chars().collect()).collect()
}
