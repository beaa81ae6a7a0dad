//! Terminal color profiles.
//!
//! Scenes are styled with the 256-color palette. A [`ColorProfile`] maps those
//! colors onto whatever the attached terminal can actually show.

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Converts a color into one the target terminal supports.
pub trait ColorProfile: Send + Sync {
    fn convert(&self, color: Color) -> Color;
}

/// 24-bit color terminals. Indexed colors are expanded to RGB.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrueColor;

impl ColorProfile for TrueColor {
    fn convert(&self, color: Color) -> Color {
        match color {
            Color::Indexed(index) => {
                let (r, g, b) = indexed_to_rgb(index);
                Color::Rgb(r, g, b)
            }
            other => other,
        }
    }
}

/// 256-color terminals. The scene palette passes through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ansi256;

impl ColorProfile for Ansi256 {
    fn convert(&self, color: Color) -> Color {
        match color {
            Color::Rgb(r, g, b) => Color::Indexed(rgb_to_ansi256(r, g, b)),
            other => other,
        }
    }
}

/// 16-color terminals. Colors snap to the nearest basic ANSI color.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ansi16;

impl ColorProfile for Ansi16 {
    fn convert(&self, color: Color) -> Color {
        match color {
            Color::Indexed(index) if index < 16 => ANSI16[index as usize].0,
            Color::Indexed(index) => {
                let (r, g, b) = indexed_to_rgb(index);
                nearest_ansi16(r, g, b)
            }
            Color::Rgb(r, g, b) => nearest_ansi16(r, g, b),
            other => other,
        }
    }
}

/// Terminals without color support.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoColor;

impl ColorProfile for NoColor {
    fn convert(&self, _color: Color) -> Color {
        Color::Reset
    }
}

/// Selectable color profile, as written in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorProfileKind {
    TrueColor,
    Ansi256,
    Ansi16,
    NoColor,
}

impl ColorProfileKind {
    /// Guess the profile from `NO_COLOR`, `COLORTERM` and `TERM`.
    pub fn detect() -> Self {
        Self::from_env(
            std::env::var_os("NO_COLOR").is_some(),
            std::env::var("COLORTERM").ok().as_deref(),
            std::env::var("TERM").ok().as_deref(),
        )
    }

    fn from_env(no_color: bool, colorterm: Option<&str>, term: Option<&str>) -> Self {
        if no_color {
            return ColorProfileKind::NoColor;
        }
        if matches!(colorterm, Some("truecolor" | "24bit")) {
            return ColorProfileKind::TrueColor;
        }
        match term {
            None | Some("dumb") => ColorProfileKind::NoColor,
            Some(t) if t.contains("256color") => ColorProfileKind::Ansi256,
            Some(_) => ColorProfileKind::Ansi16,
        }
    }

    pub fn profile(self) -> Box<dyn ColorProfile> {
        match self {
            ColorProfileKind::TrueColor => Box::new(TrueColor),
            ColorProfileKind::Ansi256 => Box::new(Ansi256),
            ColorProfileKind::Ansi16 => Box::new(Ansi16),
            ColorProfileKind::NoColor => Box::new(NoColor),
        }
    }
}

const ANSI16: [(Color, (u8, u8, u8)); 16] = [
    (Color::Black, (0, 0, 0)),
    (Color::Red, (128, 0, 0)),
    (Color::Green, (0, 128, 0)),
    (Color::Yellow, (128, 128, 0)),
    (Color::Blue, (0, 0, 128)),
    (Color::Magenta, (128, 0, 128)),
    (Color::Cyan, (0, 128, 128)),
    (Color::Gray, (192, 192, 192)),
    (Color::DarkGray, (128, 128, 128)),
    (Color::LightRed, (255, 0, 0)),
    (Color::LightGreen, (0, 255, 0)),
    (Color::LightYellow, (255, 255, 0)),
    (Color::LightBlue, (0, 0, 255)),
    (Color::LightMagenta, (255, 0, 255)),
    (Color::LightCyan, (0, 255, 255)),
    (Color::White, (255, 255, 255)),
];

const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

/// RGB value of an xterm 256-color palette entry.
pub fn indexed_to_rgb(index: u8) -> (u8, u8, u8) {
    match index {
        0..=15 => ANSI16[index as usize].1,
        16..=231 => {
            let i = index - 16;
            (
                CUBE_LEVELS[(i / 36) as usize],
                CUBE_LEVELS[((i / 6) % 6) as usize],
                CUBE_LEVELS[(i % 6) as usize],
            )
        }
        232..=255 => {
            let v = 8 + (index - 232) * 10;
            (v, v, v)
        }
    }
}

fn distance(a: (u8, u8, u8), b: (u8, u8, u8)) -> u32 {
    let dr = a.0 as i32 - b.0 as i32;
    let dg = a.1 as i32 - b.1 as i32;
    let db = a.2 as i32 - b.2 as i32;
    (dr * dr + dg * dg + db * db) as u32
}

fn nearest_ansi16(r: u8, g: u8, b: u8) -> Color {
    ANSI16
        .iter()
        .min_by_key(|(_, rgb)| distance(*rgb, (r, g, b)))
        .map(|(color, _)| *color)
        .unwrap_or(Color::Reset)
}

fn rgb_to_ansi256(r: u8, g: u8, b: u8) -> u8 {
    (16..=255u8)
        .min_by_key(|&index| distance(indexed_to_rgb(index), (r, g, b)))
        .unwrap_or(16)
}
