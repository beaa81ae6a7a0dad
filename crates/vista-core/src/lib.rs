//! Core types shared across the vista crates.
//!
//! Weather is described by five independent ordinal axes which together form
//! [`WeatherAttributes`]. Rendered cells carry a [`CellStyle`], which is
//! translated for the terminal through a [`ColorProfile`].

mod profile;
mod style;
mod weather;

pub use profile::{Ansi16, Ansi256, ColorProfile, ColorProfileKind, NoColor, TrueColor, indexed_to_rgb};
pub use style::CellStyle;
pub use weather::{Cloudiness, Raininess, TimeOfDay, Visibility, WeatherAttributes, Windiness};
