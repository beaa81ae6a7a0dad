//! Character constants for scene rendering.

/// Drawn for cells outside the scene and for cells hidden by a wipe.
pub const BLANK: char = ' ';

/// Falling rain in calm or breezy weather.
pub const RAIN: char = '|';

/// Rain driven sideways by a stiff wind.
pub const SLANTED_RAIN: char = '/';
