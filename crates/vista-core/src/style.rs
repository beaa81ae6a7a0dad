//! Foreground/background color pairs for rendered cells.

use ratatui::style::Color;

use crate::profile::ColorProfile;

/// A foreground and background color from the 256-color palette.
///
/// The default value uses the terminal's own colors and is what blank and
/// out-of-bounds cells are drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellStyle {
    pub fg: Color,
    pub bg: Color,
}

impl Default for CellStyle {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl CellStyle {
    /// Terminal default colors.
    pub const NEUTRAL: CellStyle = CellStyle {
        fg: Color::Reset,
        bg: Color::Reset,
    };

    pub const fn indexed(fg: u8, bg: u8) -> Self {
        Self {
            fg: Color::Indexed(fg),
            bg: Color::Indexed(bg),
        }
    }

    /// Convert both colors to what the given profile can display.
    pub fn convert(self, profile: &dyn ColorProfile) -> Self {
        Self {
            fg: profile.convert(self.fg),
            bg: profile.convert(self.bg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{NoColor, TrueColor};

    #[test]
    fn test_default_is_neutral() {
        assert_eq!(CellStyle::default(), CellStyle::NEUTRAL);
    }

    #[test]
    fn test_convert_applies_to_both_colors() {
        let style = CellStyle::indexed(255, 232).convert(&TrueColor);
        assert_eq!(style.fg, Color::Rgb(238, 238, 238));
        assert_eq!(style.bg, Color::Rgb(8, 8, 8));

        let plain = CellStyle::indexed(255, 232).convert(&NoColor);
        assert_eq!(plain, CellStyle::NEUTRAL);
    }
}
