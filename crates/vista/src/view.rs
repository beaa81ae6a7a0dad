//! Drawing the active scene into the terminal buffer.

use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};
use vista_core::{CellStyle, ColorProfile};
use vista_scene::{BLANK, TransitionController};

/// Widget drawing the active scene centered in its area, masked by any
/// running wipe transition.
pub struct SceneView<'a> {
    transition: &'a TransitionController,
    /// Whole seconds since startup.
    elapsed: f64,
    profile: &'a dyn ColorProfile,
}

impl<'a> SceneView<'a> {
    pub fn new(transition: &'a TransitionController, elapsed: f64, profile: &'a dyn ColorProfile) -> Self {
        Self {
            transition,
            elapsed,
            profile,
        }
    }
}

impl Widget for SceneView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(scene) = self.transition.active() else {
            return;
        };

        // Center scene in the area
        let x_off = (scene.width() as i32 - area.width as i32) / 2;
        let y_off = (scene.height() as i32 - area.height as i32) / 2;

        for dy in 0..area.height {
            for dx in 0..area.width {
                let (ch, style) = if self.transition.is_wiped(dx, dy, area.width, area.height) {
                    (BLANK, CellStyle::NEUTRAL)
                } else {
                    scene.get_cell(x_off + dx as i32, y_off + dy as i32, self.elapsed)
                };
                let style = style.convert(self.profile);
                if let Some(cell) = buf.cell_mut((area.x + dx, area.y + dy)) {
                    cell.set_char(ch).set_fg(style.fg).set_bg(style.bg);
                }
            }
        }
    }
}

/// Greedy word wrap of `text` to lines of at most `width` characters.
///
/// Words longer than `width` are kept whole on their own line.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.trim().lines() {
        let mut line = String::new();
        let mut line_len = 0;
        for word in paragraph.split_whitespace() {
            let word_len = word.chars().count();
            if line_len > 0 && line_len + 1 + word_len > width {
                lines.push(std::mem::take(&mut line));
                line_len = 0;
            }
            if line_len > 0 {
                line.push(' ');
                line_len += 1;
            }
            line.push_str(word);
            line_len += word_len;
        }
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;
    use vista_core::{Ansi256, NoColor, TimeOfDay, WeatherAttributes};
    use vista_scene::{Scene, SceneLayers};

    fn rows(rows: &[&str]) -> Vec<Vec<char>> {
        rows.iter().map(|row| row.chars().collect()).collect()
    }

    fn showing_scenario() -> TransitionController {
        let attributes = WeatherAttributes {
            time_of_day: TimeOfDay::Afternoon,
            ..Default::default()
        };
        let scene = Scene::compose(
            SceneLayers {
                foreground: rows(&["abc"]),
                windground: rows(&["XYZ"]),
                depth: rows(&["009"]),
                background: rows(&["def"]),
            },
            attributes,
        );
        let mut transition = TransitionController::new();
        transition.request(attributes);
        transition.offer(scene);
        transition
    }

    #[test]
    fn test_scene_is_centered() {
        let transition = showing_scenario();
        let area = Rect::new(0, 0, 5, 3);
        let mut buf = Buffer::empty(area);
        SceneView::new(&transition, 0.0, &Ansi256).render(area, &mut buf);

        assert_eq!(buf[(1, 1)].symbol(), "a");
        assert_eq!(buf[(2, 1)].symbol(), "b");
        assert_eq!(buf[(3, 1)].symbol(), "f");
        assert_eq!(buf[(3, 1)].bg, Color::Indexed(236));
        assert_eq!(buf[(0, 0)].symbol(), " ");
        assert_eq!(buf[(0, 0)].bg, Color::Reset);
        assert_eq!(buf[(4, 2)].symbol(), " ");
    }

    #[test]
    fn test_profile_is_applied() {
        let transition = showing_scenario();
        let area = Rect::new(0, 0, 3, 1);
        let mut buf = Buffer::empty(area);
        SceneView::new(&transition, 0.0, &NoColor).render(area, &mut buf);
        assert_eq!(buf[(0, 0)].symbol(), "a");
        assert_eq!(buf[(0, 0)].fg, Color::Reset);
    }

    #[test]
    fn test_wipe_blanks_cells() {
        let mut transition = showing_scenario();
        transition.request(WeatherAttributes::default());
        for _ in 0..20 {
            transition.tick();
        }
        let area = Rect::new(0, 0, 3, 1);
        let mut buf = Buffer::empty(area);
        SceneView::new(&transition, 0.0, &Ansi256).render(area, &mut buf);
        for x in 0..3 {
            assert_eq!(buf[(x, 0)].symbol(), " ");
        }
    }

    #[test]
    fn test_empty_controller_draws_nothing() {
        let transition = TransitionController::new();
        let area = Rect::new(0, 0, 4, 2);
        let mut buf = Buffer::empty(area);
        SceneView::new(&transition, 0.0, &Ansi256).render(area, &mut buf);
        assert_eq!(buf, Buffer::empty(area));
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(
            wrap_text("It's a clear night with no breeze.", 12),
            vec!["It's a clear", "night with", "no breeze."]
        );
        assert_eq!(wrap_text("one\ntwo three\n", 20), vec!["one", "two three"]);
        assert_eq!(wrap_text("supercalifragilistic", 5), vec!["supercalifragilistic"]);
        assert!(wrap_text("", 10).is_empty());
    }
}
