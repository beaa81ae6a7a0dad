//! Crossfade sequencing between scenes.
//!
//! When the weather changes the current scene is wiped away diagonally, the
//! incoming scene is swapped in once the screen is fully covered, and the
//! wipe then retreats to reveal it. The incoming scene is composed in the
//! background and may not be ready when the wipe completes; in that case
//! the screen stays covered until it arrives.

use tracing::debug;
use vista_core::WeatherAttributes;

use crate::scene::Scene;

/// Number of fade ticks between an uncovered and a fully covered screen.
const FADE_STEPS: u8 = 20;

/// Observable transition state. Progress is in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Stable,
    FadingOut(f32),
    FadingIn(f32),
}

/// Internal state, counted in whole fade steps so progress never drifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Stable,
    FadingOut(u8),
    FadingIn(u8),
}

/// Owns the displayed scene and sequences the switch to a new one.
#[derive(Debug)]
pub struct TransitionController {
    state: State,
    /// Scene currently on screen.
    active: Option<Scene>,
    /// Incoming scene, once composed.
    pending: Option<Scene>,
    /// Weather the most recently requested scene is being composed for.
    target: Option<WeatherAttributes>,
}

impl Default for TransitionController {
    fn default() -> Self {
        Self::new()
    }
}

impl TransitionController {
    pub fn new() -> Self {
        Self {
            state: State::Stable,
            active: None,
            pending: None,
            target: None,
        }
    }

    pub fn phase(&self) -> Phase {
        match self.state {
            State::Stable => Phase::Stable,
            State::FadingOut(step) => Phase::FadingOut(to_progress(step)),
            State::FadingIn(step) => Phase::FadingIn(to_progress(step)),
        }
    }

    /// How much of the screen the wipe currently covers.
    pub fn progress(&self) -> f32 {
        match self.state {
            State::Stable => 0.0,
            State::FadingOut(step) | State::FadingIn(step) => to_progress(step),
        }
    }

    /// Whether fade ticks are needed.
    pub fn is_fading(&self) -> bool {
        self.state != State::Stable
    }

    pub fn active(&self) -> Option<&Scene> {
        self.active.as_ref()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Record newly polled weather.
    ///
    /// Returns `true` when a scene must be composed for `attributes`. If a
    /// scene is already on screen this also starts wiping it away.
    pub fn request(&mut self, attributes: WeatherAttributes) -> bool {
        if self.target == Some(attributes) {
            return false;
        }
        self.target = Some(attributes);
        // Anything composed for older weather is stale now.
        self.pending = None;

        if self.active.is_some() {
            self.state = match self.state {
                State::Stable => State::FadingOut(0),
                // Reverse from wherever the reveal had got to.
                State::FadingIn(step) => State::FadingOut(step),
                fading_out => fading_out,
            };
            debug!(state = ?self.state, "weather changed, fading out");
        }
        true
    }

    /// Hand over a composed scene.
    ///
    /// The first scene is shown immediately. Later scenes are held until the
    /// fade-out completes. Scenes composed for weather that has since been
    /// superseded are dropped and `false` is returned.
    pub fn offer(&mut self, scene: Scene) -> bool {
        if self.active.is_none() {
            self.active = Some(scene);
            self.state = State::Stable;
            return true;
        }
        if self.target != Some(scene.attributes()) {
            debug!(attributes = ?scene.attributes(), "dropping stale scene");
            return false;
        }
        self.pending = Some(scene);
        if self.state == State::Stable {
            self.state = State::FadingOut(0);
        }
        true
    }

    /// The scene for `attributes` could not be built.
    ///
    /// Forgets the request so the next poll asks for it again, and returns
    /// `true`. A running fade-out stays covered in the meantime. Failures for
    /// weather that has since been superseded leave the newer request alone
    /// and return `false`.
    pub fn abandon_request(&mut self, attributes: WeatherAttributes) -> bool {
        if self.target != Some(attributes) {
            debug!(?attributes, "ignoring failure for stale weather");
            return false;
        }
        self.target = None;
        true
    }

    /// Advance the fade by one tick.
    pub fn tick(&mut self) {
        let next = match self.state {
            State::Stable => return,
            State::FadingOut(FADE_STEPS) => match self.pending.take() {
                Some(scene) => {
                    self.active = Some(scene);
                    State::FadingIn(FADE_STEPS)
                }
                // Stall fully covered until the incoming scene is ready.
                None => State::FadingOut(FADE_STEPS),
            },
            State::FadingOut(step) => State::FadingOut(step + 1),
            State::FadingIn(0) => State::Stable,
            State::FadingIn(step) => State::FadingIn(step - 1),
        };
        if std::mem::discriminant(&next) != std::mem::discriminant(&self.state) {
            debug!(state = ?next, "transition phase changed");
        }
        self.state = next;
    }

    /// Whether the cell at offset `(dx, dy)` from the viewport origin is
    /// hidden by the wipe.
    pub fn is_wiped(&self, dx: u16, dy: u16, view_width: u16, view_height: u16) -> bool {
        let position = (dx / 2) as f32 + dy as f32;
        let extent = (view_width / 2) as f32 + view_height as f32;
        position < self.progress() * extent
    }
}

fn to_progress(step: u8) -> f32 {
    step as f32 / FADE_STEPS as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{SceneLayers, grid};
    use vista_core::{Raininess, TimeOfDay};

    fn scene(attributes: WeatherAttributes) -> Scene {
        Scene::compose(
            SceneLayers {
                foreground: grid(&["ab"]),
                windground: grid(&["AB"]),
                depth: grid(&["09"]),
                background: grid(&["cd"]),
            },
            attributes,
        )
    }

    fn sunny() -> WeatherAttributes {
        WeatherAttributes {
            time_of_day: TimeOfDay::Afternoon,
            ..Default::default()
        }
    }

    fn rainy() -> WeatherAttributes {
        WeatherAttributes {
            time_of_day: TimeOfDay::Afternoon,
            raininess: Raininess::Shower,
            ..Default::default()
        }
    }

    fn stable_with(attributes: WeatherAttributes) -> TransitionController {
        let mut controller = TransitionController::new();
        assert!(controller.request(attributes));
        assert!(controller.offer(scene(attributes)));
        controller
    }

    #[test]
    fn test_first_scene_shows_without_fade() {
        let controller = stable_with(sunny());
        assert_eq!(controller.phase(), Phase::Stable);
        assert_eq!(controller.active().map(Scene::attributes), Some(sunny()));
        assert!(!controller.is_fading());
    }

    #[test]
    fn test_unchanged_weather_needs_no_scene() {
        let mut controller = stable_with(sunny());
        assert!(!controller.request(sunny()));
        assert_eq!(controller.phase(), Phase::Stable);
    }

    #[test]
    fn test_full_crossfade() {
        let mut controller = stable_with(sunny());
        assert!(controller.request(rainy()));
        assert_eq!(controller.phase(), Phase::FadingOut(0.0));
        assert!(controller.offer(scene(rainy())));

        let mut last = 0.0;
        while let Phase::FadingOut(p) = controller.phase() {
            assert!(p >= last && p <= 1.0);
            // The old scene stays on screen while wiping.
            assert_eq!(controller.active().map(Scene::attributes), Some(sunny()));
            last = p;
            controller.tick();
        }
        assert_eq!(last, 1.0);
        assert_eq!(controller.phase(), Phase::FadingIn(1.0));
        assert_eq!(controller.active().map(Scene::attributes), Some(rainy()));
        assert!(!controller.has_pending());

        while let Phase::FadingIn(p) = controller.phase() {
            assert!(p <= last && p >= 0.0);
            last = p;
            controller.tick();
        }
        assert_eq!(last, 0.0);
        assert_eq!(controller.phase(), Phase::Stable);
    }

    #[test]
    fn test_fade_out_stalls_until_scene_ready() {
        let mut controller = stable_with(sunny());
        controller.request(rainy());
        for _ in 0..100 {
            controller.tick();
        }
        assert_eq!(controller.phase(), Phase::FadingOut(1.0));
        assert_eq!(controller.active().map(Scene::attributes), Some(sunny()));

        controller.offer(scene(rainy()));
        assert_eq!(controller.phase(), Phase::FadingOut(1.0));
        controller.tick();
        assert_eq!(controller.phase(), Phase::FadingIn(1.0));
        assert_eq!(controller.active().map(Scene::attributes), Some(rainy()));
    }

    #[test]
    fn test_stale_scene_is_dropped() {
        let mut controller = stable_with(sunny());
        controller.request(rainy());
        let foggy = WeatherAttributes {
            visibility: vista_core::Visibility::Fog,
            ..rainy()
        };
        assert!(controller.request(foggy));
        assert!(!controller.offer(scene(rainy())));
        assert!(!controller.has_pending());
        assert!(controller.offer(scene(foggy)));
        assert!(controller.has_pending());
    }

    #[test]
    fn test_new_weather_while_fading_in_reverses() {
        let mut controller = stable_with(sunny());
        controller.request(rainy());
        controller.offer(scene(rainy()));
        for _ in 0..24 {
            controller.tick();
        }
        let Phase::FadingIn(p) = controller.phase() else {
            panic!("expected to be fading in");
        };
        controller.request(sunny());
        assert_eq!(controller.phase(), Phase::FadingOut(p));
    }

    #[test]
    fn test_failed_composition_is_requested_again() {
        let mut controller = stable_with(sunny());
        assert!(controller.request(rainy()));
        assert!(controller.abandon_request(rainy()));
        assert!(controller.request(rainy()));
        assert!(matches!(controller.phase(), Phase::FadingOut(_)));
    }

    #[test]
    fn test_stale_failure_keeps_newer_request() {
        let mut controller = stable_with(sunny());
        controller.request(rainy());
        let foggy = WeatherAttributes {
            visibility: vista_core::Visibility::Fog,
            ..rainy()
        };
        controller.request(foggy);
        assert!(!controller.abandon_request(rainy()));

        assert!(controller.offer(scene(foggy)));
        for _ in 0..21 {
            controller.tick();
        }
        assert_eq!(controller.phase(), Phase::FadingIn(1.0));
        assert_eq!(controller.active().map(Scene::attributes), Some(foggy));
    }

    #[test]
    fn test_progress_stays_in_bounds() {
        let mut controller = stable_with(sunny());
        controller.request(rainy());
        for i in 0..200 {
            if i == 60 {
                controller.offer(scene(rainy()));
            }
            controller.tick();
            let p = controller.progress();
            assert!((0.0..=1.0).contains(&p));
        }
        assert_eq!(controller.phase(), Phase::Stable);
    }

    #[test]
    fn test_wipe_mask() {
        let mut controller = stable_with(sunny());
        // Nothing is hidden when stable.
        assert!(!controller.is_wiped(0, 0, 80, 24));

        controller.request(rainy());
        for _ in 0..10 {
            controller.tick();
        }
        // Half way: the frontier is at (80 / 2 + 24) / 2 = 32.
        assert!(controller.is_wiped(0, 0, 80, 24));
        assert!(controller.is_wiped(40, 11, 80, 24));
        assert!(!controller.is_wiped(40, 12, 80, 24));
        assert!(!controller.is_wiped(79, 23, 80, 24));

        for _ in 0..10 {
            controller.tick();
        }
        assert!(controller.is_wiped(79, 23, 80, 24));
    }
}
