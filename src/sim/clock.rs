//! Fixed-rate clock
//!
//! Turns variable frame times into whole simulation ticks at the session's
//! configured rate. The clock stops issuing ticks as soon as the session
//! reaches a terminal phase.

use super::state::GameState;
use crate::consts::MAX_SUBSTEPS;

#[derive(Debug, Clone)]
pub struct FixedStepClock {
    /// Seconds per tick
    step: f32,
    accumulator: f32,
    max_substeps: u32,
}

impl FixedStepClock {
    pub fn new(fps: u32) -> Self {
        Self {
            step: 1.0 / fps.max(1) as f32,
            accumulator: 0.0,
            max_substeps: MAX_SUBSTEPS,
        }
    }

    pub fn for_session(state: &GameState) -> Self {
        Self::new(state.settings.fps)
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Feed `dt` seconds of wall time and run the ticks that fit.
    /// Returns how many ticks ran.
    pub fn advance(&mut self, state: &mut GameState, dt: f32) -> u32 {
        // Clamp long stalls (tab switch, debugger)
        self.accumulator += dt.clamp(0.0, 0.1);

        let mut substeps = 0;
        while self.accumulator >= self.step && substeps < self.max_substeps {
            if state.is_finished() {
                self.accumulator = 0.0;
                break;
            }
            state.tick();
            self.accumulator -= self.step;
            substeps += 1;
        }
        substeps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::GamePhase;

    #[test]
    fn test_clock_issues_whole_ticks() {
        let mut state = GameState::new(Settings::default(), 1, 1);
        let mut clock = FixedStepClock::for_session(&state);
        let step = clock.step();

        assert_eq!(clock.advance(&mut state, step * 0.5), 0);
        assert_eq!(clock.advance(&mut state, step * 0.6), 1);
        assert_eq!(state.time_ticks, 1);
        assert_eq!(clock.advance(&mut state, step * 3.0), 3);
        assert_eq!(state.time_ticks, 4);
    }

    #[test]
    fn test_clock_caps_substeps() {
        let mut state = GameState::new(Settings::default(), 1, 1);
        let mut clock = FixedStepClock::new(1000);
        assert_eq!(clock.advance(&mut state, 0.05), MAX_SUBSTEPS);
    }

    #[test]
    fn test_clock_stops_at_terminal_phase() {
        let settings = Settings {
            hostiles_per_level: 0,
            ..Default::default()
        };
        let mut state = GameState::new(settings, 1, 1);
        let mut clock = FixedStepClock::for_session(&state);
        let ran = clock.advance(&mut state, 0.1);
        assert_eq!(ran, 1);
        assert_eq!(state.phase(), GamePhase::Victory);
        assert_eq!(clock.advance(&mut state, 0.1), 0);
    }
}
