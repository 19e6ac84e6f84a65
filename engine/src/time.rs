use std::time::Duration;

/// Timing information for one update or draw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameTime {
    /// Game time accumulated since the first update.
    pub total: Duration,
    /// Game time covered by this step.
    pub elapsed: Duration,
    /// Set when a frame needed more than one fixed step to catch up.
    pub running_slowly: bool,
}

impl GameTime {
    pub fn delta_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }
}

/// Turns wall-clock frame deltas into update steps.
///
/// With a fixed step, time is accumulated and released in whole `target`
/// slices; whatever is left over carries into the next frame. Otherwise
/// each frame is one update covering the measured delta.
#[derive(Debug, Clone)]
pub struct FrameClock {
    target: Duration,
    max_elapsed: Duration,
    fixed: bool,
    accumulated: Duration,
    last: GameTime,
}

impl FrameClock {
    pub fn new(target: Duration, max_elapsed: Duration, fixed: bool) -> Self {
        Self {
            target: target.max(Duration::from_nanos(1)),
            max_elapsed,
            fixed,
            accumulated: Duration::ZERO,
            last: GameTime::default(),
        }
    }

    /// The most recent step, used for drawing.
    pub fn time(&self) -> GameTime {
        self.last
    }

    pub fn advance(&mut self, delta: Duration) -> Steps {
        let delta = delta.min(self.max_elapsed);
        let start = self.last.total;

        if !self.fixed {
            self.last = GameTime {
                total: start + delta,
                elapsed: delta,
                running_slowly: false,
            };
            return Steps {
                remaining: 1,
                step: delta,
                total: start,
                running_slowly: false,
            };
        }

        self.accumulated += delta;
        let count = self.accumulated.as_nanos() / self.target.as_nanos();
        let count = u32::try_from(count).unwrap_or(u32::MAX);
        self.accumulated -= self.target * count;

        let running_slowly = count > 1;
        if count > 0 {
            self.last = GameTime {
                total: start + self.target * count,
                elapsed: self.target,
                running_slowly,
            };
        }
        Steps {
            remaining: count,
            step: self.target,
            total: start,
            running_slowly,
        }
    }
}

/// Updates owed for one frame, produced by [`FrameClock::advance`].
#[derive(Debug, Clone)]
pub struct Steps {
    remaining: u32,
    step: Duration,
    total: Duration,
    running_slowly: bool,
}

impl Iterator for Steps {
    type Item = GameTime;

    fn next(&mut self) -> Option<GameTime> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.total += self.step;
        Some(GameTime {
            total: self.total,
            elapsed: self.step,
            running_slowly: self.running_slowly,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Steps {}

#[cfg(test)]
mod tests {
    use super::*;

    const STEP: Duration = Duration::from_nanos(16_666_666);
    const MAX: Duration = Duration::from_millis(500);

    fn fixed() -> FrameClock {
        FrameClock::new(STEP, MAX, true)
    }

    #[test]
    fn short_frame_owes_nothing() {
        let mut clock = fixed();
        assert_eq!(clock.advance(Duration::from_millis(5)).len(), 0);
        assert_eq!(clock.time(), GameTime::default());
    }

    #[test]
    fn leftover_carries_into_next_frame() {
        let mut clock = fixed();
        assert_eq!(clock.advance(Duration::from_millis(10)).len(), 0);
        let steps: Vec<_> = clock.advance(Duration::from_millis(10)).collect();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].elapsed, STEP);
        assert_eq!(steps[0].total, STEP);
        assert!(!steps[0].running_slowly);
    }

    #[test]
    fn slow_frame_catches_up() {
        let mut clock = fixed();
        let steps: Vec<_> = clock.advance(Duration::from_millis(40)).collect();
        assert_eq!(steps.len(), 2);
        assert!(steps.iter().all(|t| t.running_slowly));
        assert_eq!(steps[1].total, STEP * 2);
        assert_eq!(clock.time().total, STEP * 2);
    }

    #[test]
    fn stall_is_capped() {
        let mut clock = fixed();
        let steps = clock.advance(Duration::from_secs(5));
        assert_eq!(steps.len(), 30);
    }

    #[test]
    fn variable_step_passes_delta_through() {
        let mut clock = FrameClock::new(STEP, MAX, false);
        let steps: Vec<_> = clock.advance(Duration::from_millis(7)).collect();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].elapsed, Duration::from_millis(7));
        assert_eq!(steps[0].total, Duration::from_millis(7));

        let steps: Vec<_> = clock.advance(Duration::from_millis(3)).collect();
        assert_eq!(steps[0].total, Duration::from_millis(10));
        assert_eq!(clock.time().elapsed, Duration::from_millis(3));
    }

    #[test]
    fn delta_seconds() {
        let time = GameTime {
            elapsed: Duration::from_millis(250),
            ..GameTime::default()
        };
        assert!((time.delta_seconds() - 0.25).abs() < f32::EPSILON);
    }
}
