//! Regeneration policy for interactive callers.

use std::time::Duration;

/// Fires once per elapsed whole second.
///
/// The first poll always fires; after that a poll fires only when
/// `floor(elapsed)` has increased since the last firing. A caller that
/// stalls for several seconds gets a single firing for the latest second.
#[derive(Debug, Clone, Default)]
pub struct RegenSchedule {
    last_tick: Option<u64>,
}

impl RegenSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the new whole-second tick if regeneration is due.
    pub fn poll(&mut self, elapsed: Duration) -> Option<u64> {
        let tick = elapsed.as_secs();
        match self.last_tick {
            Some(last) if tick <= last => None,
            _ => {
                self.last_tick = Some(tick);
                Some(tick)
            }
        }
    }

    /// The tick of the last firing, if any.
    pub fn last_tick(&self) -> Option<u64> {
        self.last_tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_poll_fires() {
        let mut schedule = RegenSchedule::new();
        assert_eq!(schedule.poll(Duration::from_millis(0)), Some(0));
        assert_eq!(schedule.last_tick(), Some(0));
    }

    #[test]
    fn test_fires_once_per_second() {
        let mut schedule = RegenSchedule::new();
        let fired: Vec<u64> = (0..=30)
            .filter_map(|ms| schedule.poll(Duration::from_millis(ms * 100)))
            .collect();
        assert_eq!(fired, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_skipped_seconds_fire_once() {
        let mut schedule = RegenSchedule::new();
        assert_eq!(schedule.poll(Duration::from_millis(500)), Some(0));
        assert_eq!(schedule.poll(Duration::from_millis(4200)), Some(4));
        assert_eq!(schedule.poll(Duration::from_millis(4900)), None);
        assert_eq!(schedule.poll(Duration::from_millis(5000)), Some(5));
    }

    #[test]
    fn test_time_going_backwards_does_not_fire() {
        let mut schedule = RegenSchedule::new();
        schedule.poll(Duration::from_secs(3));
        assert_eq!(schedule.poll(Duration::from_secs(1)), None);
    }
}
