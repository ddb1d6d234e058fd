// ── Refresh throttle ──
//
// Minimum spacing between refresh attempts. The window runs from the
// start of the last attempt, so callers that arrive while a refresh is
// still in flight are turned away as well.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

/// Last-attempt timestamp plus window length.
#[derive(Debug)]
pub struct Throttle {
    window: Duration,
    last_attempt: Mutex<Option<Instant>>,
}

impl Throttle {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_attempt: Mutex::new(None),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Claim the next attempt. Returns `false` if the previous attempt
    /// started less than `window` ago; otherwise stamps now and returns
    /// `true`.
    pub fn try_acquire(&self) -> bool {
        let now = Instant::now();
        let mut last = self
            .last_attempt
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match *last {
            Some(at) if now.duration_since(at) < self.window => false,
            _ => {
                *last = Some(now);
                true
            }
        }
    }

    /// Time left until the next attempt is allowed.
    pub fn remaining(&self) -> Duration {
        let last = self
            .last_attempt
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        last.map_or(Duration::ZERO, |at| self.window.saturating_sub(at.elapsed()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn second_attempt_inside_window_is_refused() {
        let throttle = Throttle::new(Duration::from_secs(30));
        assert!(throttle.try_acquire());
        assert!(!throttle.try_acquire());

        tokio::time::advance(Duration::from_secs(29)).await;
        assert!(!throttle.try_acquire());
        assert_eq!(throttle.remaining(), Duration::from_secs(1));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(throttle.try_acquire());
    }

    #[tokio::test(start_paused = true)]
    async fn refused_attempt_does_not_extend_window() {
        let throttle = Throttle::new(Duration::from_secs(30));
        assert!(throttle.try_acquire());
        tokio::time::advance(Duration::from_secs(20)).await;
        assert!(!throttle.try_acquire());
        tokio::time::advance(Duration::from_secs(10)).await;
        assert!(throttle.try_acquire());
    }

    #[test]
    fn zero_window_never_throttles() {
        let throttle = Throttle::new(Duration::ZERO);
        assert!(throttle.try_acquire());
        assert!(throttle.try_acquire());
    }

    #[test]
    fn poisoned_lock_still_throttles() {
        let throttle = Throttle::new(Duration::from_secs(30));
        let joined = std::thread::scope(|s| {
            s.spawn(|| {
                let _guard = throttle.last_attempt.lock().unwrap();
                panic!("holder died");
            })
            .join()
        });
        assert!(joined.is_err());
        assert!(throttle.last_attempt.is_poisoned());

        assert_eq!(throttle.remaining(), Duration::ZERO);
        assert!(throttle.try_acquire());
        assert!(!throttle.try_acquire());
        assert!(throttle.remaining() > Duration::ZERO);
    }
}
