use std::time::Duration;
use std::{fmt, ops};

use instant::Instant;
use serde::{Deserialize, Serialize};


// Time since the board was created. All animation code takes time as an explicit parameter
// rather than reading the system clock, so that tests can step through animations frame by
// frame.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct AnimationInstant {
    elapsed_since_epoch: Duration,
}

impl AnimationInstant {
    pub const EPOCH: Self = AnimationInstant { elapsed_since_epoch: Duration::ZERO };

    pub fn from_duration(elapsed_since_epoch: Duration) -> Self {
        AnimationInstant { elapsed_since_epoch }
    }
    pub fn from_millis(ms: u64) -> Self {
        AnimationInstant::from_duration(Duration::from_millis(ms))
    }
    pub fn from_now(epoch: Instant, now: Instant) -> Self {
        let elapsed = if now > epoch { now - epoch } else { Duration::ZERO };
        AnimationInstant::from_duration(elapsed)
    }

    pub fn elapsed_since_epoch(self) -> Duration { self.elapsed_since_epoch }

    // Zero if `earlier` is actually later. Ticks may arrive with slightly out-of-order
    // timestamps and that should never make an animation go backwards.
    pub fn duration_since(self, earlier: AnimationInstant) -> Duration {
        self.elapsed_since_epoch.saturating_sub(earlier.elapsed_since_epoch)
    }
}

impl ops::Add<Duration> for AnimationInstant {
    type Output = Self;
    fn add(self, d: Duration) -> Self { AnimationInstant::from_duration(self.elapsed_since_epoch + d) }
}

impl ops::AddAssign<Duration> for AnimationInstant {
    fn add_assign(&mut self, d: Duration) { self.elapsed_since_epoch += d; }
}

impl fmt::Debug for AnimationInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AnimationInstant({}ms)", self.elapsed_since_epoch.as_millis())
    }
}


// Converts wall time into `AnimationInstant`s. Front-ends create one per board.
#[derive(Clone, Copy, Debug)]
pub struct AnimationClock {
    epoch: Instant,
}

impl AnimationClock {
    pub fn new() -> Self { AnimationClock { epoch: Instant::now() } }
    pub fn instant_at(&self, now: Instant) -> AnimationInstant {
        AnimationInstant::from_now(self.epoch, now)
    }
    pub fn now(&self) -> AnimationInstant { self.instant_at(Instant::now()) }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_since_saturates() {
        let t0 = AnimationInstant::from_millis(100);
        let t1 = t0 + Duration::from_millis(50);
        assert_eq!(t1.duration_since(t0), Duration::from_millis(50));
        assert_eq!(t0.duration_since(t1), Duration::ZERO);
    }

    #[test]
    fn clock_is_monotonic() {
        let clock = AnimationClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
