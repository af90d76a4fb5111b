// Cooperative animation scheduler.
//
// Tweens are driven by an external per-frame `tick`. All callbacks run synchronously inside
// `start_tween` and `tick`, on the caller's turn, so a batch of tweens never exposes partial
// state to pointer handling or to public board methods.
//
// There is no cancellation: a tween always runs to completion. Callbacks that may outlive the
// thing they animate must check external state (e.g. whether the visual still exists).

use std::time::Duration;

use log::debug;

use crate::clock::AnimationInstant;


pub type UpdateFn<C> = Box<dyn FnMut(&mut C, f64)>;
pub type CompleteFn<C> = Box<dyn FnOnce(&mut C)>;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct TweenId(u64);

struct Tween<C> {
    id: TweenId,
    start: AnimationInstant,
    duration: Duration,
    on_update: UpdateFn<C>,
    on_complete: CompleteFn<C>,
}

impl<C> Tween<C> {
    // Normalized progress. Zero-length tweens are finished as soon as they are ticked.
    fn progress(&self, now: AnimationInstant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        now.duration_since(self.start).as_secs_f64() / self.duration.as_secs_f64()
    }
}

// `C` is the context that callbacks mutate. The scheduler is stored separately from the context
// so that callbacks can get `&mut C` while the scheduler iterates over its tweens.
pub struct Scheduler<C> {
    tweens: Vec<Tween<C>>,
    next_id: u64,
}

impl<C> Scheduler<C> {
    pub fn new() -> Self { Scheduler { tweens: Vec::new(), next_id: 0 } }

    pub fn num_live(&self) -> usize { self.tweens.len() }
    pub fn is_idle(&self) -> bool { self.tweens.is_empty() }

    // Registers a tween and immediately reports progress 0 so that the start state is visible
    // before the next frame.
    pub fn start_tween(
        &mut self, ctx: &mut C, now: AnimationInstant, duration: Duration,
        on_update: impl FnMut(&mut C, f64) + 'static, on_complete: impl FnOnce(&mut C) + 'static,
    ) -> TweenId {
        let id = TweenId(self.next_id);
        self.next_id += 1;
        let mut on_update: UpdateFn<C> = Box::new(on_update);
        on_update(ctx, 0.0);
        debug!("Tween {id:?} started at {now:?}, duration {duration:?}");
        self.tweens.push(Tween {
            id,
            start: now,
            duration,
            on_update,
            on_complete: Box::new(on_complete),
        });
        id
    }

    // Advances every live tween. Finished tweens get exactly one `on_update(1.0)` followed by
    // exactly one `on_complete` and are dropped. Returns the number of tweens that finished.
    pub fn tick(&mut self, ctx: &mut C, now: AnimationInstant) -> usize {
        let mut num_finished = 0;
        let mut still_live = Vec::with_capacity(self.tweens.len());
        for mut tween in std::mem::take(&mut self.tweens) {
            let t = tween.progress(now);
            if t < 1.0 {
                (tween.on_update)(ctx, t);
                still_live.push(tween);
            } else {
                (tween.on_update)(ctx, 1.0);
                (tween.on_complete)(ctx);
                debug!("Tween {:?} finished at {now:?}", tween.id);
                num_finished += 1;
            }
        }
        self.tweens = still_live;
        num_finished
    }
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Default)]
    struct Log {
        updates: Vec<(&'static str, f64)>,
        completions: Vec<&'static str>,
    }

    fn start(
        scheduler: &mut Scheduler<Log>, log: &mut Log, name: &'static str, now: u64, duration: u64,
    ) {
        scheduler.start_tween(
            log,
            AnimationInstant::from_millis(now),
            Duration::from_millis(duration),
            move |log: &mut Log, t| log.updates.push((name, t)),
            move |log: &mut Log| log.completions.push(name),
        );
    }

    #[test]
    fn start_reports_zero_progress_synchronously() {
        let mut scheduler = Scheduler::new();
        let mut log = Log::default();
        start(&mut scheduler, &mut log, "a", 0, 100);
        assert_eq!(log.updates, vec![("a", 0.0)]);
        assert!(log.completions.is_empty());
        assert_eq!(scheduler.num_live(), 1);
    }

    #[test]
    fn progress_and_completion() {
        let mut scheduler = Scheduler::new();
        let mut log = Log::default();
        start(&mut scheduler, &mut log, "a", 0, 100);
        assert_eq!(scheduler.tick(&mut log, AnimationInstant::from_millis(25)), 0);
        assert_eq!(scheduler.tick(&mut log, AnimationInstant::from_millis(150)), 1);
        assert_eq!(log.updates, vec![("a", 0.0), ("a", 0.25), ("a", 1.0)]);
        assert_eq!(log.completions, vec!["a"]);
        assert!(scheduler.is_idle());

        // Completed tweens are gone for good.
        scheduler.tick(&mut log, AnimationInstant::from_millis(300));
        assert_eq!(log.completions, vec!["a"]);
    }

    #[test]
    fn zero_duration_completes_on_next_tick() {
        let mut scheduler = Scheduler::new();
        let mut log = Log::default();
        start(&mut scheduler, &mut log, "a", 10, 0);
        assert!(log.completions.is_empty());
        scheduler.tick(&mut log, AnimationInstant::from_millis(10));
        assert_eq!(log.updates, vec![("a", 0.0), ("a", 1.0)]);
        assert_eq!(log.completions, vec!["a"]);
    }

    #[test]
    fn tweens_are_independent() {
        let mut scheduler = Scheduler::new();
        let mut log = Log::default();
        start(&mut scheduler, &mut log, "short", 0, 50);
        start(&mut scheduler, &mut log, "long", 0, 200);
        scheduler.tick(&mut log, AnimationInstant::from_millis(100));
        assert_eq!(log.completions, vec!["short"]);
        assert_eq!(scheduler.num_live(), 1);
        scheduler.tick(&mut log, AnimationInstant::from_millis(200));
        assert_eq!(log.completions, vec!["short", "long"]);
    }
}
