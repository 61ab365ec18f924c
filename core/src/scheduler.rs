//! Refresh Scheduler: one recurring roster reload per mounted view.
//!
//! The timer is a scoped resource. `arm` acquires it, `disarm` or dropping
//! the scheduler releases it, so repeated navigations never leak intervals.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tracing::{debug, info};

pub type LocalFuture = Pin<Box<dyn Future<Output = ()>>>;

/// Produces the work for one tick. Called once per period.
pub type Tick = Box<dyn FnMut() -> LocalFuture>;

/// Platform interval timer (`setInterval` in the browser, a manual driver in tests).
pub trait TimerBackend {
    type Handle;

    /// Start invoking `tick` every `period`, driving each returned future.
    fn start_interval(&self, period: Duration, tick: Tick) -> Self::Handle;

    fn cancel(&self, handle: Self::Handle);
}

struct Armed<H> {
    class_id: String,
    handle: H,
}

pub struct RefreshScheduler<T: TimerBackend> {
    backend: T,
    period: Duration,
    armed: Option<Armed<T::Handle>>,
}

impl<T: TimerBackend> RefreshScheduler<T> {
    pub fn new(backend: T, period: Duration) -> Self {
        Self {
            backend,
            period,
            armed: None,
        }
    }

    /// Arm for `class_id`. Re-arming for the class already armed is a no-op
    /// and returns `false`; arming for a different class replaces the timer.
    pub fn arm(&mut self, class_id: &str, tick: Tick) -> bool {
        if let Some(armed) = &self.armed {
            if armed.class_id == class_id {
                debug!("Refresh already armed for class {}", class_id);
                return false;
            }
            self.disarm();
        }

        let handle = self.backend.start_interval(self.period, tick);
        self.armed = Some(Armed {
            class_id: class_id.to_string(),
            handle,
        });
        info!(
            "Armed roster refresh for class {} every {:?}",
            class_id, self.period
        );
        true
    }

    /// Returns whether a timer was actually cancelled.
    pub fn disarm(&mut self) -> bool {
        match self.armed.take() {
            Some(armed) => {
                self.backend.cancel(armed.handle);
                info!("Disarmed roster refresh for class {}", armed.class_id);
                true
            }
            None => false,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    pub fn armed_class(&self) -> Option<&str> {
        self.armed.as_ref().map(|a| a.class_id.as_str())
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl<T: TimerBackend> Drop for RefreshScheduler<T> {
    fn drop(&mut self) {
        self.disarm();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records starts and cancels; ticks are never driven.
    #[derive(Clone, Default)]
    struct CountingTimers {
        started: Rc<RefCell<Vec<Duration>>>,
        cancelled: Rc<RefCell<Vec<usize>>>,
    }

    impl TimerBackend for CountingTimers {
        type Handle = usize;

        fn start_interval(&self, period: Duration, _tick: Tick) -> usize {
            let mut started = self.started.borrow_mut();
            started.push(period);
            started.len() - 1
        }

        fn cancel(&self, handle: usize) {
            self.cancelled.borrow_mut().push(handle);
        }
    }

    fn noop_tick() -> Tick {
        Box::new(|| Box::pin(async {}))
    }

    #[test]
    fn test_arm_once_per_class() {
        let timers = CountingTimers::default();
        let mut scheduler = RefreshScheduler::new(timers.clone(), Duration::from_secs(15));

        assert!(scheduler.arm("1", noop_tick()));
        assert!(!scheduler.arm("1", noop_tick()));
        assert_eq!(timers.started.borrow().len(), 1);
        assert_eq!(scheduler.armed_class(), Some("1"));
        assert_eq!(timers.started.borrow()[0], Duration::from_secs(15));
    }

    #[test]
    fn test_arm_other_class_replaces_timer() {
        let timers = CountingTimers::default();
        let mut scheduler = RefreshScheduler::new(timers.clone(), Duration::from_secs(15));

        scheduler.arm("1", noop_tick());
        scheduler.arm("2", noop_tick());

        assert_eq!(timers.started.borrow().len(), 2);
        assert_eq!(*timers.cancelled.borrow(), vec![0]);
        assert_eq!(scheduler.armed_class(), Some("2"));
    }

    #[test]
    fn test_disarm_is_idempotent() {
        let timers = CountingTimers::default();
        let mut scheduler = RefreshScheduler::new(timers.clone(), Duration::from_secs(15));

        assert!(!scheduler.disarm());
        scheduler.arm("1", noop_tick());
        assert!(scheduler.disarm());
        assert!(!scheduler.disarm());
        assert!(!scheduler.is_armed());
        assert_eq!(timers.cancelled.borrow().len(), 1);
    }

    #[test]
    fn test_drop_releases_timer() {
        let timers = CountingTimers::default();
        {
            let mut scheduler = RefreshScheduler::new(timers.clone(), Duration::from_secs(15));
            scheduler.arm("1", noop_tick());
        }
        assert_eq!(*timers.cancelled.borrow(), vec![0]);
    }
}
