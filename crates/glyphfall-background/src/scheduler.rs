//! Single-threaded interval timers and resize listeners.
//!
//! Callbacks run one at a time on the caller's thread, from
//! [`Scheduler::advance_to`] and [`Scheduler::resize`]. Registrations live as
//! long as the handle returned for them.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};
use std::time::Duration;

use glyphfall_core::Viewport;

type TickCallback = Rc<RefCell<dyn FnMut()>>;
type ResizeCallback = Rc<RefCell<dyn FnMut(Viewport)>>;

struct Interval {
    period: Duration,
    next_due: Duration,
    callback: TickCallback,
}

#[derive(Default)]
struct Registry {
    viewport: Viewport,
    now: Duration,
    next_id: u64,
    intervals: BTreeMap<u64, Interval>,
    resize_listeners: BTreeMap<u64, ResizeCallback>,
}

impl Registry {
    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Earliest interval due at or before `deadline`; ties go to the older one.
    fn take_due(&mut self, deadline: Duration) -> Option<(Duration, TickCallback)> {
        let (_, interval) = self
            .intervals
            .iter_mut()
            .filter(|(_, interval)| interval.next_due <= deadline)
            .min_by_key(|(id, interval)| (interval.next_due, **id))?;
        let due = interval.next_due;
        interval.next_due = due + interval.period;
        Some((due, Rc::clone(&interval.callback)))
    }
}

/// Cooperative scheduler owning the current viewport and a virtual clock.
#[derive(Clone)]
pub struct Scheduler {
    inner: Rc<RefCell<Registry>>,
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = self.inner.borrow();
        f.debug_struct("Scheduler")
            .field("viewport", &registry.viewport)
            .field("now", &registry.now)
            .field("intervals", &registry.intervals.len())
            .field("resize_listeners", &registry.resize_listeners.len())
            .finish()
    }
}

impl Scheduler {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Registry {
                viewport,
                ..Registry::default()
            })),
        }
    }

    /// Current viewport.
    pub fn viewport(&self) -> Viewport {
        self.inner.borrow().viewport
    }

    /// Time elapsed on the scheduler clock.
    pub fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    /// Call `callback` every `period`, starting one period from now.
    ///
    /// A zero period is treated as one millisecond.
    pub fn set_interval(
        &self,
        period: Duration,
        callback: impl FnMut() + 'static,
    ) -> IntervalHandle {
        let period = period.max(Duration::from_millis(1));
        let mut registry = self.inner.borrow_mut();
        let id = registry.allocate_id();
        let next_due = registry.now + period;
        registry.intervals.insert(
            id,
            Interval {
                period,
                next_due,
                callback: Rc::new(RefCell::new(callback)),
            },
        );
        IntervalHandle {
            registry: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Call `callback` with the new viewport on every [`Scheduler::resize`].
    pub fn on_resize(&self, callback: impl FnMut(Viewport) + 'static) -> ListenerHandle {
        let mut registry = self.inner.borrow_mut();
        let id = registry.allocate_id();
        registry
            .resize_listeners
            .insert(id, Rc::new(RefCell::new(callback)));
        ListenerHandle {
            registry: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Record a new viewport and notify listeners in registration order.
    pub fn resize(&self, viewport: Viewport) {
        let ids: Vec<u64> = {
            let mut registry = self.inner.borrow_mut();
            registry.viewport = viewport;
            registry.resize_listeners.keys().copied().collect()
        };
        for id in ids {
            // A listener may have been removed by an earlier one.
            let callback = self.inner.borrow().resize_listeners.get(&id).cloned();
            if let Some(callback) = callback {
                let mut listener = callback.borrow_mut();
                (*listener)(viewport);
            }
        }
    }

    /// Move the clock forward to `now`, firing every interval that falls due.
    ///
    /// Missed periods are fired one after another. Returns the number of
    /// callbacks run. The clock never moves backwards.
    pub fn advance_to(&self, now: Duration) -> usize {
        let mut fired = 0;
        loop {
            let next = {
                let mut registry = self.inner.borrow_mut();
                let deadline = registry.now.max(now);
                let next = registry.take_due(deadline);
                match next {
                    Some((due, _)) => registry.now = registry.now.max(due),
                    None => registry.now = deadline,
                }
                next
            };
            let Some((_, callback)) = next else {
                return fired;
            };
            let mut tick = callback.borrow_mut();
            (*tick)();
            fired += 1;
        }
    }

    /// Move the clock forward by `by`.
    pub fn advance(&self, by: Duration) -> usize {
        let now = self.now();
        self.advance_to(now + by)
    }

    /// Earliest time an interval falls due.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.inner
            .borrow()
            .intervals
            .values()
            .map(|interval| interval.next_due)
            .min()
    }

    /// Number of live intervals.
    pub fn interval_count(&self) -> usize {
        self.inner.borrow().intervals.len()
    }

    /// Number of live resize listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().resize_listeners.len()
    }
}

/// Keeps an interval registered; dropping it cancels the interval.
#[derive(Debug)]
#[must_use = "the interval is cancelled when the handle is dropped"]
pub struct IntervalHandle {
    registry: Weak<RefCell<Registry>>,
    id: u64,
}

impl IntervalHandle {
    /// Cancel the interval now.
    pub fn cancel(self) {}
}

impl Drop for IntervalHandle {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            // Take the callback out before it is dropped so its captures are
            // released outside the registry borrow.
            let removed = registry.borrow_mut().intervals.remove(&self.id);
            drop(removed);
        }
    }
}

/// Keeps a resize listener registered; dropping it removes the listener.
#[derive(Debug)]
#[must_use = "the listener is removed when the handle is dropped"]
pub struct ListenerHandle {
    registry: Weak<RefCell<Registry>>,
    id: u64,
}

impl ListenerHandle {
    /// Remove the listener now.
    pub fn cancel(self) {}
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            let removed = registry.borrow_mut().resize_listeners.remove(&self.id);
            drop(removed);
        }
    }
}
