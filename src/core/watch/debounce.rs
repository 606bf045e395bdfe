use std::{
    collections::HashMap,
    hash::Hash,
    time::{Duration, Instant},
};

/// Time source of a [`Debouncer`].
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Per-key debounce state. Firing is the `Pending -> Idle` step taken by
/// [`Debouncer::poll`]: the key is emitted and forgotten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    Idle,
    /// Waiting for the key to stay quiet until the deadline.
    Pending(Instant),
}

/// Groups events by key and releases a key once no event arrived for it
/// during the quiet window. Every new event for a pending key pushes its
/// deadline back.
#[derive(Debug)]
pub struct Debouncer<K, C = SystemClock> {
    clock: C,
    window: Duration,
    deadlines: HashMap<K, Instant>,
}

impl<K: Eq + Hash + Clone> Debouncer<K, SystemClock> {
    pub fn new(window: Duration) -> Self {
        Self::with_clock(window, SystemClock)
    }
}

impl<K: Eq + Hash + Clone, C: Clock> Debouncer<K, C> {
    pub fn with_clock(window: Duration, clock: C) -> Self {
        Self {
            clock,
            window,
            deadlines: HashMap::new(),
        }
    }

    /// Record an event for `key`, (re)starting its quiet window.
    pub fn push(&mut self, key: K) {
        let deadline = self.clock.now() + self.window;
        self.deadlines.insert(key, deadline);
    }

    /// Fire every key whose quiet window has elapsed, earliest deadline
    /// first. Fired keys go back to [`DebounceState::Idle`].
    pub fn poll(&mut self) -> Vec<K> {
        let now = self.clock.now();
        let mut due: Vec<(Instant, K)> = self
            .deadlines
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(key, deadline)| (*deadline, key.clone()))
            .collect();
        due.sort_by_key(|(deadline, _)| *deadline);

        for (_, key) in &due {
            self.deadlines.remove(key);
        }
        due.into_iter().map(|(_, key)| key).collect()
    }

    /// Earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadlines.values().min().copied()
    }

    pub fn state(&self, key: &K) -> DebounceState {
        match self.deadlines.get(key) {
            Some(deadline) => DebounceState::Pending(*deadline),
            None => DebounceState::Idle,
        }
    }

    /// Number of keys waiting for their quiet window.
    pub fn pending_count(&self) -> usize {
        self.deadlines.len()
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Clone)]
    struct ManualClock(Rc<Cell<Instant>>);

    impl ManualClock {
        fn advance(&self, millis: u64) {
            self.0.set(self.0.get() + Duration::from_millis(millis));
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            self.0.get()
        }
    }

    fn debouncer() -> (Debouncer<&'static str, ManualClock>, ManualClock) {
        let clock = ManualClock(Rc::new(Cell::new(Instant::now())));
        (
            Debouncer::with_clock(Duration::from_millis(300), clock.clone()),
            clock,
        )
    }

    #[test]
    fn test_key_fires_after_quiet_window() {
        let (mut debouncer, clock) = debouncer();
        assert_eq!(debouncer.state(&"a.ts"), DebounceState::Idle);

        debouncer.push("a.ts");
        assert!(matches!(debouncer.state(&"a.ts"), DebounceState::Pending(_)));

        clock.advance(299);
        assert!(debouncer.poll().is_empty());

        clock.advance(1);
        assert_eq!(debouncer.poll(), vec!["a.ts"]);
        assert_eq!(debouncer.state(&"a.ts"), DebounceState::Idle);
        assert!(debouncer.poll().is_empty());
    }

    #[test]
    fn test_repeated_events_reset_the_window() {
        let (mut debouncer, clock) = debouncer();
        debouncer.push("a.ts");
        clock.advance(200);
        debouncer.push("a.ts");
        clock.advance(200);
        assert!(debouncer.poll().is_empty());

        clock.advance(100);
        assert_eq!(debouncer.poll(), vec!["a.ts"]);
    }

    #[test]
    fn test_keys_fire_independently_in_deadline_order() {
        let (mut debouncer, clock) = debouncer();
        debouncer.push("b.ts");
        clock.advance(50);
        debouncer.push("a.ts");
        clock.advance(100);
        debouncer.push("b.ts");

        clock.advance(200);
        assert_eq!(debouncer.poll(), vec!["a.ts"]);
        clock.advance(100);
        assert_eq!(debouncer.poll(), vec!["b.ts"]);
    }

    #[test]
    fn test_fired_key_can_fire_again() {
        let (mut debouncer, clock) = debouncer();
        debouncer.push("a.ts");
        clock.advance(300);
        assert_eq!(debouncer.poll(), vec!["a.ts"]);

        debouncer.push("a.ts");
        clock.advance(300);
        assert_eq!(debouncer.poll(), vec!["a.ts"]);
    }

    #[test]
    fn test_next_deadline_follows_pending_keys() {
        let (mut debouncer, clock) = debouncer();
        assert_eq!(debouncer.next_deadline(), None);

        let start = clock.now();
        debouncer.push("a.ts");
        clock.advance(10);
        debouncer.push("b.ts");
        assert_eq!(
            debouncer.next_deadline(),
            Some(start + Duration::from_millis(300))
        );

        clock.advance(290);
        assert_eq!(debouncer.poll(), vec!["a.ts"]);
        assert_eq!(
            debouncer.next_deadline(),
            Some(start + Duration::from_millis(310))
        );
    }

    #[test]
    fn test_fired_keys_are_forgotten() {
        let (mut debouncer, clock) = debouncer();
        for index in 0..100 {
            debouncer.push(if index % 2 == 0 { "a.ts" } else { "b.ts" });
            clock.advance(300);
            assert_eq!(debouncer.poll().len(), 1);
        }
        assert_eq!(debouncer.pending_count(), 0);
        assert_eq!(debouncer.next_deadline(), None);

        debouncer.push("c.ts");
        assert_eq!(debouncer.pending_count(), 1);
    }
}
