//! Topic-based event dispatch.
//!
//! [`EventManager`] keeps, per topic, a list of listeners ordered by priority.
//! Emitting a payload calls every listener of the topic in order; listeners
//! registered with [`EventManager::once`] are dropped after their first call.
//!
//! # Example
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use vuege::events::EventManager;
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let mut events: EventManager<String> = EventManager::new();
//!
//! let log = Arc::clone(&seen);
//! events.on("page", 0, move |payload: &String| {
//!     log.lock().map_err(|e| vuege::VuegeError::Config(e.to_string()))?.push(payload.clone());
//!     Ok(())
//! });
//! events.emit("page", &"2".to_string());
//! assert_eq!(*seen.lock().unwrap(), vec!["2".to_string()]);
//! ```

use crate::domain::error::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Handle returned by [`EventManager::on`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener_{}", self.0)
    }
}

type Handler<E> = Box<dyn FnMut(&E) -> Result<()> + Send>;

struct Listener<E> {
    id: ListenerId,
    priority: i32,
    once: bool,
    handler: Handler<E>,
}

/// Listener totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventStats {
    /// Topics with at least one listener.
    pub topics: usize,
    pub listeners: usize,
    /// Payloads delivered to at least one listener.
    pub emitted: u64,
    /// Listener calls that returned an error.
    pub failures: u64,
}

/// Priority-ordered listeners per topic.
pub struct EventManager<E> {
    topics: BTreeMap<String, Vec<Listener<E>>>,
    next_id: u64,
    emitted: u64,
    failures: u64,
}

impl<E> Default for EventManager<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EventManager<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventManager")
            .field("topics", &self.topics())
            .field("emitted", &self.emitted)
            .finish_non_exhaustive()
    }
}

impl<E> EventManager<E> {
    pub const fn new() -> Self {
        Self {
            topics: BTreeMap::new(),
            next_id: 0,
            emitted: 0,
            failures: 0,
        }
    }

    /// Subscribes `handler` to `topic`.
    ///
    /// Listeners with a higher `priority` run first; listeners with equal
    /// priority run in registration order.
    pub fn on(
        &mut self,
        topic: impl Into<String>,
        priority: i32,
        handler: impl FnMut(&E) -> Result<()> + Send + 'static,
    ) -> ListenerId {
        self.register(topic.into(), priority, false, Box::new(handler))
    }

    /// Like [`on`](Self::on), but the listener is removed after its first call.
    pub fn once(
        &mut self,
        topic: impl Into<String>,
        priority: i32,
        handler: impl FnMut(&E) -> Result<()> + Send + 'static,
    ) -> ListenerId {
        self.register(topic.into(), priority, true, Box::new(handler))
    }

    fn register(&mut self, topic: String, priority: i32, once: bool, handler: Handler<E>) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        let listeners = self.topics.entry(topic).or_default();
        let at = listeners.partition_point(|l| l.priority >= priority);
        listeners.insert(
            at,
            Listener {
                id,
                priority,
                once,
                handler,
            },
        );
        id
    }

    /// Unsubscribes a listener; returns whether it was registered on `topic`.
    pub fn off(&mut self, topic: &str, id: ListenerId) -> bool {
        let Some(listeners) = self.topics.get_mut(topic) else {
            return false;
        };
        let before = listeners.len();
        listeners.retain(|l| l.id != id);
        let removed = listeners.len() != before;
        if listeners.is_empty() {
            self.topics.remove(topic);
        }
        removed
    }

    /// Calls every listener of `topic` with `payload`.
    ///
    /// A listener returning an error is logged and does not stop delivery to
    /// the remaining listeners.
    ///
    /// # Returns
    ///
    /// The number of listeners called.
    pub fn emit(&mut self, topic: &str, payload: &E) -> usize {
        let _span = tracing::debug_span!("emit", topic = %topic).entered();

        let Some(listeners) = self.topics.get_mut(topic) else {
            tracing::trace!("no listeners");
            return 0;
        };

        let mut failures = 0;
        for listener in listeners.iter_mut() {
            if let Err(error) = (listener.handler)(payload) {
                failures += 1;
                tracing::error!(listener = %listener.id, error = %error, "event handler failed");
            }
        }
        let called = listeners.len();
        listeners.retain(|l| !l.once);
        if listeners.is_empty() {
            self.topics.remove(topic);
        }

        self.emitted += 1;
        self.failures += failures;
        tracing::debug!(called, failures, "event delivered");
        called
    }

    /// Drops the listeners of `topic`, or of every topic when `None`.
    pub fn remove_all_listeners(&mut self, topic: Option<&str>) {
        match topic {
            Some(topic) => {
                self.topics.remove(topic);
            }
            None => self.topics.clear(),
        }
    }

    pub fn listener_count(&self, topic: &str) -> usize {
        self.topics.get(topic).map_or(0, Vec::len)
    }

    /// Topics with at least one listener, sorted.
    pub fn topics(&self) -> Vec<String> {
        self.topics.keys().cloned().collect()
    }

    pub fn stats(&self) -> EventStats {
        EventStats {
            topics: self.topics.len(),
            listeners: self.topics.values().map(Vec::len).sum(),
            emitted: self.emitted,
            failures: self.failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::VuegeError;
    use std::sync::{Arc, Mutex};

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(&str) -> Box<dyn FnMut(&u32) -> Result<()> + Send>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        let make = move |name: &str| {
            let log = Arc::clone(&log);
            let name = name.to_string();
            let handler: Box<dyn FnMut(&u32) -> Result<()> + Send> = Box::new(move |n: &u32| {
                log.lock().unwrap().push(format!("{name}:{n}"));
                Ok(())
            });
            handler
        };
        (seen, make)
    }

    #[test]
    fn priority_then_registration_order() {
        let (seen, make) = recorder();
        let mut events: EventManager<u32> = EventManager::new();
        events.on("t", 0, make("low"));
        events.on("t", 5, make("high"));
        events.on("t", 0, make("low2"));
        events.on("t", 5, make("high2"));
        assert_eq!(events.emit("t", &1), 4);
        assert_eq!(
            *seen.lock().unwrap(),
            vec!["high:1", "high2:1", "low:1", "low2:1"]
        );
    }

    #[test]
    fn once_listeners_fire_once() {
        let (seen, make) = recorder();
        let mut events: EventManager<u32> = EventManager::new();
        events.once("t", 0, make("once"));
        events.on("t", 0, make("always"));
        events.emit("t", &1);
        events.emit("t", &2);
        assert_eq!(*seen.lock().unwrap(), vec!["once:1", "always:1", "always:2"]);
        assert_eq!(events.listener_count("t"), 1);
    }

    #[test]
    fn failing_handler_does_not_block_others() {
        let (seen, make) = recorder();
        let mut events: EventManager<u32> = EventManager::new();
        events.on("t", 9, |_: &u32| Err(VuegeError::Config("broken".to_string())));
        events.on("t", 0, make("after"));
        events.emit("t", &3);
        assert_eq!(*seen.lock().unwrap(), vec!["after:3"]);
        assert_eq!(events.stats().failures, 1);
    }

    #[test]
    fn off_and_bookkeeping() {
        let (_, make) = recorder();
        let mut events: EventManager<u32> = EventManager::new();
        let a = events.on("a", 0, make("a"));
        events.on("b", 0, make("b"));
        assert_eq!(events.topics(), vec!["a", "b"]);
        assert!(events.off("a", a));
        assert!(!events.off("a", a));
        assert_eq!(events.topics(), vec!["b"]);
        assert_eq!(events.emit("a", &0), 0);
        assert_eq!(events.stats().emitted, 0);

        events.remove_all_listeners(None);
        assert_eq!(events.stats().listeners, 0);
        assert_eq!(a.to_string(), "listener_1");
    }
}
