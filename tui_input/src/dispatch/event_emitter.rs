// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Two tier listener registry. See [`EventEmitter`].

use super::DispatchEvent;
use crate::TuiInputError;
use std::{collections::HashMap,
          panic::{AssertUnwindSafe, catch_unwind}};

/// A registered callback. Returning an error (or panicking) is logged and does not stop
/// the listeners after it.
pub type ListenerFn<E> = dyn FnMut(&mut E) -> miette::Result<()> + Send;

/// Handle returned when registering, used to remove that listener again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct ListenerEntry<E> {
    id: ListenerId,
    callback: Box<ListenerFn<E>>,
}

/// Listener registry with an application tier and an internal (system) tier.
///
/// For each [`emit()`](Self::emit):
///
/// 1. Regular listeners for the event's kind run in registration order.
/// 2. Internal listeners for the kind run in registration order.
///
/// Once any listener calls [`Preventable::prevent_default()`] nothing after it runs, in
/// either tier. That is how an application overrides built-in behavior. A listener that
/// fails does not have that effect: the error is logged and the next listener runs.
///
/// [`Preventable::prevent_default()`]: crate::Preventable::prevent_default
pub struct EventEmitter<E>
where
    E: DispatchEvent,
{
    regular: HashMap<E::Kind, Vec<ListenerEntry<E>>>,
    internal: HashMap<E::Kind, Vec<ListenerEntry<E>>>,
    next_id: u64,
}

impl<E> Default for EventEmitter<E>
where
    E: DispatchEvent,
{
    fn default() -> Self {
        Self {
            regular: HashMap::new(),
            internal: HashMap::new(),
            next_id: 0,
        }
    }
}

impl<E> std::fmt::Debug for EventEmitter<E>
where
    E: DispatchEvent,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts = |tier: &HashMap<E::Kind, Vec<ListenerEntry<E>>>| {
            tier.iter()
                .map(|(kind, entries)| (*kind, entries.len()))
                .collect::<Vec<_>>()
        };
        f.debug_struct("EventEmitter")
            .field("regular", &counts(&self.regular))
            .field("internal", &counts(&self.internal))
            .finish()
    }
}

impl<E> EventEmitter<E>
where
    E: DispatchEvent,
{
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Adds an application listener.
    pub fn on(
        &mut self,
        kind: E::Kind,
        callback: impl FnMut(&mut E) -> miette::Result<()> + Send + 'static,
    ) -> ListenerId {
        let entry = self.new_entry(Box::new(callback));
        let id = entry.id;
        self.regular.entry(kind).or_default().push(entry);
        id
    }

    /// Returns `false` if `id` was not a regular listener for `kind`.
    pub fn remove_listener(&mut self, kind: E::Kind, id: ListenerId) -> bool {
        remove_entry(&mut self.regular, kind, id)
    }

    /// Adds a system listener. These run after every regular listener, and not at all
    /// if one of them prevented the default.
    pub fn on_internal(
        &mut self,
        kind: E::Kind,
        callback: impl FnMut(&mut E) -> miette::Result<()> + Send + 'static,
    ) -> ListenerId {
        let entry = self.new_entry(Box::new(callback));
        let id = entry.id;
        self.internal.entry(kind).or_default().push(entry);
        id
    }

    /// Returns `false` if `id` was not an internal listener for `kind`.
    pub fn off_internal(&mut self, kind: E::Kind, id: ListenerId) -> bool {
        remove_entry(&mut self.internal, kind, id)
    }

    /// Listeners for `kind` in both tiers.
    #[must_use]
    pub fn listener_count(&self, kind: E::Kind) -> usize {
        let count = |tier: &HashMap<E::Kind, Vec<ListenerEntry<E>>>| {
            tier.get(&kind).map_or(0, Vec::len)
        };
        count(&self.regular) + count(&self.internal)
    }

    pub fn remove_all_listeners(&mut self) {
        self.regular.clear();
        self.internal.clear();
    }

    /// Runs the listeners for `kind` against `event`. Returns whether any listener (of
    /// either tier) was registered, so a caller can tell that nothing handled it.
    pub fn emit(&mut self, kind: E::Kind, event: &mut E) -> bool {
        if self.listener_count(kind) == 0 {
            return false;
        }

        for tier in [&mut self.regular, &mut self.internal] {
            let Some(entries) = tier.get_mut(&kind) else {
                continue;
            };
            for entry in entries.iter_mut() {
                if event.is_default_prevented() {
                    return true;
                }
                invoke_isolated(kind, entry, event);
            }
        }
        true
    }

    fn new_entry(&mut self, callback: Box<ListenerFn<E>>) -> ListenerEntry<E> {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        ListenerEntry { id, callback }
    }
}

fn remove_entry<K, E>(tier: &mut HashMap<K, Vec<ListenerEntry<E>>>, kind: K, id: ListenerId) -> bool
where
    K: Eq + std::hash::Hash,
{
    let Some(entries) = tier.get_mut(&kind) else {
        return false;
    };
    let len_before = entries.len();
    entries.retain(|it| it.id != id);
    let removed = entries.len() != len_before;
    if entries.is_empty() {
        tier.remove(&kind);
    }
    removed
}

/// Calls one listener, turning an error or a panic into a log line.
fn invoke_isolated<E>(kind: E::Kind, entry: &mut ListenerEntry<E>, event: &mut E)
where
    E: DispatchEvent,
{
    let message = match catch_unwind(AssertUnwindSafe(|| (entry.callback)(event))) {
        Ok(Ok(())) => return,
        Ok(Err(report)) => format!("{report:?}"),
        Err(payload) => panic_message(payload.as_ref()),
    };

    let error = TuiInputError::ListenerFailed {
        event_kind: kind.into(),
        message,
    };
    // % is Display, ? is Debug.
    tracing::error!(message = "Listener failed", listener_id = ?entry.id, error = %error);
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(it) = payload.downcast_ref::<&str>() {
        format!("panicked: {it}")
    } else if let Some(it) = payload.downcast_ref::<String>() {
        format!("panicked: {it}")
    } else {
        "panicked".to_string()
    }
}

#[cfg(test)]
mod test_fixtures {
    use crate::{InputEvent, PasteEvent};
    use std::sync::{Arc, Mutex};

    pub type CallLog = Arc<Mutex<Vec<&'static str>>>;

    pub fn paste_event() -> InputEvent { InputEvent::Paste(PasteEvent::new("hello")) }

    /// Listener that appends `name` to `log`.
    pub fn recording(
        log: &CallLog,
        name: &'static str,
    ) -> impl FnMut(&mut InputEvent) -> miette::Result<()> + Send + 'static {
        let log = log.clone();
        move |_| {
            log.lock().unwrap().push(name);
            Ok(())
        }
    }

    pub fn calls(log: &CallLog) -> Vec<&'static str> { log.lock().unwrap().clone() }
}



#[cfg(test)]
mod tests_registration {
    use super::{test_fixtures::*, *};
    use crate::{InputEvent, InputEventKind};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_remove_listener_by_id() {
        let log = CallLog::default();
        let mut emitter = EventEmitter::<InputEvent>::new();
        let first = emitter.on(InputEventKind::Paste, recording(&log, "first"));
        emitter.on(InputEventKind::Paste, recording(&log, "second"));
        assert_eq!(emitter.listener_count(InputEventKind::Paste), 2);

        assert!(emitter.remove_listener(InputEventKind::Paste, first));
        assert!(!emitter.remove_listener(InputEventKind::Paste, first));
        emitter.emit(InputEventKind::Paste, &mut paste_event());
        assert_eq!(calls(&log), vec!["second"]);
    }

    #[test]
    fn test_tiers_are_independent() {
        let log = CallLog::default();
        let mut emitter = EventEmitter::<InputEvent>::new();
        let internal = emitter.on_internal(InputEventKind::Paste, recording(&log, "internal"));

        assert!(!emitter.remove_listener(InputEventKind::Paste, internal));
        assert!(!emitter.off_internal(InputEventKind::KeyPress, internal));
        assert!(emitter.off_internal(InputEventKind::Paste, internal));
        assert_eq!(emitter.listener_count(InputEventKind::Paste), 0);
    }

    #[test]
    fn test_remove_all_listeners() {
        let log = CallLog::default();
        let mut emitter = EventEmitter::<InputEvent>::new();
        emitter.on(InputEventKind::Paste, recording(&log, "a"));
        emitter.on_internal(InputEventKind::Mouse, recording(&log, "b"));
        emitter.remove_all_listeners();

        assert_eq!(emitter.listener_count(InputEventKind::Paste), 0);
        assert_eq!(emitter.listener_count(InputEventKind::Mouse), 0);
        assert!(!emitter.emit(InputEventKind::Paste, &mut paste_event()));
    }
}
