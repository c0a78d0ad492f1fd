//! Named-event sources that [`from_event`](crate::observable::from_event)
//! can listen to.

use std::{
  collections::{HashMap, VecDeque},
  panic::{catch_unwind, AssertUnwindSafe},
};

use crate::{error::report_panic, rc::MutRc};

pub type Listener<E> = Box<dyn FnMut(E)>;

/// Identifies a registered listener for later removal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(usize);

/// Something that delivers named events to registered listeners.
pub trait EventSource {
  type Event;

  fn add_listener(&self, kind: &str, listener: Listener<Self::Event>) -> ListenerId;

  /// Returns `false` if no listener with `id` was registered for `kind`.
  fn remove_listener(&self, kind: &str, id: ListenerId) -> bool;
}

struct ListenerSlot<E> {
  callback: Option<Listener<E>>,
  removed: bool,
  /// Events dispatched while the callback was running.
  pending: VecDeque<E>,
}

struct TargetInner<E> {
  listeners: HashMap<String, Vec<(ListenerId, MutRc<ListenerSlot<E>>)>>,
  next_id: usize,
}

/// An in-process [`EventSource`]: events are pushed into it with
/// [`dispatch`](EventTarget::dispatch).
///
/// Clones share the same listeners.
///
/// ```
/// use rxlite::prelude::*;
///
/// let target = EventTarget::new();
/// let subscription = observable::from_event(target.clone(), "click")
///   .subscribe(|x: i32| println!("clicked at {}", x));
///
/// target.dispatch("click", 10);
/// subscription.into_inner().unsubscribe();
/// assert_eq!(target.listener_count("click"), 0);
/// ```
pub struct EventTarget<E>(MutRc<TargetInner<E>>);

impl<E> Clone for EventTarget<E> {
  fn clone(&self) -> Self { EventTarget(self.0.clone()) }
}

impl<E> Default for EventTarget<E> {
  fn default() -> Self { EventTarget(MutRc::own(TargetInner { listeners: HashMap::new(), next_id: 0 })) }
}

impl<E: Clone> EventTarget<E> {
  pub fn new() -> Self { Self::default() }

  /// Delivers `event` to every listener registered for `kind` when the
  /// dispatch starts, in registration order.
  ///
  /// A listener removed by an earlier listener of the same dispatch is
  /// skipped. A listener that dispatches to its own kind receives the nested
  /// event after its current call returns. A panicking listener is reported
  /// as an unhandled error and does not stop the dispatch.
  pub fn dispatch(&self, kind: &str, event: E) {
    let snapshot: Vec<_> = match self.0.rc_deref().listeners.get(kind) {
      Some(listeners) => listeners.iter().map(|(_, slot)| slot.clone()).collect(),
      None => return,
    };

    for slot in snapshot {
      let mut callback = {
        let mut slot = slot.rc_deref_mut();
        if slot.removed {
          continue;
        }
        match slot.callback.take() {
          Some(callback) => callback,
          None => {
            tracing::trace!(kind, "listener busy, event queued");
            slot.pending.push_back(event.clone());
            continue;
          }
        }
      };

      let mut next = Some(event.clone());
      while let Some(e) = next {
        if let Err(payload) = catch_unwind(AssertUnwindSafe(|| callback(e))) {
          report_panic(payload);
        }
        let mut slot = slot.rc_deref_mut();
        if slot.removed {
          slot.pending.clear();
          break;
        }
        next = slot.pending.pop_front();
        if next.is_none() {
          slot.callback = Some(callback);
          break;
        }
      }
    }
  }

  pub fn listener_count(&self, kind: &str) -> usize { self.0.rc_deref().listeners.get(kind).map_or(0, Vec::len) }
}

impl<E: Clone> EventSource for EventTarget<E> {
  type Event = E;

  fn add_listener(&self, kind: &str, listener: Listener<E>) -> ListenerId {
    let mut inner = self.0.rc_deref_mut();
    let id = ListenerId(inner.next_id);
    inner.next_id += 1;
    let slot = MutRc::own(ListenerSlot { callback: Some(listener), removed: false, pending: VecDeque::new() });
    inner.listeners.entry(kind.to_string()).or_default().push((id, slot));
    tracing::debug!(kind, id = id.0, "listener added");
    id
  }

  fn remove_listener(&self, kind: &str, id: ListenerId) -> bool {
    let removed = {
      let mut inner = self.0.rc_deref_mut();
      let Some(listeners) = inner.listeners.get_mut(kind) else {
        return false;
      };
      let removed = listeners
        .iter()
        .position(|(i, _)| *i == id)
        .map(|idx| listeners.remove(idx).1);
      if listeners.is_empty() {
        inner.listeners.remove(kind);
      }
      removed
    };
    match removed {
      Some(slot) => {
        // Dropped outside of the registry borrow, the callback may own
        // anything.
        let (callback, pending) = {
          let mut slot = slot.rc_deref_mut();
          slot.removed = true;
          (slot.callback.take(), std::mem::take(&mut slot.pending))
        };
        drop((callback, pending));
        tracing::debug!(kind, id = id.0, "listener removed");
        true
      }
      None => false,
    }
  }
}
