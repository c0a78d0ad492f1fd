use std::collections::VecDeque;

use smallvec::SmallVec;

use crate::rc::MutRc;

/// One registered observer.
///
/// While a notification is delivered the observer is moved out of its slot,
/// so the registry is never borrowed across a call into user code.
pub(crate) struct Slot<Ob, Item> {
  pub(crate) observer: Option<Ob>,
  pub(crate) removed: bool,
  /// Values pushed while this observer was out of its slot. They are
  /// delivered in order as soon as the running call returns.
  pub(crate) pending: VecDeque<Item>,
  /// The subject terminated while this observer was out of its slot. It
  /// gets the terminal notification once it returns.
  pub(crate) pending_terminal: bool,
}

impl<Ob, Item> Slot<Ob, Item> {
  fn new(observer: Ob) -> Self {
    Slot { observer: Some(observer), removed: false, pending: VecDeque::new(), pending_terminal: false }
  }
}

/// Subscribers container with ID-based add and remove.
///
/// Observers are kept in subscription order. Removal marks the slot, so a
/// fan-out that is iterating a snapshot skips observers removed by an
/// earlier observer of the same notification.
pub(crate) struct Subscribers<Ob, Item> {
  entries: SmallVec<[(usize, MutRc<Slot<Ob, Item>>); 2]>,
  next_id: usize,
}

impl<Ob, Item> Default for Subscribers<Ob, Item> {
  fn default() -> Self { Self { entries: SmallVec::new(), next_id: 0 } }
}

impl<Ob, Item> Subscribers<Ob, Item> {
  /// Add an observer and return its unique ID along with its slot.
  pub(crate) fn add(&mut self, observer: Ob) -> (usize, MutRc<Slot<Ob, Item>>) {
    let id = self.next_id;
    self.next_id += 1;
    let slot = MutRc::own(Slot::new(observer));
    self.entries.push((id, slot.clone()));
    (id, slot)
  }

  /// Remove an observer by ID, handing it back unless it is currently
  /// being notified.
  pub(crate) fn remove(&mut self, id: usize) -> Option<Ob> {
    let idx = self.entries.iter().position(|(i, _)| *i == id)?;
    let (_, slot) = self.entries.remove(idx);
    let mut slot = slot.rc_deref_mut();
    slot.removed = true;
    slot.pending.clear();
    slot.observer.take()
  }

  /// The current slots, in subscription order.
  pub(crate) fn snapshot(&self) -> SmallVec<[MutRc<Slot<Ob, Item>>; 2]> {
    self.entries.iter().map(|(_, slot)| slot.clone()).collect()
  }

  /// Removes every observer. Observers that are currently being notified
  /// are flagged to receive the terminal notification when they return.
  pub(crate) fn drain(&mut self) -> Vec<Ob> {
    self
      .entries
      .drain(..)
      .filter_map(|(_, slot)| {
        let mut slot = slot.rc_deref_mut();
        slot.removed = true;
        let observer = slot.observer.take();
        if observer.is_none() {
          slot.pending_terminal = true;
        }
        observer
      })
      .collect()
  }

  #[inline]
  pub(crate) fn len(&self) -> usize { self.entries.len() }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn add_remove() {
    let mut subscribers: Subscribers<_, ()> = Subscribers::default();
    let (a, _) = subscribers.add("a");
    let (b, _) = subscribers.add("b");
    assert_eq!(subscribers.len(), 2);

    assert_eq!(subscribers.remove(a), Some("a"));
    assert_eq!(subscribers.remove(a), None);
    assert_eq!(subscribers.len(), 1);
    assert_ne!(a, b);
  }

  #[test]
  fn snapshot_sees_removal() {
    let mut subscribers: Subscribers<_, ()> = Subscribers::default();
    let (a, _) = subscribers.add(1);
    subscribers.add(2);
    let snapshot = subscribers.snapshot();
    subscribers.remove(a);

    assert!(snapshot[0].rc_deref().removed);
    assert!(!snapshot[1].rc_deref().removed);
  }

  #[test]
  fn drain_flags_busy_slots() {
    let mut subscribers: Subscribers<_, ()> = Subscribers::default();
    subscribers.add(1);
    subscribers.add(2);
    let snapshot = subscribers.snapshot();
    let busy = snapshot[0].rc_deref_mut().observer.take();

    assert_eq!(subscribers.drain(), vec![2]);
    assert_eq!(busy, Some(1));
    assert!(snapshot[0].rc_deref().pending_terminal);
    assert!(!snapshot[1].rc_deref().pending_terminal);
    assert_eq!(subscribers.len(), 0);
  }

  #[test]
  fn removal_drops_queued_values() {
    let mut subscribers: Subscribers<i32, i32> = Subscribers::default();
    let (id, slot) = subscribers.add(1);
    let busy = slot.rc_deref_mut().observer.take();
    slot.rc_deref_mut().pending.push_back(7);

    assert_eq!(busy, Some(1));
    assert_eq!(subscribers.remove(id), None);
    assert!(slot.rc_deref().removed);
    assert!(slot.rc_deref().pending.is_empty());
  }
}
