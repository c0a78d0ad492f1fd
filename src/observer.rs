//! Observer trait and implementations
//!
//! The Observer trait defines the consumer of data in the reactive pattern.
//! It provides three methods: next (for values), error (for errors), and
//! complete (for stream completion).

use std::collections::VecDeque;

use crate::rc::MutRc;

/// An Observer is a consumer of values delivered by an Observable. One for
/// each type of notification delivered by the Observable: `next`, `error`,
/// and `complete`.
///
/// `Item` is the type of the elements being emitted.
/// `Err` is the type of the error may propagating.
pub trait Observer<Item, Err> {
  fn next(&mut self, value: Item);

  fn error(&mut self, err: Err);

  fn complete(&mut self);

  /// Returns `true` once the observer will not accept any more notifications.
  ///
  /// Sources check it to stop producing early.
  fn is_finished(&self) -> bool;
}

impl<Item, Err, O> Observer<Item, Err> for Box<O>
where
  O: Observer<Item, Err> + ?Sized,
{
  #[inline]
  fn next(&mut self, value: Item) { (**self).next(value) }

  #[inline]
  fn error(&mut self, err: Err) { (**self).error(err) }

  #[inline]
  fn complete(&mut self) { (**self).complete() }

  #[inline]
  fn is_finished(&self) -> bool { (**self).is_finished() }
}

enum Notification<Item, Err> {
  Next(Item),
  Error(Err),
  Complete,
}

impl<Item, Err> Notification<Item, Err> {
  fn deliver_to<O: Observer<Item, Err>>(self, observer: &mut O) {
    match self {
      Notification::Next(value) => observer.next(value),
      Notification::Error(err) => observer.error(err),
      Notification::Complete => observer.complete(),
    }
  }
}

struct SharedInner<O, Item, Err> {
  observer: Option<O>,
  queue: VecDeque<Notification<Item, Err>>,
  stopped: bool,
}

/// One downstream observer fed from several places (timers, inner streams,
/// emitter clones).
///
/// The observer is moved out of the cell for the duration of every call.
/// A notification that arrives meanwhile, because the downstream fed back
/// into its own source, is queued and delivered once the running call
/// returns. Nothing is accepted after a terminal notification.
pub(crate) struct SharedObserver<O, Item, Err>(MutRc<SharedInner<O, Item, Err>>);

impl<O, Item, Err> Clone for SharedObserver<O, Item, Err> {
  fn clone(&self) -> Self { SharedObserver(self.0.clone()) }
}

impl<O, Item, Err> SharedObserver<O, Item, Err> {
  pub(crate) fn new(observer: O) -> Self {
    SharedObserver(MutRc::own(SharedInner { observer: Some(observer), queue: VecDeque::new(), stopped: false }))
  }
}

/// Puts the observer back into its cell, also when a callback unwinds.
struct Running<'a, O, Item, Err> {
  cell: &'a MutRc<SharedInner<O, Item, Err>>,
  observer: Option<O>,
}

impl<O, Item, Err> Drop for Running<'_, O, Item, Err> {
  fn drop(&mut self) {
    if let Some(observer) = self.observer.take() {
      if let Some(mut inner) = self.cell.try_rc_deref_mut() {
        inner.observer = Some(observer);
      }
    }
  }
}

impl<O: Observer<Item, Err>, Item, Err> SharedObserver<O, Item, Err> {
  fn deliver(&self, notification: Notification<Item, Err>) {
    let observer = {
      let mut inner = self.0.rc_deref_mut();
      if inner.stopped {
        return;
      }
      if !matches!(notification, Notification::Next(_)) {
        inner.stopped = true;
      }
      match inner.observer.take() {
        Some(observer) => observer,
        None => {
          tracing::trace!("downstream busy, notification queued");
          inner.queue.push_back(notification);
          return;
        }
      }
    };

    let mut running = Running { cell: &self.0, observer: Some(observer) };
    let mut notification = Some(notification);
    while let Some(n) = notification {
      if let Some(observer) = running.observer.as_mut() {
        n.deliver_to(observer);
      }
      notification = self.0.rc_deref_mut().queue.pop_front();
    }
  }
}

impl<Item, Err, O> Observer<Item, Err> for SharedObserver<O, Item, Err>
where
  O: Observer<Item, Err>,
{
  #[inline]
  fn next(&mut self, value: Item) { self.deliver(Notification::Next(value)) }

  #[inline]
  fn error(&mut self, err: Err) { self.deliver(Notification::Error(err)) }

  #[inline]
  fn complete(&mut self) { self.deliver(Notification::Complete) }

  fn is_finished(&self) -> bool {
    let inner = self.0.rc_deref();
    inner.stopped || inner.observer.as_ref().is_some_and(|o| o.is_finished())
  }
}
