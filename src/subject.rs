//! Multicasting streams.
//!
//! A [`Subject`] is both an observable and an observer: values pushed into it
//! are delivered to every current subscriber. A [`BehaviorSubject`]
//! additionally remembers the latest value and hands it to new subscribers.
//!
//! # Delivery rules
//!
//! - A notification goes to the subscribers registered when it started, in
//!   subscription order. A subscriber added during delivery first hears the
//!   next notification; one removed during delivery is skipped if it was not
//!   reached yet.
//! - A panicking subscriber does not stop the fan-out. The panic is reported
//!   as [`UnhandledError::ObserverPanicked`](crate::error::UnhandledError)
//!   and the subscriber stays registered.
//! - After `complete` or `error` the subject is closed: `next` is ignored and
//!   late subscribers immediately receive the terminal notification.
//! - Pushing into a subject from inside one of its own subscriber callbacks
//!   is allowed. Subscribers that are idle receive the nested value right
//!   away. The subscriber that is currently running receives it right
//!   after its current callback returns, so every subscriber still sees
//!   every value exactly once and one value at a time.

use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::trace;

use crate::{
  error::report_panic,
  observable::{Observable, ObservableExt},
  observer::Observer,
  rc::MutRc,
  subscriber::Subscriber,
  subscription::Teardown,
};

mod behavior_subject;
mod subscribers;

pub use behavior_subject::BehaviorSubject;
use subscribers::{Slot, Subscribers};

type BoxedObserver<Item, Err> = Box<dyn Observer<Item, Err>>;

enum SubjectState<Err> {
  Active,
  Completed,
  Errored(Err),
}

struct SubjectInner<Item, Err> {
  observers: Subscribers<BoxedObserver<Item, Err>, Item>,
  state: SubjectState<Err>,
}

enum Terminal<Err> {
  Complete,
  Error(Err),
}

pub struct Subject<Item, Err> {
  inner: MutRc<SubjectInner<Item, Err>>,
}

impl<Item, Err> Clone for Subject<Item, Err> {
  fn clone(&self) -> Self { Subject { inner: self.inner.clone() } }
}

impl<Item, Err> Default for Subject<Item, Err> {
  fn default() -> Self {
    Subject {
      inner: MutRc::own(SubjectInner { observers: Subscribers::default(), state: SubjectState::Active }),
    }
  }
}

impl<Item, Err> Subject<Item, Err> {
  pub fn new() -> Self { Self::default() }

  /// Number of currently registered subscribers.
  pub fn subscriber_count(&self) -> usize { self.inner.rc_deref().observers.len() }

  /// `true` once the subject completed or errored.
  pub fn is_closed(&self) -> bool { !matches!(self.inner.rc_deref().state, SubjectState::Active) }
}

type SubjectSlot<Item, Err> = MutRc<Slot<BoxedObserver<Item, Err>, Item>>;

impl<Item: Clone, Err: Clone> Subject<Item, Err> {
  pub fn next(&self, value: Item) {
    let snapshot = {
      let inner = self.inner.rc_deref();
      if !matches!(inner.state, SubjectState::Active) {
        trace!("next on a closed subject ignored");
        return;
      }
      inner.observers.snapshot()
    };

    for slot in snapshot {
      self.next_to(&slot, value.clone());
    }
  }

  pub fn error(&self, err: Err) {
    let Some(observers) = self.terminate(SubjectState::Errored(err.clone())) else {
      return;
    };
    tracing::debug!(subscribers = observers.len(), "subject errored");
    for mut observer in observers {
      let e = err.clone();
      if let Err(payload) = catch_unwind(AssertUnwindSafe(|| observer.error(e))) {
        report_panic(payload);
      }
    }
  }

  pub fn complete(&self) {
    let Some(observers) = self.terminate(SubjectState::Completed) else {
      return;
    };
    tracing::debug!(subscribers = observers.len(), "subject completed");
    for mut observer in observers {
      if let Err(payload) = catch_unwind(AssertUnwindSafe(|| observer.complete())) {
        report_panic(payload);
      }
    }
  }

  /// Delivers one value to one subscriber. If that subscriber is running
  /// right now the value waits in its slot.
  fn next_to(&self, slot: &SubjectSlot<Item, Err>, value: Item) {
    let observer = {
      let mut slot = slot.rc_deref_mut();
      if slot.removed {
        trace!("skip removed subscriber");
        return;
      }
      match slot.observer.take() {
        Some(observer) => observer,
        None => {
          trace!("subscriber busy, value queued");
          slot.pending.push_back(value);
          return;
        }
      }
    };
    self.run(slot, observer, value);
  }

  /// Registers `subscriber` and hands `value` to it before any other
  /// value can reach it. Values pushed from inside that first callback are
  /// delivered right after it.
  pub(crate) fn subscribe_with_first<O>(&self, subscriber: Subscriber<O>, value: Item)
  where
    O: Observer<Item, Err> + 'static,
    Item: 'static,
    Err: 'static,
  {
    let Some(slot) = self.register(subscriber) else {
      return;
    };
    let observer = slot.rc_deref_mut().observer.take();
    if let Some(observer) = observer {
      self.run(&slot, observer, value);
    }
  }

  /// Records the terminal state and takes every subscriber out. `None` if
  /// the subject already terminated.
  fn terminate(&self, state: SubjectState<Err>) -> Option<Vec<BoxedObserver<Item, Err>>> {
    let mut inner = self.inner.rc_deref_mut();
    if !matches!(inner.state, SubjectState::Active) {
      return None;
    }
    inner.state = state;
    Some(inner.observers.drain())
  }

  fn terminal(&self) -> Option<Terminal<Err>> {
    match &self.inner.rc_deref().state {
      SubjectState::Active => None,
      SubjectState::Completed => Some(Terminal::Complete),
      SubjectState::Errored(err) => Some(Terminal::Error(err.clone())),
    }
  }

  /// Notifies an observer that was taken out of its slot, then keeps
  /// draining the values queued for it meanwhile. Finally the observer goes
  /// back into its slot, or is finished off if the slot was dropped.
  fn run(&self, slot: &SubjectSlot<Item, Err>, mut observer: BoxedObserver<Item, Err>, value: Item) {
    let mut value = Some(value);
    while let Some(v) = value.take() {
      if let Err(payload) = catch_unwind(AssertUnwindSafe(|| observer.next(v))) {
        report_panic(payload);
      }
      let mut slot = slot.rc_deref_mut();
      if slot.removed && !slot.pending_terminal {
        slot.pending.clear();
        return;
      }
      value = slot.pending.pop_front();
      if value.is_none() && !slot.removed {
        slot.observer = Some(observer);
        return;
      }
    }

    let terminal = self.terminal();
    let res = catch_unwind(AssertUnwindSafe(|| match terminal {
      Some(Terminal::Complete) => observer.complete(),
      Some(Terminal::Error(err)) => observer.error(err),
      None => {}
    }));
    if let Err(payload) = res {
      report_panic(payload);
    }
  }

  /// Adds `subscriber` to the registry. A terminated subject hands it the
  /// terminal notification instead and returns `None`.
  fn register<O>(&self, mut subscriber: Subscriber<O>) -> Option<SubjectSlot<Item, Err>>
  where
    O: Observer<Item, Err> + 'static,
    Item: 'static,
    Err: 'static,
  {
    match self.terminal() {
      Some(Terminal::Complete) => subscriber.complete(),
      Some(Terminal::Error(err)) => subscriber.error(err),
      None if subscriber.is_finished() => {}
      None => {
        let subscription = subscriber.subscription().clone();
        let (id, slot) = self.inner.rc_deref_mut().observers.add(Box::new(subscriber));
        let weak = self.inner.downgrade();
        subscription.add(Teardown::new(move || {
          if let Some(inner) = weak.upgrade() {
            let removed = inner.rc_deref_mut().observers.remove(id);
            drop(removed);
          }
        }));
        return Some(slot);
      }
    }
    None
  }
}

impl<Item, Err, O> Observable<Item, Err, O> for Subject<Item, Err>
where
  O: Observer<Item, Err> + 'static,
  Item: Clone + 'static,
  Err: Clone + 'static,
{
  fn actual_subscribe(self, subscriber: Subscriber<O>) { self.register(subscriber); }
}

impl<Item, Err> ObservableExt<Item, Err> for Subject<Item, Err> {}

impl<Item: Clone, Err: Clone> Observer<Item, Err> for Subject<Item, Err> {
  #[inline]
  fn next(&mut self, value: Item) { Subject::next(self, value) }

  #[inline]
  fn error(&mut self, err: Err) { Subject::error(self, err) }

  #[inline]
  fn complete(&mut self) { Subject::complete(self) }

  #[inline]
  fn is_finished(&self) -> bool { self.is_closed() }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use std::convert::Infallible;

  fn recorder<Item: Clone + std::fmt::Debug + 'static>(
    subject: &Subject<Item, String>, name: &'static str, log: &MutRc<Vec<String>>,
  ) -> SubscriptionWrapper<LocalSubscription> {
    let (l1, l2, l3) = (log.clone(), log.clone(), log.clone());
    subject.clone().subscribe_all(
      move |v| l1.rc_deref_mut().push(format!("{name}:{v:?}")),
      move |e| l2.rc_deref_mut().push(format!("{name}:error {e}")),
      move || l3.rc_deref_mut().push(format!("{name}:complete")),
    )
  }

  #[test]
  fn fan_out_in_subscription_order() {
    let subject = Subject::new();
    let log = MutRc::own(vec![]);
    recorder(&subject, "a", &log);
    recorder(&subject, "b", &log);

    subject.next(1);
    subject.next(2);
    assert_eq!(*log.rc_deref(), vec!["a:1", "b:1", "a:2", "b:2"]);
  }

  #[test]
  fn unsubscribe_stops_delivery() {
    let subject = Subject::new();
    let log = MutRc::own(vec![]);
    let a = recorder(&subject, "a", &log);
    recorder(&subject, "b", &log);

    subject.next(1);
    let mut a = a.into_inner();
    a.unsubscribe();
    a.unsubscribe();
    subject.next(2);
    assert_eq!(*log.rc_deref(), vec!["a:1", "b:1", "b:2"]);
    assert_eq!(subject.subscriber_count(), 1);
  }

  #[test]
  fn complete_closes_subject() {
    let subject = Subject::new();
    let log = MutRc::own(vec![]);
    recorder(&subject, "a", &log);

    subject.next(1);
    subject.complete();
    subject.next(2);
    subject.complete();
    subject.error("late".to_string());
    assert_eq!(*log.rc_deref(), vec!["a:1", "a:complete"]);
    assert!(subject.is_closed());
    assert_eq!(subject.subscriber_count(), 0);
  }

  #[test]
  fn late_subscriber_gets_terminal() {
    let completed = Subject::<i32, String>::new();
    completed.complete();
    let errored = Subject::<i32, String>::new();
    errored.error("boom".to_string());

    let log = MutRc::own(vec![]);
    recorder(&completed, "c", &log);
    recorder(&errored, "e", &log);
    assert_eq!(*log.rc_deref(), vec!["c:complete", "e:error boom"]);
  }

  #[test]
  fn panicking_subscriber_is_isolated() {
    let reported = MutRc::own(0);
    let c_reported = reported.clone();
    set_unhandled_error_hook(move |_| *c_reported.rc_deref_mut() += 1);

    let subject: Subject<i32, Infallible> = Subject::new();
    let seen = MutRc::own(vec![]);
    subject.clone().subscribe(|v| {
      if v == 1 {
        panic!("subscriber failed")
      }
    });
    let c_seen = seen.clone();
    subject.clone().subscribe(move |v| c_seen.rc_deref_mut().push(v));

    subject.next(1);
    subject.next(2);
    take_unhandled_error_hook();

    assert_eq!(*seen.rc_deref(), vec![1, 2]);
    assert_eq!(*reported.rc_deref(), 1);
    assert_eq!(subject.subscriber_count(), 2);
  }

  #[test]
  fn unsubscribe_other_during_fan_out() {
    let subject: Subject<i32, Infallible> = Subject::new();
    let seen = MutRc::own(vec![]);
    let victim = MutRc::own(None::<LocalSubscription>);

    let c_victim = victim.clone();
    subject.clone().subscribe(move |_| {
      let victim = c_victim.rc_deref_mut().take();
      if let Some(mut victim) = victim {
        victim.unsubscribe();
      }
    });
    let c_seen = seen.clone();
    let s = subject.clone().subscribe(move |v| c_seen.rc_deref_mut().push(v));
    *victim.rc_deref_mut() = Some(s.into_inner());

    subject.next(1);
    subject.next(2);
    assert!(seen.rc_deref().is_empty());
    assert_eq!(subject.subscriber_count(), 1);
  }

  #[test]
  fn subscribe_during_fan_out_waits_for_next_value() {
    let subject: Subject<i32, Infallible> = Subject::new();
    let seen = MutRc::own(vec![]);

    let (c_subject, c_seen) = (subject.clone(), seen.clone());
    let added = MutRc::own(false);
    subject.clone().subscribe(move |_| {
      if !*added.rc_deref() {
        *added.rc_deref_mut() = true;
        let seen = c_seen.clone();
        c_subject.clone().subscribe(move |v| seen.rc_deref_mut().push(v));
      }
    });

    subject.next(1);
    subject.next(2);
    assert_eq!(*seen.rc_deref(), vec![2]);
  }

  #[test]
  fn reentrant_next_waits_for_running_subscriber() {
    let subject: Subject<i32, Infallible> = Subject::new();
    let log = MutRc::own(vec![]);

    let (c_subject, c_log) = (subject.clone(), log.clone());
    subject.clone().subscribe(move |v| {
      c_log.rc_deref_mut().push(format!("a:{v}"));
      if v == 1 {
        c_subject.next(10);
      }
    });
    let c_log = log.clone();
    subject.clone().subscribe(move |v| c_log.rc_deref_mut().push(format!("b:{v}")));

    subject.next(1);
    assert_eq!(*log.rc_deref(), vec!["a:1", "b:10", "a:10", "b:1"]);
  }

  #[test]
  fn nested_values_keep_their_order() {
    let subject: Subject<i32, Infallible> = Subject::new();
    let seen = MutRc::own(vec![]);

    let (c_subject, c_seen) = (subject.clone(), seen.clone());
    subject.clone().subscribe(move |v| {
      c_seen.rc_deref_mut().push(v);
      if v == 1 {
        c_subject.next(2);
        c_subject.next(3);
      }
    });

    subject.next(1);
    subject.next(4);
    assert_eq!(*seen.rc_deref(), vec![1, 2, 3, 4]);
  }

  #[test]
  fn nested_values_arrive_before_nested_complete() {
    let subject: Subject<i32, Infallible> = Subject::new();
    let log = MutRc::own(vec![]);

    let (c_subject, l1, l2) = (subject.clone(), log.clone(), log.clone());
    subject.clone().subscribe_all(
      move |v| {
        l1.rc_deref_mut().push(format!("next:{v}"));
        if v == 1 {
          c_subject.next(2);
          c_subject.complete();
        }
      },
      |_| {},
      move || l2.rc_deref_mut().push("complete".to_string()),
    );

    subject.next(1);
    assert_eq!(*log.rc_deref(), vec!["next:1", "next:2", "complete"]);
    assert_eq!(subject.subscriber_count(), 0);
  }

  #[test]
  fn unsubscribe_inside_callback_drops_queued_values() {
    let subject: Subject<i32, Infallible> = Subject::new();
    let seen = MutRc::own(vec![]);
    let own = MutRc::own(None::<LocalSubscription>);

    let (c_subject, c_seen, c_own) = (subject.clone(), seen.clone(), own.clone());
    let subscription = subject.clone().subscribe(move |v| {
      c_seen.rc_deref_mut().push(v);
      c_subject.next(v + 1);
      let own = c_own.rc_deref_mut().take();
      if let Some(mut own) = own {
        own.unsubscribe();
      }
    });
    *own.rc_deref_mut() = Some(subscription.into_inner());

    subject.next(1);
    assert_eq!(*seen.rc_deref(), vec![1]);
    assert_eq!(subject.subscriber_count(), 0);
  }

  #[test]
  fn complete_from_inside_reaches_running_subscriber() {
    let subject: Subject<i32, Infallible> = Subject::new();
    let log = MutRc::own(vec![]);

    let (c_subject, l1, l2) = (subject.clone(), log.clone(), log.clone());
    subject.clone().subscribe_all(
      move |v| {
        l1.rc_deref_mut().push(format!("next:{v}"));
        c_subject.complete();
      },
      |_| {},
      move || l2.rc_deref_mut().push("complete".to_string()),
    );

    subject.next(1);
    assert_eq!(*log.rc_deref(), vec!["next:1", "complete"]);
  }

  #[test]
  fn subject_as_observer() {
    let subject: Subject<i32, Infallible> = Subject::new();
    let seen = MutRc::own(vec![]);
    let c_seen = seen.clone();
    subject.clone().subscribe(move |v| c_seen.rc_deref_mut().push(v));

    of_sequence!(1, 2, 3).subscribe_with(subject.clone());
    assert_eq!(*seen.rc_deref(), vec![1, 2, 3]);
    assert!(subject.is_closed());
  }
}
