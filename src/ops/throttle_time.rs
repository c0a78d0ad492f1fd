use std::{cell::Cell, rc::Rc, time::Duration};

use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
  scheduler::Scheduler,
  subscriber::Subscriber,
  subscription::LocalSubscription,
};

/// Emits a value from the source Observable, then ignores subsequent source
/// values for `duration`, then repeats this process.
///
/// A value arriving exactly when the window ends is emitted.
///
/// # Example
/// ```
/// use rxlite::prelude::*;
/// use std::time::Duration;
///
/// let scheduler = TestScheduler::new();
/// observable::interval(Duration::from_millis(1), scheduler.clone())
///   .throttle_time(Duration::from_millis(9), scheduler.clone())
///   .subscribe(move |v| println!("{}", v));
/// scheduler.advance_by(Duration::from_millis(20));
/// ```
#[derive(Clone)]
pub struct ThrottleTimeOp<S, SD> {
  pub(crate) source: S,
  pub(crate) scheduler: SD,
  pub(crate) duration: Duration,
}

impl<Item, Err, O, S, SD> Observable<Item, Err, O> for ThrottleTimeOp<S, SD>
where
  O: Observer<Item, Err>,
  S: Observable<Item, Err, ThrottleTimeObserver<O, SD>>,
  SD: Scheduler,
{
  fn actual_subscribe(self, subscriber: Subscriber<O>) {
    let Self { source, scheduler, duration } = self;
    let subscription = subscriber.subscription().clone();
    source.actual_subscribe(subscriber.map_observer(|observer| ThrottleTimeObserver {
      observer,
      scheduler,
      duration,
      throttled: Rc::new(Cell::new(false)),
      subscription,
    }))
  }
}

impl<Item, Err, S, SD> ObservableExt<Item, Err> for ThrottleTimeOp<S, SD> where S: ObservableExt<Item, Err> {}

pub struct ThrottleTimeObserver<O, SD> {
  observer: O,
  scheduler: SD,
  duration: Duration,
  throttled: Rc<Cell<bool>>,
  subscription: LocalSubscription,
}

impl<Item, Err, O, SD> Observer<Item, Err> for ThrottleTimeObserver<O, SD>
where
  O: Observer<Item, Err>,
  SD: Scheduler,
{
  fn next(&mut self, value: Item) {
    if self.throttled.get() {
      return;
    }
    self.throttled.set(true);
    let throttled = self.throttled.clone();
    let handle = self.scheduler.schedule(move || throttled.set(false), self.duration);
    self.subscription.add(handle);
    self.observer.next(value);
  }

  fn error(&mut self, err: Err) { self.observer.error(err) }

  fn complete(&mut self) { self.observer.complete() }

  fn is_finished(&self) -> bool { self.observer.is_finished() }
}
