use std::time::Duration;

use crate::{
  observer::Observer,
  ops::{
    debounce::DebounceOp,
    distinct_until_changed::DistinctUntilChangedOp,
    filter::FilterOp,
    map::{MapOp, MapWithIndexOp},
    merge_map::MergeMapOp,
    pluck::PluckOp,
    reduce::ReduceOp,
    scan::ScanOp,
    switch_map::SwitchMapOp,
    throttle_time::ThrottleTimeOp,
  },
  scheduler::Scheduler,
  subscriber::Subscriber,
  subscription::{LocalSubscription, SubscriptionWrapper},
  type_hint::TypeHint,
};

mod create;
pub use create::*;
mod from_event;
pub use from_event::*;
mod from_iter;
pub use from_iter::*;
mod interval;
pub use interval::*;
mod of;
pub use of::*;
mod observable_all;
pub use observable_all::*;
mod observable_err;
pub use observable_err::*;
mod observable_next;
pub use observable_next::*;

/// A representation of any set of values over any amount of time. This is the
/// most basic building block rxlite.
///
/// `actual_subscribe` starts the production of values into `subscriber`.
/// Everything the production needs to release on cancellation is registered
/// on `subscriber.subscription()`.
pub trait Observable<Item, Err, O>: ObservableExt<Item, Err>
where
  O: Observer<Item, Err>,
{
  fn actual_subscribe(self, subscriber: Subscriber<O>);
}

pub trait ObservableExt<Item, Err>: Sized {
  /// Creates a new stream which calls a closure on each element and uses
  /// its return as the value.
  #[inline]
  fn map<B, F>(self, f: F) -> MapOp<Self, F, Item>
  where
    F: FnMut(Item) -> B,
  {
    MapOp::new(self, f)
  }

  /// Like `map`, but the closure also receives the zero based position of
  /// the value in the stream.
  #[inline]
  fn map_with_index<B, F>(self, f: F) -> MapWithIndexOp<Self, F, Item>
  where
    F: FnMut(Item, usize) -> B,
  {
    MapWithIndexOp::new(self, f)
  }

  /// Emit only those items from an Observable that pass a predicate.
  #[inline]
  fn filter<F>(self, filter: F) -> FilterOp<Self, F>
  where
    F: FnMut(&Item) -> bool,
  {
    FilterOp { source: self, filter }
  }

  /// Emits a value from the source Observable, then ignores subsequent source
  /// values for `duration`, then repeats this process.
  #[inline]
  fn throttle_time<SD>(self, duration: Duration, scheduler: SD) -> ThrottleTimeOp<Self, SD>
  where
    SD: Scheduler,
  {
    ThrottleTimeOp { source: self, scheduler, duration }
  }

  /// Emits a value only after `duration` passed without another source
  /// emission. On completion the pending value, if any, is emitted first.
  #[inline]
  fn debounce_time<SD>(self, duration: Duration, scheduler: SD) -> DebounceOp<Self, SD>
  where
    SD: Scheduler,
  {
    DebounceOp { source: self, scheduler, duration }
  }

  /// Only emit when the current value is different than the last emitted
  /// value.
  #[inline]
  fn distinct_until_changed(self) -> DistinctUntilChangedOp<Self>
  where
    Item: PartialEq + Clone,
  {
    DistinctUntilChangedOp { source: self }
  }

  /// Folds the stream into a single value, emitted when the source
  /// completes. An empty source emits `initial`.
  #[inline]
  fn reduce<Acc, F>(self, initial: Acc, binary_op: F) -> ReduceOp<Self, F, Acc, Item>
  where
    F: FnMut(Acc, Item) -> Acc,
  {
    ReduceOp::new(self, binary_op, initial)
  }

  /// Like `reduce`, but emits every intermediate accumulation.
  #[inline]
  fn scan<Acc, F>(self, initial: Acc, binary_op: F) -> ScanOp<Self, F, Acc, Item>
  where
    F: FnMut(Acc, Item) -> Acc,
    Acc: Clone,
  {
    ScanOp::new(self, binary_op, initial)
  }

  /// Maps each JSON value to the value found by following `keys`.
  ///
  /// A missing key or a non-container on the path yields `Value::Null`.
  #[inline]
  fn pluck<K>(self, keys: K) -> PluckOp<Self>
  where
    K: IntoIterator,
    K::Item: Into<String>,
  {
    PluckOp::new(self, keys.into_iter().map(Into::into).collect())
  }

  /// Maps each value to an inner observable and emits the values of all
  /// active inner observables, interleaved as they arrive.
  #[inline]
  fn merge_map<B, Inner, F>(self, f: F) -> MergeMapOp<Self, F, Item>
  where
    F: FnMut(Item) -> Inner,
    Inner: ObservableExt<B, Err>,
  {
    MergeMapOp { source: self, func: f, _hint: TypeHint::new() }
  }

  /// Maps each value to an inner observable, unsubscribing from the previous
  /// inner observable first. Only the latest inner observable emits.
  #[inline]
  fn switch_map<B, Inner, F>(self, f: F) -> SwitchMapOp<Self, F, Item>
  where
    F: FnMut(Item) -> Inner,
    Inner: ObservableExt<B, Err>,
  {
    SwitchMapOp { source: self, func: f, _hint: TypeHint::new() }
  }

  /// Subscribes with a handler for values only.
  ///
  /// An error reaching this subscriber is reported as
  /// [`UnhandledError::Uncaught`](crate::error::UnhandledError::Uncaught).
  #[inline]
  fn subscribe<N>(self, next: N) -> SubscriptionWrapper<LocalSubscription>
  where
    N: FnMut(Item),
    Self: Observable<Item, Err, ObserverN<N>>,
  {
    self.subscribe_with(ObserverN::new(next))
  }

  /// Subscribes with handlers for values and errors.
  #[inline]
  fn subscribe_err<N, E>(self, next: N, error: E) -> SubscriptionWrapper<LocalSubscription>
  where
    N: FnMut(Item),
    E: FnMut(Err),
    Self: Observable<Item, Err, ObserverErr<N, E>>,
  {
    self.subscribe_with(ObserverErr::new(next, error))
  }

  /// Invokes an execution of an Observable and registers Observer handlers for
  /// notifications it will emit.
  ///
  /// * `error`: A handler for a terminal event resulting from an error.
  /// * `complete`: A handler for a terminal event resulting from successful
  ///   completion.
  #[inline]
  fn subscribe_all<N, E, C>(self, next: N, error: E, complete: C) -> SubscriptionWrapper<LocalSubscription>
  where
    N: FnMut(Item),
    E: FnMut(Err),
    C: FnMut(),
    Self: Observable<Item, Err, ObserverAll<N, E, C>>,
  {
    self.subscribe_with(ObserverAll::new(next, error, complete))
  }

  /// Subscribes any [`Observer`], a `Subject` for instance.
  fn subscribe_with<O>(self, observer: O) -> SubscriptionWrapper<LocalSubscription>
  where
    O: Observer<Item, Err>,
    Self: Observable<Item, Err, O>,
  {
    let subscription = LocalSubscription::default();
    self.actual_subscribe(Subscriber::new(observer, subscription.clone()));
    SubscriptionWrapper(subscription)
  }
}
