//! MergeMap operator
//!
//! Maps every source value to an inner observable and subscribes to all of
//! them concurrently, interleaving their values downstream in arrival order.
//!
//! - Completes once the source and every inner observable completed.
//! - The first error, from the source or any inner observable, is forwarded
//!   and tears down everything else.
//! - Unsubscribing tears down the source and every active inner observable.

use crate::{
  observable::{Observable, ObservableExt},
  observer::{Observer, SharedObserver},
  rc::MutRc,
  subscriber::Subscriber,
  subscription::LocalSubscription,
  type_hint::TypeHint,
};

#[derive(Clone)]
pub struct MergeMapOp<S, F, Item> {
  pub(crate) source: S,
  pub(crate) func: F,
  pub(crate) _hint: TypeHint<Item>,
}

impl<Item, Err, O, S, F, B, Inner> Observable<B, Err, O> for MergeMapOp<S, F, Item>
where
  O: Observer<B, Err>,
  S: Observable<Item, Err, MergeMapOuterObserver<O, F, B, Err>>,
  F: FnMut(Item) -> Inner,
  Inner: Observable<B, Err, MergeMapInnerObserver<O, B, Err>>,
{
  fn actual_subscribe(self, subscriber: Subscriber<O>) {
    let (observer, parent) = subscriber.into_parts();
    // The source gets its own subscription, its completion must not end the
    // inner streams.
    let source_subscription = LocalSubscription::default();
    parent.add(source_subscription.clone());
    let outer = MergeMapOuterObserver {
      observer: SharedObserver::new(Subscriber::new(observer, parent.clone())),
      func: self.func,
      state: MutRc::own(MergeMapState::default()),
      parent,
    };
    self.source.actual_subscribe(Subscriber::new(outer, source_subscription));
  }
}

impl<Item, Err, S, F, B, Inner> ObservableExt<B, Err> for MergeMapOp<S, F, Item>
where
  S: ObservableExt<Item, Err>,
  F: FnMut(Item) -> Inner,
  Inner: ObservableExt<B, Err>,
{
}

#[derive(Default)]
pub struct MergeMapState {
  active: usize,
  outer_completed: bool,
}

pub struct MergeMapOuterObserver<O, F, B, Err> {
  observer: SharedObserver<Subscriber<O>, B, Err>,
  func: F,
  state: MutRc<MergeMapState>,
  parent: LocalSubscription,
}

pub struct MergeMapInnerObserver<O, B, Err> {
  observer: SharedObserver<Subscriber<O>, B, Err>,
  state: MutRc<MergeMapState>,
}

impl<Item, Err, O, F, B, Inner> Observer<Item, Err> for MergeMapOuterObserver<O, F, B, Err>
where
  O: Observer<B, Err>,
  F: FnMut(Item) -> Inner,
  Inner: Observable<B, Err, MergeMapInnerObserver<O, B, Err>>,
{
  fn next(&mut self, value: Item) {
    let inner = (self.func)(value);
    let inner_subscription = LocalSubscription::default();
    self.parent.add(inner_subscription.clone());
    self.state.rc_deref_mut().active += 1;
    let observer = MergeMapInnerObserver { observer: self.observer.clone(), state: self.state.clone() };
    inner.actual_subscribe(Subscriber::new(observer, inner_subscription));
  }

  fn error(&mut self, err: Err) { self.observer.error(err) }

  fn complete(&mut self) {
    let done = {
      let mut state = self.state.rc_deref_mut();
      state.outer_completed = true;
      state.active == 0
    };
    if done {
      self.observer.complete()
    }
  }

  fn is_finished(&self) -> bool { self.observer.is_finished() }
}

impl<B, Err, O> Observer<B, Err> for MergeMapInnerObserver<O, B, Err>
where
  O: Observer<B, Err>,
{
  fn next(&mut self, value: B) { self.observer.next(value) }

  fn error(&mut self, err: Err) { self.observer.error(err) }

  fn complete(&mut self) {
    let done = {
      let mut state = self.state.rc_deref_mut();
      state.active -= 1;
      state.active == 0 && state.outer_completed
    };
    if done {
      self.observer.complete()
    }
  }

  fn is_finished(&self) -> bool { self.observer.is_finished() }
}
