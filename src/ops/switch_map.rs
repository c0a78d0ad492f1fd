//! SwitchMap operator
//!
//! Transforms each value emitted by the source into an inner Observable, and
//! forwards items from only the most recently created inner Observable. When a
//! new inner Observable is produced, the previous one is unsubscribed.
//!
//! Behavior summary:
//! - Only the latest inner Observable's emissions are forwarded downstream.
//! - The operator completes only after the source completes and the current
//!   inner Observable completes.
//! - Errors from the source or from the current inner Observable are propagated
//!   immediately.
//!
//! Common uses: canceling in-flight operations when new data arrives,
//! type-ahead search, or restarting a timer on every click.

use crate::{
  observable::{Observable, ObservableExt},
  observer::{Observer, SharedObserver},
  rc::MutRc,
  subscriber::Subscriber,
  subscription::{LocalSubscription, SubscriptionLike},
  type_hint::TypeHint,
};

#[derive(Clone)]
pub struct SwitchMapOp<S, F, Item> {
  pub(crate) source: S,
  pub(crate) func: F,
  pub(crate) _hint: TypeHint<Item>,
}

impl<Item, Err, O, S, F, B, Inner> Observable<B, Err, O> for SwitchMapOp<S, F, Item>
where
  O: Observer<B, Err>,
  S: Observable<Item, Err, SwitchMapOuterObserver<O, F, B, Err>>,
  F: FnMut(Item) -> Inner,
  Inner: Observable<B, Err, SwitchMapInnerObserver<O, B, Err>>,
{
  fn actual_subscribe(self, subscriber: Subscriber<O>) {
    let (observer, parent) = subscriber.into_parts();
    let source_subscription = LocalSubscription::default();
    parent.add(source_subscription.clone());
    let outer = SwitchMapOuterObserver {
      observer: SharedObserver::new(Subscriber::new(observer, parent.clone())),
      func: self.func,
      state: MutRc::own(SwitchMapState::default()),
      parent,
    };
    self.source.actual_subscribe(Subscriber::new(outer, source_subscription));
  }
}

impl<Item, Err, S, F, B, Inner> ObservableExt<B, Err> for SwitchMapOp<S, F, Item>
where
  S: ObservableExt<Item, Err>,
  F: FnMut(Item) -> Inner,
  Inner: ObservableExt<B, Err>,
{
}

#[doc(hidden)]
#[derive(Default)]
pub struct SwitchMapState {
  current: Option<LocalSubscription>,
  inner_active: bool,
  outer_completed: bool,
}

#[doc(hidden)]
pub struct SwitchMapOuterObserver<O, F, B, Err> {
  observer: SharedObserver<Subscriber<O>, B, Err>,
  func: F,
  state: MutRc<SwitchMapState>,
  parent: LocalSubscription,
}

#[doc(hidden)]
pub struct SwitchMapInnerObserver<O, B, Err> {
  observer: SharedObserver<Subscriber<O>, B, Err>,
  state: MutRc<SwitchMapState>,
  subscription: LocalSubscription,
}

impl<O, B, Err> SwitchMapInnerObserver<O, B, Err> {
  fn is_current(&self) -> bool {
    self
      .state
      .rc_deref()
      .current
      .as_ref()
      .is_some_and(|c| c.ptr_eq(&self.subscription))
  }
}

impl<Item, Err, O, F, B, Inner> Observer<Item, Err> for SwitchMapOuterObserver<O, F, B, Err>
where
  O: Observer<B, Err>,
  F: FnMut(Item) -> Inner,
  Inner: Observable<B, Err, SwitchMapInnerObserver<O, B, Err>>,
{
  fn next(&mut self, value: Item) {
    let inner = (self.func)(value);
    let previous = self.state.rc_deref_mut().current.take();
    if let Some(mut previous) = previous {
      previous.unsubscribe();
    }

    let subscription = LocalSubscription::default();
    {
      let mut state = self.state.rc_deref_mut();
      state.current = Some(subscription.clone());
      state.inner_active = true;
    }
    self.parent.add(subscription.clone());
    let observer = SwitchMapInnerObserver {
      observer: self.observer.clone(),
      state: self.state.clone(),
      subscription: subscription.clone(),
    };
    inner.actual_subscribe(Subscriber::new(observer, subscription));
  }

  fn error(&mut self, err: Err) { self.observer.error(err) }

  fn complete(&mut self) {
    let done = {
      let mut state = self.state.rc_deref_mut();
      state.outer_completed = true;
      !state.inner_active
    };
    if done {
      self.observer.complete()
    }
  }

  fn is_finished(&self) -> bool { self.observer.is_finished() }
}

impl<B, Err, O> Observer<B, Err> for SwitchMapInnerObserver<O, B, Err>
where
  O: Observer<B, Err>,
{
  fn next(&mut self, value: B) {
    if self.is_current() {
      self.observer.next(value)
    }
  }

  fn error(&mut self, err: Err) {
    if self.is_current() {
      self.observer.error(err)
    }
  }

  fn complete(&mut self) {
    if !self.is_current() {
      return;
    }
    let done = {
      let mut state = self.state.rc_deref_mut();
      state.inner_active = false;
      state.outer_completed
    };
    if done {
      self.observer.complete()
    }
  }

  fn is_finished(&self) -> bool { self.observer.is_finished() }
}
