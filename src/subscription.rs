use smallvec::SmallVec;
use std::fmt::{Debug, Formatter};

use crate::rc::MutRc;

/// Subscription returns from `Observable.subscribe(Subscriber)` to allow
///  unsubscribing.
pub trait SubscriptionLike {
  /// This allows deregistering an stream before it has finished receiving all
  /// events (i.e. before onCompleted is called).
  ///
  /// Calling it again, or after the stream finished on its own, does nothing.
  fn unsubscribe(&mut self);

  fn is_closed(&self) -> bool;
}

impl Debug for Box<dyn SubscriptionLike> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Box<dyn SubscriptionLike>")
      .field("is_closed", &self.is_closed())
      .finish()
  }
}

/// The subscription every `subscribe` call hands out.
///
/// It owns the teardown logic of one subscription chain: producer teardowns,
/// pending timers and the subscriptions of inner observables are all added
/// to it. Clones share the same state, so unsubscribing any clone closes all
/// of them.
#[derive(Clone, Default)]
pub struct LocalSubscription(MutRc<Inner>);

impl LocalSubscription {
  /// Registers a teardown. A teardown that is already closed, or this very
  /// subscription, is ignored. If this subscription is already closed the
  /// teardown runs immediately instead of being stored.
  pub fn add<S: SubscriptionLike + 'static>(&self, subscription: S) {
    if subscription.is_closed() {
      return;
    }
    if let Some(other) = (&subscription as &dyn std::any::Any).downcast_ref::<Self>() {
      if self.ptr_eq(other) {
        return;
      }
    }
    let rejected = {
      let mut inner = self.0.rc_deref_mut();
      if inner.closed {
        Some(subscription)
      } else {
        inner.teardown.retain(|v| !v.is_closed());
        inner.teardown.push(Box::new(subscription));
        None
      }
    };
    if let Some(mut subscription) = rejected {
      subscription.unsubscribe();
    }
  }

  #[inline]
  pub fn ptr_eq(&self, other: &Self) -> bool { self.0.ptr_eq(&other.0) }

  /// Number of teardowns still waiting to run.
  pub fn teardown_size(&self) -> usize { self.0.rc_deref().teardown.len() }
}

impl Debug for LocalSubscription {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let inner = self.0.rc_deref();
    f.debug_struct("LocalSubscription")
      .field("closed", &inner.closed)
      .field("teardown_count", &inner.teardown.len())
      .finish()
  }
}

impl SubscriptionLike for LocalSubscription {
  fn unsubscribe(&mut self) {
    // Teardowns run outside the borrow, they are free to touch this
    // subscription again.
    let teardown = {
      let mut inner = self.0.rc_deref_mut();
      if inner.closed {
        return;
      }
      inner.closed = true;
      std::mem::take(&mut inner.teardown)
    };
    for mut v in teardown {
      v.unsubscribe();
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.0.rc_deref().closed }
}

#[derive(Default)]
struct Inner {
  closed: bool,
  teardown: SmallVec<[Box<dyn SubscriptionLike>; 1]>,
}

/// A teardown closure, run at most once.
///
/// Producers passed to [`create`](crate::observable::create) return one of
/// these to release whatever they acquired.
pub struct Teardown<F>(Option<F>);

impl<F: FnOnce()> Teardown<F> {
  pub fn new(f: F) -> Self { Teardown(Some(f)) }
}

impl<F: FnOnce()> SubscriptionLike for Teardown<F> {
  fn unsubscribe(&mut self) {
    if let Some(f) = self.0.take() {
      f()
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.0.is_none() }
}

/// The empty teardown.
impl SubscriptionLike for () {
  #[inline]
  fn unsubscribe(&mut self) {}

  #[inline]
  fn is_closed(&self) -> bool { true }
}

impl<T: ?Sized> SubscriptionLike for Box<T>
where
  T: SubscriptionLike,
{
  #[inline]
  fn unsubscribe(&mut self) {
    let s = &mut **self;
    s.unsubscribe()
  }

  #[inline]
  fn is_closed(&self) -> bool {
    let s = &**self;
    s.is_closed()
  }
}

/// Wrapper around a subscription which provides the
/// `unsubscribe_when_dropped()` method.
#[derive(Debug, Clone)]
pub struct SubscriptionWrapper<T: SubscriptionLike>(pub(crate) T);

impl<T: SubscriptionLike> SubscriptionWrapper<T> {
  /// Activates "RAII" behavior for this subscription. That means
  /// `unsubscribe()` will be called automatically as soon as the returned
  /// value goes out of scope.
  ///
  /// **Attention:** If you don't assign the return value to a variable,
  /// `unsubscribe()` is called immediately, which is probably not what you
  /// want!
  pub fn unsubscribe_when_dropped(self) -> SubscriptionGuard<T> { SubscriptionGuard(self.0) }

  /// Consumes this wrapper and returns the underlying subscription.
  pub fn into_inner(self) -> T { self.0 }
}

impl<T: SubscriptionLike> SubscriptionLike for SubscriptionWrapper<T> {
  #[inline]
  fn is_closed(&self) -> bool { self.0.is_closed() }
  #[inline]
  fn unsubscribe(&mut self) { self.0.unsubscribe() }
}

/// An RAII implementation of a "scoped subscribed" of a subscription.
/// When this structure is dropped (falls out of scope), the subscription will
/// be unsubscribed.
///
/// If you want to drop it immediately, wrap it in its own scope
#[derive(Debug)]
#[must_use]
pub struct SubscriptionGuard<T: SubscriptionLike>(pub(crate) T);

impl<T: SubscriptionLike> SubscriptionGuard<T> {
  /// Wraps an existing subscription with a guard to enable RAII behavior for
  /// it.
  pub fn new(subscription: T) -> SubscriptionGuard<T> { SubscriptionGuard(subscription) }
}

impl<T: SubscriptionLike> Drop for SubscriptionGuard<T> {
  #[inline]
  fn drop(&mut self) { self.0.unsubscribe() }
}
