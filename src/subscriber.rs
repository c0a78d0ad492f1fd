use crate::{
  observer::Observer,
  subscription::{LocalSubscription, SubscriptionLike},
};

/// Implements the Observer trait and Subscription trait. While the Observer is
/// the public API for consuming the values of an Observable, all Observers get
/// converted to a Subscriber, in order to provide Subscription capabilities.
///
/// The subscriber guards the observer contract: nothing is delivered after a
/// terminal notification or after the subscription was closed, and a
/// terminal notification closes the subscription, running every teardown
/// registered on it.
pub struct Subscriber<O> {
  observer: O,
  subscription: LocalSubscription,
  stopped: bool,
}

impl<O> Subscriber<O> {
  pub fn new(observer: O, subscription: LocalSubscription) -> Self {
    Subscriber { observer, subscription, stopped: false }
  }

  /// The subscription this subscriber closes on termination.
  #[inline]
  pub fn subscription(&self) -> &LocalSubscription { &self.subscription }

  /// Wraps the inner observer, keeping the subscription. Operators use this
  /// to insert their own observer in front of the downstream one.
  pub fn map_observer<O2>(self, f: impl FnOnce(O) -> O2) -> Subscriber<O2> {
    Subscriber {
      observer: f(self.observer),
      subscription: self.subscription,
      stopped: self.stopped,
    }
  }

  pub fn into_parts(self) -> (O, LocalSubscription) { (self.observer, self.subscription) }

  /// `true` after a terminal notification or once the subscription closed.
  #[inline]
  pub fn is_finished(&self) -> bool { self.stopped || self.subscription.is_closed() }
}

impl<Item, Err, O> Observer<Item, Err> for Subscriber<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if !self.is_finished() {
      self.observer.next(value)
    }
  }

  fn error(&mut self, err: Err) {
    if !self.is_finished() {
      self.stopped = true;
      self.observer.error(err);
      self.subscription.unsubscribe();
    }
  }

  fn complete(&mut self) {
    if !self.is_finished() {
      self.stopped = true;
      self.observer.complete();
      self.subscription.unsubscribe();
    }
  }

  #[inline]
  fn is_finished(&self) -> bool { Subscriber::is_finished(self) }
}

impl<O> SubscriptionLike for Subscriber<O> {
  #[inline]
  fn unsubscribe(&mut self) { self.subscription.unsubscribe() }

  #[inline]
  fn is_closed(&self) -> bool { self.subscription.is_closed() }
}
