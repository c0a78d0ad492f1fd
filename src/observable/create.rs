use std::marker::PhantomData;

use crate::{
  observable::{Observable, ObservableExt},
  observer::{Observer, SharedObserver},
  subscriber::Subscriber,
  subscription::{LocalSubscription, SubscriptionLike},
};

/// Creates an observable from a producer function.
///
/// The producer runs on every subscription and receives an [`Emitter`]. It
/// returns its teardown: anything implementing [`SubscriptionLike`], `()`
/// when there is nothing to release or a [`Teardown`] closure. The teardown
/// runs when the subscription ends, whichever way it ends.
///
/// [`Teardown`]: crate::subscription::Teardown
///
/// # Examples
///
/// ```
/// use rxlite::prelude::*;
///
/// observable::create(|mut emitter: Emitter<i32, ()>| {
///   emitter.next(1);
///   emitter.next(2);
///   emitter.complete();
/// })
/// .subscribe(|v| println!("{}", v));
/// ```
pub fn create<F, Item, Err, T>(producer: F) -> Create<F, Item, Err>
where
  F: FnOnce(Emitter<Item, Err>) -> T,
  T: SubscriptionLike + 'static,
{
  Create { producer, _marker: PhantomData }
}

pub struct Create<F, Item, Err> {
  producer: F,
  _marker: PhantomData<fn() -> (Item, Err)>,
}

impl<F: Clone, Item, Err> Clone for Create<F, Item, Err> {
  fn clone(&self) -> Self { Create { producer: self.producer.clone(), _marker: PhantomData } }
}

impl<F, Item, Err, O, T> Observable<Item, Err, O> for Create<F, Item, Err>
where
  F: FnOnce(Emitter<Item, Err>) -> T,
  T: SubscriptionLike + 'static,
  O: Observer<Item, Err> + 'static,
{
  fn actual_subscribe(self, subscriber: Subscriber<O>) {
    let subscriber = subscriber.map_observer(|o| Box::new(o) as Box<dyn Observer<Item, Err>>);
    let subscription = subscriber.subscription().clone();
    let emitter = Emitter { observer: SharedObserver::new(subscriber), subscription: subscription.clone() };
    let teardown = (self.producer)(emitter);
    subscription.add(teardown);
  }
}

impl<F, Item, Err, T> ObservableExt<Item, Err> for Create<F, Item, Err>
where
  F: FnOnce(Emitter<Item, Err>) -> T,
  T: SubscriptionLike + 'static,
{
}

/// The producer side of [`create`]. Cheap to clone, so it can be moved into
/// callbacks and timers.
///
/// After `error` or `complete`, or once the subscriber unsubscribed, every
/// call is ignored. Calls made from inside the downstream callbacks are
/// delivered once the running callback returns.
pub struct Emitter<Item, Err> {
  observer: SharedObserver<Subscriber<Box<dyn Observer<Item, Err>>>, Item, Err>,
  subscription: LocalSubscription,
}

impl<Item, Err> Clone for Emitter<Item, Err> {
  fn clone(&self) -> Self { Emitter { observer: self.observer.clone(), subscription: self.subscription.clone() } }
}

impl<Item, Err> Emitter<Item, Err> {
  /// The subscription the emitted values flow through.
  pub fn subscription(&self) -> LocalSubscription { self.subscription.clone() }
}

impl<Item, Err> Observer<Item, Err> for Emitter<Item, Err> {
  #[inline]
  fn next(&mut self, value: Item) { self.observer.next(value) }

  #[inline]
  fn error(&mut self, err: Err) { self.observer.error(err) }

  #[inline]
  fn complete(&mut self) { self.observer.complete() }

  #[inline]
  fn is_finished(&self) -> bool { self.subscription.is_closed() || self.observer.is_finished() }
}
