use std::convert::Infallible;

use crate::{
  event::EventSource,
  observable::{Observable, ObservableExt},
  observer::Observer,
  rc::MutRc,
  subscriber::Subscriber,
  subscription::Teardown,
};

/// Creates an observable of the `kind` events delivered by `target`.
///
/// Each subscription registers its own listener and removes it again when
/// unsubscribed. Never completes on its own.
pub fn from_event<T>(target: T, kind: impl Into<String>) -> FromEvent<T>
where
  T: EventSource,
{
  FromEvent { target, kind: kind.into() }
}

#[derive(Clone)]
pub struct FromEvent<T> {
  target: T,
  kind: String,
}

impl<T, O> Observable<T::Event, Infallible, O> for FromEvent<T>
where
  T: EventSource + 'static,
  O: Observer<T::Event, Infallible> + 'static,
{
  fn actual_subscribe(self, subscriber: Subscriber<O>) {
    let subscription = subscriber.subscription().clone();
    let subscriber = MutRc::own(subscriber);
    let id = self
      .target
      .add_listener(&self.kind, Box::new(move |e| subscriber.rc_deref_mut().next(e)));
    let FromEvent { target, kind } = self;
    subscription.add(Teardown::new(move || {
      target.remove_listener(&kind, id);
    }));
  }
}

impl<T: EventSource> ObservableExt<T::Event, Infallible> for FromEvent<T> {}
