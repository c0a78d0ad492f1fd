use std::time::Duration;

use crate::{
  observable::{Observable, ObservableExt},
  observer::{Observer, SharedObserver},
  rc::MutRc,
  scheduler::{Scheduler, TaskHandle},
  subscriber::Subscriber,
  subscription::{LocalSubscription, SubscriptionLike},
};

#[derive(Clone)]
pub struct DebounceOp<S, SD> {
  pub(crate) source: S,
  pub(crate) scheduler: SD,
  pub(crate) duration: Duration,
}

impl<Item, Err, O, S, SD> Observable<Item, Err, O> for DebounceOp<S, SD>
where
  O: Observer<Item, Err> + 'static,
  S: Observable<Item, Err, DebounceObserver<O, SD, Item, Err>>,
  SD: Scheduler,
  Item: 'static,
  Err: 'static,
{
  fn actual_subscribe(self, subscriber: Subscriber<O>) {
    let Self { source, scheduler, duration } = self;
    let subscription = subscriber.subscription().clone();
    source.actual_subscribe(subscriber.map_observer(|observer| DebounceObserver {
      observer: SharedObserver::new(observer),
      scheduler,
      delay: duration,
      trailing_value: MutRc::own(None),
      task_handler: None,
      subscription,
    }))
  }
}

impl<Item, Err, S, SD> ObservableExt<Item, Err> for DebounceOp<S, SD> where S: ObservableExt<Item, Err> {}

/// The timer and the source share the downstream observer. The downstream
/// may push back into the source while the timer delivers to it.
pub struct DebounceObserver<O, SD, Item, Err> {
  observer: SharedObserver<O, Item, Err>,
  scheduler: SD,
  delay: Duration,
  trailing_value: MutRc<Option<Item>>,
  task_handler: Option<TaskHandle>,
  subscription: LocalSubscription,
}

impl<O, SD, Item, Err> DebounceObserver<O, SD, Item, Err> {
  fn cancel_pending(&mut self) {
    if let Some(mut handler) = self.task_handler.take() {
      handler.unsubscribe();
    }
  }
}

impl<Item, Err, O, SD> Observer<Item, Err> for DebounceObserver<O, SD, Item, Err>
where
  O: Observer<Item, Err> + 'static,
  SD: Scheduler,
  Item: 'static,
  Err: 'static,
{
  fn next(&mut self, value: Item) {
    *self.trailing_value.rc_deref_mut() = Some(value);
    self.cancel_pending();

    let mut observer = self.observer.clone();
    let trailing_value = self.trailing_value.clone();
    let handler = self.scheduler.schedule(
      move || {
        let value = trailing_value.rc_deref_mut().take();
        if let Some(value) = value {
          observer.next(value);
        }
      },
      self.delay,
    );
    self.subscription.add(handler.clone());
    self.task_handler = Some(handler);
  }

  fn error(&mut self, err: Err) {
    self.cancel_pending();
    self.trailing_value.rc_deref_mut().take();
    self.observer.error(err);
  }

  fn complete(&mut self) {
    self.cancel_pending();
    let value = self.trailing_value.rc_deref_mut().take();
    if let Some(value) = value {
      self.observer.next(value);
    }
    self.observer.complete();
  }

  #[inline]
  fn is_finished(&self) -> bool { self.observer.is_finished() }
}
