use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
  rc::MutRc,
  subject::Subject,
  subscriber::Subscriber,
};

/// A [`Subject`] that remembers its latest value.
///
/// Every new subscriber first receives the current value, then everything
/// pushed afterwards, including values pushed from inside that first
/// callback. Once the subject terminated, new subscribers only get
/// the terminal notification.
pub struct BehaviorSubject<Item, Err> {
  pub(crate) subject: Subject<Item, Err>,
  pub(crate) value: MutRc<Item>,
}

impl<Item, Err> Clone for BehaviorSubject<Item, Err> {
  fn clone(&self) -> Self { BehaviorSubject { subject: self.subject.clone(), value: self.value.clone() } }
}

impl<Item, Err> BehaviorSubject<Item, Err> {
  #[inline]
  pub fn new(value: Item) -> Self { Self { subject: Subject::new(), value: MutRc::own(value) } }

  #[inline]
  pub fn subscriber_count(&self) -> usize { self.subject.subscriber_count() }

  #[inline]
  pub fn is_closed(&self) -> bool { self.subject.is_closed() }
}

impl<Item: Clone, Err: Clone> BehaviorSubject<Item, Err> {
  /// The latest value.
  pub fn value(&self) -> Item { self.value.rc_deref().clone() }

  pub fn next(&self, value: Item) {
    if self.subject.is_closed() {
      return;
    }
    *self.value.rc_deref_mut() = value.clone();
    self.subject.next(value)
  }

  #[inline]
  pub fn error(&self, err: Err) { self.subject.error(err) }

  #[inline]
  pub fn complete(&self) { self.subject.complete() }
}

impl<Item, Err, O> Observable<Item, Err, O> for BehaviorSubject<Item, Err>
where
  O: Observer<Item, Err> + 'static,
  Item: Clone + 'static,
  Err: Clone + 'static,
{
  fn actual_subscribe(self, subscriber: Subscriber<O>) {
    if self.subject.is_closed() {
      self.subject.actual_subscribe(subscriber)
    } else {
      let value = self.value();
      self.subject.subscribe_with_first(subscriber, value)
    }
  }
}

impl<Item, Err> ObservableExt<Item, Err> for BehaviorSubject<Item, Err> {}

impl<Item: Clone, Err: Clone> Observer<Item, Err> for BehaviorSubject<Item, Err> {
  #[inline]
  fn next(&mut self, value: Item) { BehaviorSubject::next(self, value) }

  #[inline]
  fn error(&mut self, err: Err) { BehaviorSubject::error(self, err) }

  #[inline]
  fn complete(&mut self) { BehaviorSubject::complete(self) }

  #[inline]
  fn is_finished(&self) -> bool { self.is_closed() }
}
