use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
  subscriber::Subscriber,
  type_hint::TypeHint,
};

#[derive(Clone)]
pub struct ScanOp<S, F, Acc, Item> {
  source: S,
  binary_op: F,
  initial: Acc,
  _hint: TypeHint<Item>,
}

impl<S, F, Acc, Item> ScanOp<S, F, Acc, Item> {
  #[inline]
  pub(crate) fn new(source: S, binary_op: F, initial: Acc) -> Self {
    ScanOp { source, binary_op, initial, _hint: TypeHint::new() }
  }
}

impl<Item, Err, O, S, F, Acc> Observable<Acc, Err, O> for ScanOp<S, F, Acc, Item>
where
  O: Observer<Acc, Err>,
  S: Observable<Item, Err, ScanObserver<O, F, Acc>>,
  F: FnMut(Acc, Item) -> Acc,
  Acc: Clone,
{
  fn actual_subscribe(self, subscriber: Subscriber<O>) {
    let ScanOp { source, binary_op, initial, .. } = self;
    source.actual_subscribe(subscriber.map_observer(|observer| ScanObserver {
      observer,
      binary_op,
      acc: Some(initial),
    }))
  }
}

impl<Item, Err, S, F, Acc> ObservableExt<Acc, Err> for ScanOp<S, F, Acc, Item>
where
  S: ObservableExt<Item, Err>,
  F: FnMut(Acc, Item) -> Acc,
  Acc: Clone,
{
}

pub struct ScanObserver<O, F, Acc> {
  observer: O,
  binary_op: F,
  // Only `None` while `binary_op` runs.
  acc: Option<Acc>,
}

impl<Item, Err, O, F, Acc> Observer<Item, Err> for ScanObserver<O, F, Acc>
where
  O: Observer<Acc, Err>,
  F: FnMut(Acc, Item) -> Acc,
  Acc: Clone,
{
  fn next(&mut self, value: Item) {
    if let Some(acc) = self.acc.take() {
      let acc = (self.binary_op)(acc, value);
      self.acc = Some(acc.clone());
      self.observer.next(acc);
    }
  }

  fn error(&mut self, err: Err) { self.observer.error(err) }

  fn complete(&mut self) { self.observer.complete() }

  fn is_finished(&self) -> bool { self.observer.is_finished() }
}
