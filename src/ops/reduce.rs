use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
  subscriber::Subscriber,
  type_hint::TypeHint,
};

#[derive(Clone)]
pub struct ReduceOp<S, F, Acc, Item> {
  source: S,
  binary_op: F,
  initial: Acc,
  _hint: TypeHint<Item>,
}

impl<S, F, Acc, Item> ReduceOp<S, F, Acc, Item> {
  #[inline]
  pub(crate) fn new(source: S, binary_op: F, initial: Acc) -> Self {
    ReduceOp { source, binary_op, initial, _hint: TypeHint::new() }
  }
}

impl<Item, Err, O, S, F, Acc> Observable<Acc, Err, O> for ReduceOp<S, F, Acc, Item>
where
  O: Observer<Acc, Err>,
  S: Observable<Item, Err, ReduceObserver<O, F, Acc>>,
  F: FnMut(Acc, Item) -> Acc,
{
  fn actual_subscribe(self, subscriber: Subscriber<O>) {
    let ReduceOp { source, binary_op, initial, .. } = self;
    source.actual_subscribe(subscriber.map_observer(|observer| ReduceObserver {
      observer,
      binary_op,
      acc: Some(initial),
    }))
  }
}

impl<Item, Err, S, F, Acc> ObservableExt<Acc, Err> for ReduceOp<S, F, Acc, Item>
where
  S: ObservableExt<Item, Err>,
  F: FnMut(Acc, Item) -> Acc,
{
}

pub struct ReduceObserver<O, F, Acc> {
  observer: O,
  binary_op: F,
  acc: Option<Acc>,
}

impl<Item, Err, O, F, Acc> Observer<Item, Err> for ReduceObserver<O, F, Acc>
where
  O: Observer<Acc, Err>,
  F: FnMut(Acc, Item) -> Acc,
{
  fn next(&mut self, value: Item) {
    if let Some(acc) = self.acc.take() {
      self.acc = Some((self.binary_op)(acc, value));
    }
  }

  fn error(&mut self, err: Err) {
    self.acc = None;
    self.observer.error(err)
  }

  fn complete(&mut self) {
    if let Some(acc) = self.acc.take() {
      self.observer.next(acc);
    }
    self.observer.complete()
  }

  fn is_finished(&self) -> bool { self.observer.is_finished() }
}
