use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
  subscriber::Subscriber,
  type_hint::TypeHint,
};

#[derive(Clone)]
pub struct MapOp<S, M, Item> {
  source: S,
  func: M,
  _hint: TypeHint<Item>,
}

impl<S, M, Item> MapOp<S, M, Item> {
  #[inline]
  pub(crate) fn new(source: S, func: M) -> Self { MapOp { source, func, _hint: TypeHint::new() } }
}

impl<Item, Err, O, S, B, M> Observable<B, Err, O> for MapOp<S, M, Item>
where
  O: Observer<B, Err>,
  S: Observable<Item, Err, MapObserver<O, M>>,
  M: FnMut(Item) -> B,
{
  fn actual_subscribe(self, subscriber: Subscriber<O>) {
    let map = self.func;
    self
      .source
      .actual_subscribe(subscriber.map_observer(|observer| MapObserver { observer, map }))
  }
}

impl<Item, Err, S, B, M> ObservableExt<B, Err> for MapOp<S, M, Item>
where
  S: ObservableExt<Item, Err>,
  M: FnMut(Item) -> B,
{
}

pub struct MapObserver<O, M> {
  observer: O,
  map: M,
}

impl<Item, Err, O, B, M> Observer<Item, Err> for MapObserver<O, M>
where
  O: Observer<B, Err>,
  M: FnMut(Item) -> B,
{
  fn next(&mut self, value: Item) { self.observer.next((self.map)(value)) }

  fn error(&mut self, err: Err) { self.observer.error(err) }

  fn complete(&mut self) { self.observer.complete() }

  fn is_finished(&self) -> bool { self.observer.is_finished() }
}

#[derive(Clone)]
pub struct MapWithIndexOp<S, M, Item> {
  source: S,
  func: M,
  _hint: TypeHint<Item>,
}

impl<S, M, Item> MapWithIndexOp<S, M, Item> {
  #[inline]
  pub(crate) fn new(source: S, func: M) -> Self { MapWithIndexOp { source, func, _hint: TypeHint::new() } }
}

impl<Item, Err, O, S, B, M> Observable<B, Err, O> for MapWithIndexOp<S, M, Item>
where
  O: Observer<B, Err>,
  S: Observable<Item, Err, MapWithIndexObserver<O, M>>,
  M: FnMut(Item, usize) -> B,
{
  fn actual_subscribe(self, subscriber: Subscriber<O>) {
    let map = self.func;
    self.source.actual_subscribe(
      subscriber.map_observer(|observer| MapWithIndexObserver { observer, map, index: 0 }),
    )
  }
}

impl<Item, Err, S, B, M> ObservableExt<B, Err> for MapWithIndexOp<S, M, Item>
where
  S: ObservableExt<Item, Err>,
  M: FnMut(Item, usize) -> B,
{
}

pub struct MapWithIndexObserver<O, M> {
  observer: O,
  map: M,
  index: usize,
}

impl<Item, Err, O, B, M> Observer<Item, Err> for MapWithIndexObserver<O, M>
where
  O: Observer<B, Err>,
  M: FnMut(Item, usize) -> B,
{
  fn next(&mut self, value: Item) {
    let index = self.index;
    self.index += 1;
    self.observer.next((self.map)(value, index))
  }

  fn error(&mut self, err: Err) { self.observer.error(err) }

  fn complete(&mut self) { self.observer.complete() }

  fn is_finished(&self) -> bool { self.observer.is_finished() }
}
