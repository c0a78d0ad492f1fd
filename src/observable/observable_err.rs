use crate::observer::Observer;

/// Observer made of `next` and `error` handlers.
#[derive(Clone)]
pub struct ObserverErr<N, E> {
  next: N,
  error: E,
}

impl<N, E> ObserverErr<N, E> {
  #[inline]
  pub fn new(next: N, error: E) -> Self { ObserverErr { next, error } }
}

impl<Item, Err, N, E> Observer<Item, Err> for ObserverErr<N, E>
where
  N: FnMut(Item),
  E: FnMut(Err),
{
  #[inline]
  fn next(&mut self, value: Item) { (self.next)(value); }
  #[inline]
  fn error(&mut self, err: Err) { (self.error)(err); }
  #[inline]
  fn complete(&mut self) {}
  #[inline]
  fn is_finished(&self) -> bool { false }
}
