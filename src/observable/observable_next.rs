use std::any::type_name;

use crate::{
  error::{report_unhandled, UnhandledError},
  observer::Observer,
};

/// Observer made of a `next` handler only.
#[derive(Clone)]
pub struct ObserverN<N>(N);

impl<N> ObserverN<N> {
  #[inline]
  pub fn new(next: N) -> Self { ObserverN(next) }
}

impl<Item, Err, N> Observer<Item, Err> for ObserverN<N>
where
  N: FnMut(Item),
{
  #[inline]
  fn next(&mut self, value: Item) { (self.0)(value); }

  fn error(&mut self, _err: Err) { report_unhandled(UnhandledError::Uncaught { err_type: type_name::<Err>() }) }

  #[inline]
  fn complete(&mut self) {}

  #[inline]
  fn is_finished(&self) -> bool { false }
}
