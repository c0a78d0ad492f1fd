use std::convert::Infallible;

use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
  subscriber::Subscriber,
};

/// Creates an observable that produces values from an iterator.
///
/// Completes when all elements have been emitted. Never emits an error.
///
/// # Arguments
///
/// * `iter` - An iterator to get all the values from.
///
/// # Examples
///
/// A simple example for a range:
///
/// ```
/// use rxlite::prelude::*;
///
/// observable::from_iter(0..10)
///   .subscribe(|v| {println!("{},", v)});
/// ```
///
/// Or with a vector:
///
/// ```
/// use rxlite::prelude::*;
///
/// observable::from_iter(vec![0,1,2,3])
///   .subscribe(|v| {println!("{},", v)});
/// ```
pub fn from_iter<Iter>(iter: Iter) -> FromIter<Iter>
where
  Iter: IntoIterator,
{
  FromIter(iter)
}

#[derive(Clone)]
pub struct FromIter<Iter>(Iter);

impl<O, Iter> Observable<Iter::Item, Infallible, O> for FromIter<Iter>
where
  Iter: IntoIterator,
  O: Observer<Iter::Item, Infallible>,
{
  fn actual_subscribe(self, mut subscriber: Subscriber<O>) {
    for v in self.0 {
      if subscriber.is_finished() {
        return;
      }
      subscriber.next(v);
    }
    subscriber.complete();
  }
}

impl<Iter> ObservableExt<Iter::Item, Infallible> for FromIter<Iter> where Iter: IntoIterator {}

/// Creates an observable emitting every argument in order, then completing.
///
/// ```
/// use rxlite::prelude::*;
///
/// of_sequence!(1, 2, 3).subscribe(|v| println!("{}", v));
/// ```
#[macro_export]
macro_rules! of_sequence {
  ($($item:expr),+ $(,)?) => {
    $crate::observable::from_iter([$($item),+])
  };
}
