use std::{convert::Infallible, marker::PhantomData};

use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
  subscriber::Subscriber,
};

/// Creates an observable producing a single value, then completing.
///
/// Completes immediately after emitting the value given. Never emits an error.
///
/// # Examples
///
/// ```
/// use rxlite::prelude::*;
///
/// observable::of(123).subscribe(|v| println!("{},", v));
/// ```
pub fn of<Item>(v: Item) -> Of<Item> { Of(v) }

#[derive(Clone)]
pub struct Of<Item>(Item);

impl<Item, O> Observable<Item, Infallible, O> for Of<Item>
where
  O: Observer<Item, Infallible>,
{
  fn actual_subscribe(self, mut subscriber: Subscriber<O>) {
    subscriber.next(self.0);
    subscriber.complete();
  }
}

impl<Item> ObservableExt<Item, Infallible> for Of<Item> {}

/// Creates an observable that produces no values and completes immediately.
///
/// # Examples
///
/// ```
/// use rxlite::prelude::*;
///
/// observable::empty::<i32>().subscribe_all(|_| {}, |_| {}, || println!("done"));
/// ```
pub fn empty<Item>() -> Empty<Item> { Empty(PhantomData) }

pub struct Empty<Item>(PhantomData<fn() -> Item>);

impl<Item> Clone for Empty<Item> {
  fn clone(&self) -> Self { Empty(PhantomData) }
}

impl<Item, O> Observable<Item, Infallible, O> for Empty<Item>
where
  O: Observer<Item, Infallible>,
{
  fn actual_subscribe(self, mut subscriber: Subscriber<O>) { subscriber.complete() }
}

impl<Item> ObservableExt<Item, Infallible> for Empty<Item> {}

/// Creates an observable that emits no values and errors with `err`
/// immediately.
///
/// # Examples
///
/// ```
/// use rxlite::prelude::*;
///
/// observable::throw::<i32, _>("boom").subscribe_err(|_| {}, |e| println!("{}", e));
/// ```
pub fn throw<Item, Err>(err: Err) -> Throw<Item, Err> { Throw { err, _hint: PhantomData } }

pub struct Throw<Item, Err> {
  err: Err,
  _hint: PhantomData<fn() -> Item>,
}

impl<Item, Err: Clone> Clone for Throw<Item, Err> {
  fn clone(&self) -> Self { Throw { err: self.err.clone(), _hint: PhantomData } }
}

impl<Item, Err, O> Observable<Item, Err, O> for Throw<Item, Err>
where
  O: Observer<Item, Err>,
{
  fn actual_subscribe(self, mut subscriber: Subscriber<O>) { subscriber.error(self.err) }
}

impl<Item, Err> ObservableExt<Item, Err> for Throw<Item, Err> {}
