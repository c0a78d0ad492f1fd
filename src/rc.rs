use std::{
  cell::{Ref, RefCell, RefMut},
  rc::{Rc, Weak},
};

/// Shared mutable cell used for all state that several parts of a
/// subscription chain need to reach (timers, inner subscriptions, subject
/// registries).
///
/// Everything in this crate is single threaded, so `Rc<RefCell<_>>` is all
/// we need. Borrows must never be held across a call into user code.
#[derive(Default)]
pub struct MutRc<T>(Rc<RefCell<T>>);

/// Non-owning counterpart of [`MutRc`].
pub struct MutWeak<T>(Weak<RefCell<T>>);

impl<T> MutRc<T> {
  pub fn own(t: T) -> Self { Self(Rc::new(RefCell::new(t))) }

  #[inline]
  pub fn rc_deref(&self) -> Ref<'_, T> { self.0.borrow() }

  #[inline]
  pub fn rc_deref_mut(&self) -> RefMut<'_, T> { self.0.borrow_mut() }

  /// Returns `None` when the value is already borrowed, which only happens on
  /// re-entrant access.
  #[inline]
  pub fn try_rc_deref_mut(&self) -> Option<RefMut<'_, T>> { self.0.try_borrow_mut().ok() }

  #[inline]
  pub fn ptr_eq(&self, other: &Self) -> bool { Rc::ptr_eq(&self.0, &other.0) }

  pub fn downgrade(&self) -> MutWeak<T> { MutWeak(Rc::downgrade(&self.0)) }
}

impl<T> MutWeak<T> {
  pub fn upgrade(&self) -> Option<MutRc<T>> { self.0.upgrade().map(MutRc) }
}

impl<T> Clone for MutRc<T> {
  #[inline]
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T> Clone for MutWeak<T> {
  #[inline]
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T> From<T> for MutRc<T> {
  fn from(t: T) -> Self { Self::own(t) }
}
