//! Error types and the unhandled-error channel.
//!
//! Errors raised by a producer travel through the stream to the subscriber's
//! `error` handler. Everything that has nowhere to go, such as a panicking
//! subscriber callback or an error reaching a subscriber that only handles
//! `next`, is reported here instead: logged with `tracing` and forwarded to
//! an optional thread-local hook.

use std::{any::Any, cell::RefCell};

use thiserror::Error;

/// A failure that could not be delivered to any error handler.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UnhandledError {
  /// A subscriber callback panicked while a subject or event target was
  /// fanning out a notification. The remaining subscribers still received
  /// it.
  #[error("observer callback panicked: {message}")]
  ObserverPanicked { message: String },

  /// A stream errored but the subscriber registered no error handler.
  #[error("uncaught `{err_type}` error reached a subscriber without an error handler")]
  Uncaught { err_type: &'static str },
}

/// Failures of the runtime-backed schedulers.
#[cfg(feature = "timer")]
#[derive(Debug, Error)]
pub enum SchedulerError {
  #[error("failed to spawn timer task: {0}")]
  Spawn(#[from] futures::task::SpawnError),
}

pub type UnhandledErrorHook = Box<dyn Fn(&UnhandledError)>;

thread_local! {
  static UNHANDLED_HOOK: RefCell<Option<UnhandledErrorHook>> = const { RefCell::new(None) };
}

/// Installs a hook receiving every [`UnhandledError`] reported on this
/// thread, returning the previous one.
pub fn set_unhandled_error_hook(hook: impl Fn(&UnhandledError) + 'static) -> Option<UnhandledErrorHook> {
  UNHANDLED_HOOK.with(|h| h.borrow_mut().replace(Box::new(hook)))
}

/// Removes the hook installed on this thread.
pub fn take_unhandled_error_hook() -> Option<UnhandledErrorHook> { UNHANDLED_HOOK.with(|h| h.borrow_mut().take()) }

pub(crate) fn report_unhandled(err: UnhandledError) {
  tracing::error!(error = %err, "unhandled error");
  UNHANDLED_HOOK.with(|h| {
    if let Ok(hook) = h.try_borrow() {
      if let Some(hook) = hook.as_ref() {
        hook(&err);
      }
    }
  });
}

pub(crate) fn report_panic(payload: Box<dyn Any + Send>) {
  report_unhandled(UnhandledError::ObserverPanicked { message: panic_message(payload.as_ref()) });
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
  if let Some(s) = payload.downcast_ref::<&'static str>() {
    (*s).to_string()
  } else if let Some(s) = payload.downcast_ref::<String>() {
    s.clone()
  } else {
    "<non-string panic payload>".to_string()
  }
}
