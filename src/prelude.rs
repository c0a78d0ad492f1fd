//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for easy access.

pub use crate::{
  error::{set_unhandled_error_hook, take_unhandled_error_hook, UnhandledError},
  event::{EventSource, EventTarget, Listener, ListenerId},
  observable::{self, Emitter, Observable, ObservableExt, ObserverAll, ObserverErr, ObserverN},
  observer::Observer,
  of_sequence,
  rc::MutRc,
  scheduler::{Scheduler, TaskHandle, TestScheduler},
  subject::{BehaviorSubject, Subject},
  subscriber::Subscriber,
  subscription::*,
};

#[cfg(feature = "timer")]
pub use crate::scheduler::LocalScheduler;
#[cfg(feature = "tokio-scheduler")]
pub use crate::scheduler::TokioLocalScheduler;
