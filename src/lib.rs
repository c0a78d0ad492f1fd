//! # rxlite: a small reactive event-stream core
//!
//! Single-threaded [Reactive Extensions](http://reactivex.io/) for Rust:
//! observables, the operators needed to tame UI-like event streams, and
//! multicasting subjects.
//!
//! ## Quick Start
//!
//! ```rust
//! use rxlite::prelude::*;
//!
//! observable::from_iter(0..10)
//!   .filter(|v| v % 2 == 0)
//!   .map(|v| v * 2)
//!   .subscribe(|v| println!("Value: {}", v));
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Observable`] | A lazy producer, nothing happens until it is subscribed |
//! | [`Observer`] | Consumes `next`, `error`, and `complete` events |
//! | [`LocalSubscription`] | Handle to cancel an active subscription |
//! | [`Subject`] | Multicasts pushed values to every subscriber |
//! | [`Scheduler`] | Where delayed work runs, [`TestScheduler`] for virtual time |
//!
//! Time never comes from the system clock directly: every time-based
//! operator takes a [`Scheduler`].
//!
//! ## Feature Flags
//!
//! - **`timer`** (default): [`LocalScheduler`], timers on a `futures` local
//!   executor
//! - **`tokio-scheduler`**: `TokioLocalScheduler`, timers on a tokio
//!   `LocalSet`
//!
//! ## Errors
//!
//! Failures with nowhere to go, such as a panicking subject subscriber, are
//! logged through `tracing` and can be observed with
//! [`set_unhandled_error_hook`](error::set_unhandled_error_hook).
//!
//! [`Observable`]: observable::Observable
//! [`Observer`]: observer::Observer
//! [`LocalSubscription`]: subscription::LocalSubscription
//! [`Subject`]: subject::Subject
//! [`Scheduler`]: scheduler::Scheduler
//! [`TestScheduler`]: scheduler::TestScheduler
//! [`LocalScheduler`]: scheduler::LocalScheduler

pub mod error;
pub mod event;
pub mod observable;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod rc;
pub mod scheduler;
pub mod subject;
pub mod subscriber;
pub mod subscription;
pub mod type_hint;

pub use prelude::*;
