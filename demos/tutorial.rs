//! Example: UI-like event streams on a real clock
//!
//! Simulates a user clicking and typing by dispatching events on a timer,
//! then shapes those events with throttling, debouncing and switching.
//!
//! Run with `RUST_LOG=rxlite=debug cargo run --example tutorial` to see the
//! library's own tracing output.

use std::{convert::Infallible, time::Duration};

use futures::executor::LocalPool;
use rxlite::prelude::*;

fn ms(v: u64) -> Duration { Duration::from_millis(v) }

// ==================================================================================
// Simulated user
// ==================================================================================

/// Dispatches `kind` events carrying `payload` at each of the given offsets.
fn simulate<E: Clone + 'static>(scheduler: &LocalScheduler, target: &EventTarget<E>, kind: &'static str, script: Vec<(u64, E)>) {
  for (at, payload) in script {
    let target = target.clone();
    scheduler.schedule(move || target.dispatch(kind, payload), ms(at));
  }
}

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(
      tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    )
    .init();

  let mut pool = LocalPool::new();
  let scheduler = LocalScheduler::new(pool.spawner());

  // ==================================================================================
  // 1. Count clicks, at most one per 100ms
  // ==================================================================================
  let clicks = EventTarget::new();
  observable::from_event(clicks.clone(), "click")
    .throttle_time(ms(100), scheduler.clone())
    .scan(0, |count, _: ()| count + 1)
    .subscribe(|count| println!("[clicks] clicked {count} times"));
  simulate(&scheduler, &clicks, "click", vec![(0, ()), (20, ()), (40, ()), (150, ()), (300, ())]);

  // ==================================================================================
  // 2. Search box: wait for a pause in typing, skip repeated queries
  // ==================================================================================
  let input = EventTarget::new();
  observable::from_event(input.clone(), "input")
    .debounce_time(ms(80), scheduler.clone())
    .distinct_until_changed()
    .subscribe(|query: String| println!("[search] query {query:?}"));
  simulate(
    &scheduler,
    &input,
    "input",
    ["r", "rx", "rxl", "rx", "rxl", "rxlite"]
      .into_iter()
      .zip([0, 30, 60, 200, 230, 400])
      .map(|(text, at)| (at, text.to_string()))
      .collect(),
  );

  // ==================================================================================
  // 3. Every click restarts a ticking timer, stopped after half a second
  // ==================================================================================
  let restarts = EventTarget::new();
  let c_scheduler = scheduler.clone();
  let ticking = observable::from_event(restarts.clone(), "click")
    .switch_map(move |_: ()| observable::interval(ms(50), c_scheduler.clone()))
    .subscribe(|tick| println!("[timer] tick {tick}"))
    .into_inner();
  simulate(&scheduler, &restarts, "click", vec![(0, ()), (180, ())]);
  scheduler.schedule(
    move || {
      let mut ticking = ticking;
      ticking.unsubscribe();
      println!("[timer] stopped");
    },
    ms(500),
  );

  // ==================================================================================
  // 4. Button label kept in a BehaviorSubject
  // ==================================================================================
  let label = BehaviorSubject::<String, Infallible>::new("Not Clicked!".to_string());
  let button = EventTarget::new();
  observable::from_event(button.clone(), "click")
    .map(|_: ()| "Clicked!".to_string())
    .subscribe_with(label.clone());
  label.clone().subscribe(|text| println!("[label] {text}"));
  simulate(&scheduler, &button, "click", vec![(250, ())]);

  pool.run();
  println!("[label] final value {:?}", label.value());
}
