//! End to end scenarios: operator chains fed by events, subjects and
//! timers, all driven by a virtual clock.

use std::{convert::Infallible, time::Duration};

use rxlite::prelude::*;
use serde_json::json;

fn ms(v: u64) -> Duration { Duration::from_millis(v) }

fn recorder<T: 'static>() -> (MutRc<Vec<T>>, impl FnMut(T) + 'static) {
  let log = MutRc::own(vec![]);
  let c_log = log.clone();
  (log, move |v| c_log.rc_deref_mut().push(v))
}

#[test]
fn click_counter_with_throttle_and_scan() {
  let scheduler = TestScheduler::new();
  let clicks = EventTarget::new();
  let (log, push) = recorder();

  observable::from_event(clicks.clone(), "click")
    .throttle_time(ms(1000), scheduler.clone())
    .scan(0, |count, _: ()| count + 1)
    .subscribe(push);

  clicks.dispatch("click", ());
  scheduler.advance_to(ms(300));
  clicks.dispatch("click", ());
  scheduler.advance_to(ms(1200));
  clicks.dispatch("click", ());
  clicks.dispatch("click", ());

  assert_eq!(*log.rc_deref(), vec![1, 2]);
}

#[test]
fn create_with_delayed_complete() {
  let scheduler = TestScheduler::new();
  let c_scheduler = scheduler.clone();
  let log = MutRc::own(vec![]);
  let (c_log, c_log2) = (log.clone(), log.clone());

  observable::create(move |mut emitter: Emitter<String, Infallible>| {
    emitter.next("Hello World!".to_string());
    let mut c_emitter = emitter.clone();
    c_scheduler.schedule(move || c_emitter.complete(), ms(2000))
  })
  .subscribe_all(
    move |v| c_log.rc_deref_mut().push(v),
    |_| {},
    move || c_log2.rc_deref_mut().push("complete".to_string()),
  );

  scheduler.advance_to(ms(1999));
  assert_eq!(*log.rc_deref(), vec!["Hello World!"]);
  scheduler.advance_to(ms(2000));
  assert_eq!(*log.rc_deref(), vec!["Hello World!", "complete"]);
}

#[test]
fn interval_map_throttle_stopped_after_five_seconds() {
  let scheduler = TestScheduler::new();
  let (log, push) = recorder();

  let mut subscription = observable::interval(ms(1000), scheduler.clone())
    .map(|i| i * 10)
    .throttle_time(ms(2000), scheduler.clone())
    .subscribe(push)
    .into_inner();

  let stopper = subscription.clone();
  scheduler.schedule(move || stopper.clone().unsubscribe(), ms(5500));
  scheduler.advance_to(ms(10_000));

  // ticks at 1s..=5s carry 0..=4; windows open at 1s, 3s and 5s
  assert_eq!(*log.rc_deref(), vec![0, 20, 40]);
  assert!(subscription.is_closed());
  assert_eq!(scheduler.pending_tasks(), 0);
  subscription.unsubscribe();
}

#[test]
fn subject_with_two_observers() {
  let subject: Subject<i32, Infallible> = Subject::new();
  let (log, _) = recorder::<String>();
  let (l1, l2) = (log.clone(), log.clone());

  subject.clone().subscribe(move |v| l1.rc_deref_mut().push(format!("observerA: {v}")));
  subject.clone().subscribe(move |v| l2.rc_deref_mut().push(format!("observerB: {v}")));
  subject.next(1);
  subject.next(2);

  assert_eq!(
    *log.rc_deref(),
    vec!["observerA: 1", "observerB: 1", "observerA: 2", "observerB: 2"]
  );
}

#[test]
fn filter_even_values() {
  let mut out = vec![];
  observable::from_iter(1..=10).filter(|v| v % 2 == 0).subscribe(|v| out.push(v));
  assert_eq!(out, vec![2, 4, 6, 8, 10]);
}

#[test]
fn search_input_with_debounce_and_distinct() {
  let scheduler = TestScheduler::new();
  let input = EventTarget::new();
  let (log, push) = recorder();

  observable::from_event(input.clone(), "input")
    .debounce_time(ms(500), scheduler.clone())
    .distinct_until_changed()
    .subscribe(push);

  let typing = [(0, "r"), (100, "rx"), (200, "rxj"), (900, "rx"), (1000, "rxj"), (2000, "rxjs")];
  for (at, text) in typing {
    scheduler.advance_to(ms(at));
    input.dispatch("input", text.to_string());
  }
  scheduler.flush();

  // "rxj" settles at 700, the quick "rx" at 900 is replaced by "rxj" again
  assert_eq!(*log.rc_deref(), vec!["rxj", "rxjs"]);
}

#[test]
fn reduce_and_scan_over_the_same_source() {
  let source = observable::from_iter(1..=5);

  let mut total = vec![];
  let mut completed = false;
  source
    .clone()
    .reduce(0, |acc, v| acc + v)
    .subscribe_all(|v| total.push(v), |_| {}, || completed = true);
  assert_eq!(total, vec![15]);
  assert!(completed);

  let mut running = vec![];
  source.scan(0, |acc, v| acc + v).subscribe(|v| running.push(v));
  assert_eq!(running, vec![1, 3, 6, 10, 15]);
}

#[test]
fn reduce_with_indexed_map() {
  let mut out = vec![];
  observable::of(5)
    .map_with_index(|v, i| v + i)
    .reduce(100, |acc, v| acc + v)
    .subscribe(|v| out.push(v));
  assert_eq!(out, vec![105]);
}

#[test]
fn distinct_until_changed_drops_repeats() {
  let mut out = vec![];
  of_sequence!(1, 1, 2, 2, 3, 1).distinct_until_changed().subscribe(|v| out.push(v));
  assert_eq!(out, vec![1, 2, 3, 1]);
}

#[test]
fn pluck_from_dispatched_events() {
  let target = EventTarget::new();
  let (log, push) = recorder();

  observable::from_event(target.clone(), "keyup")
    .pluck(["target", "value"])
    .subscribe(push);

  target.dispatch("keyup", json!({ "target": { "value": "rx" } }));
  target.dispatch("keyup", json!({ "code": "Enter" }));
  assert_eq!(*log.rc_deref(), vec![json!("rx"), serde_json::Value::Null]);
}

#[test]
fn merge_map_combines_two_inputs() {
  let first = EventTarget::new();
  let second = EventTarget::new();
  let (log, push) = recorder();

  let c_second = second.clone();
  observable::from_event(first.clone(), "input")
    .merge_map(move |a: i32| observable::from_event(c_second.clone(), "input").map(move |b: i32| a + b))
    .subscribe(push);

  first.dispatch("input", 1);
  second.dispatch("input", 10);
  first.dispatch("input", 2);
  second.dispatch("input", 20);

  assert_eq!(*log.rc_deref(), vec![11, 21, 22]);
  assert_eq!(second.listener_count("input"), 2);
}

#[test]
fn switch_map_click_restarts_interval() {
  let scheduler = TestScheduler::new();
  let clicks = EventTarget::new();
  let (log, push) = recorder();

  let c_scheduler = scheduler.clone();
  let subscription = observable::from_event(clicks.clone(), "click")
    .switch_map(move |_: ()| observable::interval(ms(1000), c_scheduler.clone()))
    .subscribe(push);

  clicks.dispatch("click", ());
  scheduler.advance_to(ms(2500));
  clicks.dispatch("click", ());
  scheduler.advance_to(ms(4500));

  assert_eq!(*log.rc_deref(), vec![0, 1, 0, 1]);
  subscription.into_inner().unsubscribe();
  assert_eq!(scheduler.pending_tasks(), 0);
  assert_eq!(clicks.listener_count("click"), 0);
}

#[test]
fn switch_map_keeps_only_the_latest_delayed_value() {
  let scheduler = TestScheduler::new();
  let outer: Subject<i32, Infallible> = Subject::new();
  let (log, push) = recorder();

  let c_scheduler = scheduler.clone();
  outer
    .clone()
    .switch_map(move |v| {
      let scheduler = c_scheduler.clone();
      observable::create(move |emitter: Emitter<i32, Infallible>| {
        let mut emitter = emitter.clone();
        scheduler.schedule(move || emitter.next(v), ms(100))
      })
    })
    .subscribe(push);

  outer.next(1);
  scheduler.advance_to(ms(50));
  outer.next(2);
  scheduler.advance_to(ms(1000));
  assert_eq!(*log.rc_deref(), vec![2]);
}

#[test]
fn debounce_emits_once_quiet() {
  let scheduler = TestScheduler::new();
  let subject: Subject<char, Infallible> = Subject::new();
  let log = MutRc::own(vec![]);
  let (c_log, c_scheduler) = (log.clone(), scheduler.clone());

  subject
    .clone()
    .debounce_time(ms(100), scheduler.clone())
    .subscribe(move |v| c_log.rc_deref_mut().push((c_scheduler.now(), v)));

  for (at, v) in [(0, 'a'), (30, 'b'), (60, 'c'), (200, 'd')] {
    scheduler.advance_to(ms(at));
    subject.next(v);
  }
  scheduler.flush();
  assert_eq!(*log.rc_deref(), vec![(ms(160), 'c'), (ms(300), 'd')]);
}

#[test]
fn unsubscribe_twice_runs_teardown_once() {
  let runs = MutRc::own(0);
  let c_runs = runs.clone();
  let subscription = observable::create(move |_: Emitter<i32, Infallible>| {
    let c_runs = c_runs.clone();
    Teardown::new(move || *c_runs.rc_deref_mut() += 1)
  })
  .subscribe(|_| {});

  let mut subscription = subscription.into_inner();
  subscription.unsubscribe();
  subscription.unsubscribe();
  assert_eq!(*runs.rc_deref(), 1);
  assert!(subscription.is_closed());
}

#[test]
fn behavior_subject_shows_latest_state() {
  let state = BehaviorSubject::<String, Infallible>::new("Not Clicked!".to_string());
  let clicks = EventTarget::new();
  let (log, push) = recorder();

  observable::from_event(clicks.clone(), "click")
    .map(|_: ()| "Clicked!".to_string())
    .subscribe_with(state.clone());

  state.clone().subscribe(push);
  clicks.dispatch("click", ());
  assert_eq!(*log.rc_deref(), vec!["Not Clicked!", "Clicked!"]);
}

#[test]
fn behavior_subject_late_subscriber() {
  let subject: BehaviorSubject<&'static str, Infallible> = BehaviorSubject::new("X");
  let log = MutRc::own(vec![]);

  let c_log = log.clone();
  subject.clone().subscribe(move |v| c_log.rc_deref_mut().push(format!("first {v}")));
  subject.next("Y");
  let c_log = log.clone();
  subject.clone().subscribe(move |v| c_log.rc_deref_mut().push(format!("second {v}")));

  assert_eq!(*log.rc_deref(), vec!["first X", "first Y", "second Y"]);
}

#[test]
fn unhandled_error_reaches_the_hook() {
  let reported = MutRc::own(vec![]);
  let c_reported = reported.clone();
  set_unhandled_error_hook(move |e| c_reported.rc_deref_mut().push(e.clone()));

  observable::throw::<i32, _>("boom").subscribe(|_| {});
  take_unhandled_error_hook();

  assert_eq!(*reported.rc_deref(), vec![UnhandledError::Uncaught { err_type: "&str" }]);
}

#[test]
fn guard_stops_timer_on_drop() {
  let scheduler = TestScheduler::new();
  let (log, push) = recorder();
  {
    let _guard = observable::interval(ms(10), scheduler.clone())
      .subscribe(push)
      .unsubscribe_when_dropped();
    scheduler.advance_to(ms(30));
  }
  scheduler.advance_to(ms(100));
  assert_eq!(*log.rc_deref(), vec![0, 1, 2]);
  assert_eq!(scheduler.pending_tasks(), 0);
}

#[test]
fn behavior_subject_sees_value_pushed_during_replay() {
  let state = BehaviorSubject::<&'static str, Infallible>::new("X");
  let (log, mut push) = recorder();

  let c_state = state.clone();
  state.clone().subscribe(move |v| {
    push(v);
    if v == "X" {
      c_state.next("Z");
    }
  });
  state.next("W");

  assert_eq!(*log.rc_deref(), vec!["X", "Z", "W"]);
}

#[test]
fn subscriber_feeding_its_own_subject_sees_every_value() {
  let subject: Subject<i32, Infallible> = Subject::new();
  let (first, mut push_first) = recorder();
  let (second, push_second) = recorder();

  let c_subject = subject.clone();
  subject.clone().subscribe(move |v| {
    push_first(v);
    if v < 3 {
      c_subject.next(v + 1);
    }
  });
  subject.clone().subscribe(push_second);
  subject.next(1);

  assert_eq!(*first.rc_deref(), vec![1, 2, 3]);
  let mut seen = second.rc_deref().clone();
  seen.sort_unstable();
  assert_eq!(seen, vec![1, 2, 3]);
}

#[test]
fn search_box_cleared_from_inside_debounced_result() {
  let scheduler = TestScheduler::new();
  let query: Subject<String, Infallible> = Subject::new();
  let (log, mut push) = recorder();

  let c_query = query.clone();
  query
    .clone()
    .debounce_time(ms(300), scheduler.clone())
    .distinct_until_changed()
    .subscribe(move |text: String| {
      let done = text == "rxlite";
      push(text);
      if done {
        c_query.complete();
      }
    });

  query.next("rx".to_string());
  query.next("rxlite".to_string());
  scheduler.advance_by(ms(300));
  query.next("late".to_string());
  scheduler.flush();

  assert_eq!(*log.rc_deref(), vec!["rxlite"]);
  assert!(query.is_closed());
  assert_eq!(scheduler.pending_tasks(), 0);
}

#[test]
fn switch_map_restarted_from_its_own_output() {
  let scheduler = TestScheduler::new();
  let clicks: Subject<u32, Infallible> = Subject::new();
  let (log, mut push) = recorder();

  let (c_clicks, c_scheduler) = (clicks.clone(), scheduler.clone());
  clicks
    .clone()
    .switch_map(move |round| {
      let scheduler = c_scheduler.clone();
      observable::create(move |mut emitter: Emitter<u32, Infallible>| {
        emitter.next(round * 10);
        let mut c_emitter = emitter.clone();
        scheduler.schedule(move || c_emitter.next(round * 10 + 1), ms(100))
      })
    })
    .subscribe(move |v| {
      push(v);
      if v == 1 {
        c_clicks.next(2);
      }
    });

  clicks.next(0);
  scheduler.advance_by(ms(100));
  scheduler.advance_by(ms(100));

  assert_eq!(*log.rc_deref(), vec![0, 1, 20, 21]);
}
