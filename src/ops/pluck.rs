use serde_json::Value;

use crate::{
  observable::{Observable, ObservableExt},
  observer::Observer,
  subscriber::Subscriber,
};

#[derive(Clone)]
pub struct PluckOp<S> {
  source: S,
  keys: Vec<String>,
}

impl<S> PluckOp<S> {
  pub(crate) fn new(source: S, keys: Vec<String>) -> Self { PluckOp { source, keys } }
}

impl<Err, O, S> Observable<Value, Err, O> for PluckOp<S>
where
  O: Observer<Value, Err>,
  S: Observable<Value, Err, PluckObserver<O>>,
{
  fn actual_subscribe(self, subscriber: Subscriber<O>) {
    let keys = self.keys;
    self
      .source
      .actual_subscribe(subscriber.map_observer(|observer| PluckObserver { observer, keys }))
  }
}

impl<Err, S> ObservableExt<Value, Err> for PluckOp<S> where S: ObservableExt<Value, Err> {}

pub struct PluckObserver<O> {
  observer: O,
  keys: Vec<String>,
}

/// Follows `keys` into `value`. Object members are looked up by name, array
/// elements by a key parsing as an index.
fn pluck(mut value: Value, keys: &[String]) -> Value {
  for key in keys {
    let next = match &mut value {
      Value::Object(map) => map.remove(key.as_str()),
      Value::Array(items) => key
        .parse::<usize>()
        .ok()
        .filter(|idx| *idx < items.len())
        .map(|idx| items.swap_remove(idx)),
      _ => None,
    };
    match next {
      Some(v) => value = v,
      None => {
        tracing::trace!(key = key.as_str(), "pluck path missing, emit null");
        return Value::Null;
      }
    }
  }
  value
}

impl<Err, O> Observer<Value, Err> for PluckObserver<O>
where
  O: Observer<Value, Err>,
{
  fn next(&mut self, value: Value) { self.observer.next(pluck(value, &self.keys)) }

  fn error(&mut self, err: Err) { self.observer.error(err) }

  fn complete(&mut self) { self.observer.complete() }

  fn is_finished(&self) -> bool { self.observer.is_finished() }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use serde_json::{json, Value};

  fn plucked(values: Vec<Value>, keys: &[&str]) -> Vec<Value> {
    let mut out = vec![];
    observable::from_iter(values)
      .pluck(keys.iter().copied())
      .subscribe(|v| out.push(v));
    out
  }

  #[test]
  fn nested_property() {
    let event = json!({ "target": { "value": "hello", "id": 3 } });
    assert_eq!(plucked(vec![event], &["target", "value"]), vec![json!("hello")]);
  }

  #[test]
  fn missing_key_is_null() {
    let values = vec![
      json!({ "target": {} }),
      json!({ "other": 1 }),
      json!({ "target": "not an object" }),
      json!(42),
    ];
    assert_eq!(plucked(values, &["target", "value"]), vec![Value::Null; 4]);
  }

  #[test]
  fn array_index() {
    let value = json!({ "items": [10, 20, 30] });
    assert_eq!(plucked(vec![value.clone()], &["items", "1"]), vec![json!(20)]);
    assert_eq!(plucked(vec![value.clone()], &["items", "3"]), vec![Value::Null]);
    assert_eq!(plucked(vec![value], &["items", "x"]), vec![Value::Null]);
  }

  #[test]
  fn no_keys_is_identity() {
    assert_eq!(plucked(vec![json!({"a": 1})], &[]), vec![json!({"a": 1})]);
  }

  #[test]
  fn from_dom_like_events() {
    let target = EventTarget::new();
    let seen = MutRc::own(vec![]);
    let c_seen = seen.clone();
    observable::from_event(target.clone(), "input")
      .pluck(["target", "value"])
      .subscribe(move |v| c_seen.rc_deref_mut().push(v));

    target.dispatch("input", json!({ "target": { "value": "a" } }));
    target.dispatch("input", json!({ "target": { "value": "ab" } }));
    assert_eq!(*seen.rc_deref(), vec![json!("a"), json!("ab")]);
  }
}
