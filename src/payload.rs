//! Turns call arguments into the flat field map sent to the Bot API.
//!
//! Every endpoint collects its arguments in a parameter struct, serializes it to
//! a JSON object and hands that to [`generate_payload`]. The builder keeps the
//! fields worth sending and leaves value shapes alone; flattening structured
//! values to text happens only when the payload is put on the wire.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Argument name reserved for the receiver. Never transmitted.
const RECEIVER_NAME: &str = "self";

/// Field name to value, ordered by name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Payload(BTreeMap<String, Value>);

impl Payload {
    /// Creates an empty payload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field. `null` values are ignored.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let value = value.into();
        if !value.is_null() {
            self.0.insert(name.into(), value);
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.remove(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Renders every field as the text that goes into a form body.
    ///
    /// Strings are sent verbatim; numbers, booleans, arrays and objects are
    /// sent as compact JSON text (`42`, `true`, `{"inline_keyboard":[]}`).
    #[must_use]
    pub fn to_form_fields(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .map(|(name, value)| (name.clone(), form_value(value)))
            .collect()
    }

    /// The payload as a JSON object, for wire logging.
    #[must_use]
    pub fn to_json(&self) -> Value {
        Value::Object(self.0.clone().into_iter().collect::<Map<String, Value>>())
    }
}

impl FromIterator<(String, Value)> for Payload {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        generate_payload(Value::Object(iter.into_iter().collect()), &[])
    }
}

/// Builds a payload from a call's arguments.
///
/// `args` is normally a serialized parameter struct. Arguments that are `null`
/// (unset), the receiver name, names starting with `_` and anything listed in
/// `exclude` are dropped; the rest are kept as they are. A non-object `args`
/// yields an empty payload.
///
/// ```
/// use serde_json::json;
/// use tgbot_rs::generate_payload;
///
/// let payload = generate_payload(
///     json!({"chat_id": 42, "text": "hi", "parse_mode": null, "certificate": "x"}),
///     &["certificate"],
/// );
/// assert_eq!(payload.len(), 2);
/// assert_eq!(payload.get("chat_id"), Some(&json!(42)));
/// ```
pub fn generate_payload(args: Value, exclude: &[&str]) -> Payload {
    let Value::Object(args) = args else {
        return Payload::default();
    };
    let fields = args
        .into_iter()
        .filter(|(name, value)| {
            !value.is_null()
                && name != RECEIVER_NAME
                && !name.starts_with('_')
                && !exclude.contains(&name.as_str())
        })
        .collect();
    Payload(fields)
}

fn form_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
