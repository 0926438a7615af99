//! Record abstraction stored in a collection file.

use std::borrow::Cow;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::StoreError;

pub const ID_FIELD: &str = "id";

/// A value that can live in a JSON collection.
///
/// The store owns the `id`: it is assigned once on create and `merge` must
/// never change it.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Current id, if the record carries a usable one.
    fn id(&self) -> Option<Cow<'_, str>>;

    fn set_id(&mut self, id: String);

    /// Shallow merge of `patch` onto `self`, leaving the id untouched.
    fn merge(&mut self, patch: Self);

    /// True when the record carries no fields besides the id.
    fn is_empty(&self) -> bool;

    fn has_id(&self, id: &str) -> bool {
        self.id().as_deref() == Some(id)
    }
}

/// Open-ended JSON object record. Field order is preserved on round trips.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    /// Parse a request body into a document; anything but a JSON object is rejected.
    pub fn from_payload(body: &[u8]) -> Result<Self, StoreError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(StoreError::invalid("request body is empty"));
        }
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| StoreError::invalid(format!("request body is not valid JSON: {e}")))?;
        Self::try_from(value)
    }

    pub fn get(&self, key: &str) -> Option<&Value> { self.0.get(key) }
}

impl TryFrom<Value> for Document {
    type Error = StoreError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(StoreError::invalid(format!(
                "expected a JSON object, got {}",
                json_type_name(&other)
            ))),
        }
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self { Value::Object(doc.0) }
}

impl Record for Document {
    fn id(&self) -> Option<Cow<'_, str>> {
        // seeded files may carry numeric ids
        match self.0.get(ID_FIELD) {
            Some(Value::String(s)) if !s.is_empty() => Some(Cow::Borrowed(s.as_str())),
            Some(Value::Number(n)) => Some(Cow::Owned(n.to_string())),
            _ => None,
        }
    }

    fn set_id(&mut self, id: String) {
        self.0.insert(ID_FIELD.to_string(), Value::String(id));
    }

    fn merge(&mut self, patch: Self) {
        for (key, value) in patch.0 {
            if key == ID_FIELD {
                continue;
            }
            self.0.insert(key, value);
        }
    }

    fn is_empty(&self) -> bool {
        self.0.keys().all(|k| k == ID_FIELD)
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
