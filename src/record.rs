use std::collections::HashMap;

use thiserror::Error;

use crate::{
    ast::{PathSegment, VariableRef, path::render_segments},
    convert::json_to_value,
    value::Value,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("record must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// The fields of one participant, keyed by dotted path or nested by segment.
///
/// Both shapes resolve the same variable:
///
/// ```
/// use cohort_rule::{Record, Value, ast::VariableRef};
/// use serde_json::json;
///
/// let var = VariableRef::from_dotted("enrollee.subject");
///
/// let flat = Record::from_json(json!({"enrollee.subject": true})).unwrap();
/// let nested = Record::from_json(json!({"enrollee": {"subject": true}})).unwrap();
///
/// assert_eq!(flat.lookup(&var), Some(&Value::Boolean(true)));
/// assert_eq!(nested.lookup(&var), Some(&Value::Boolean(true)));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: HashMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: serde_json::Value) -> Result<Self, RecordError> {
        match json_to_value(json) {
            Value::Object(fields) => Ok(Record { fields }),
            other => Err(RecordError::NotAnObject(other.type_name())),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(key.into(), value.into())
    }

    /// Builder-style [`Record::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Resolves a variable. The longest prefix of the path stored as a flat
    /// key wins; the rest of the path descends into objects and arrays.
    pub fn lookup(&self, var: &VariableRef) -> Option<&Value> {
        let segments = var.segments();

        for split in (1..=segments.len()).rev() {
            if let Some(root) = self.fields.get(&render_segments(&segments[..split])) {
                return descend(root, &segments[split..]);
            }
        }
        None
    }
}

fn descend<'a>(mut current: &'a Value, rest: &[PathSegment]) -> Option<&'a Value> {
    for segment in rest {
        current = match (segment, current) {
            (PathSegment::Field(name) | PathSegment::Key(name), Value::Object(map)) => map.get(name)?,
            (PathSegment::Index(index), Value::Array(arr)) => arr.get(*index)?,
            _ => return None,
        };
    }
    Some(current)
}

impl From<HashMap<String, Value>> for Record {
    fn from(fields: HashMap<String, Value>) -> Self {
        Record { fields }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Record {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}
