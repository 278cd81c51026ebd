use serde_json::{Map, Value};

use crate::error::StoreError;

/// A stored record: a JSON object keyed by attribute name.
pub type Document = Map<String, Value>;

/// Scan predicate evaluated against every document in a table.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Field is present and equal to `value`.
    Eq { field: String, value: Value },
    /// Field is a list containing `value`.
    Contains { field: String, value: Value },
    And(Vec<Filter>),
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn contains(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Contains {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn and(self, other: Filter) -> Self {
        match self {
            Self::And(mut filters) => {
                filters.push(other);
                Self::And(filters)
            }
            first => Self::And(vec![first, other]),
        }
    }

    pub fn matches(&self, document: &Document) -> bool {
        match self {
            Self::Eq { field, value } => document.get(field) == Some(value),
            Self::Contains { field, value } => document
                .get(field)
                .and_then(Value::as_array)
                .is_some_and(|items| items.contains(value)),
            Self::And(filters) => filters.iter().all(|f| f.matches(document)),
        }
    }
}

/// Named subset of attributes returned by a read. Attributes missing from a
/// document are left out rather than filled with nulls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection(Vec<String>);

impl Projection {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(fields.into_iter().map(Into::into).collect())
    }

    pub fn apply(&self, document: &Document) -> Document {
        self.0
            .iter()
            .filter_map(|field| document.get(field).map(|v| (field.clone(), v.clone())))
            .collect()
    }
}

/// One mutation inside a single-record update.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOp {
    /// Append `items` to a list field, creating it as an empty list if absent.
    Append { field: String, items: Vec<Value> },
    /// Add `delta` to an existing integer field.
    Add { field: String, delta: i64 },
    /// Overwrite a field with a literal value.
    Set { field: String, value: Value },
    /// Remove every occurrence of `value` from a list field.
    Remove { field: String, value: Value },
}

impl UpdateOp {
    pub fn append(field: impl Into<String>, items: Vec<Value>) -> Self {
        Self::Append {
            field: field.into(),
            items,
        }
    }

    pub fn add(field: impl Into<String>, delta: i64) -> Self {
        Self::Add {
            field: field.into(),
            delta,
        }
    }

    pub fn set(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Set {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn remove(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Remove {
            field: field.into(),
            value: value.into(),
        }
    }

    fn apply(&self, document: &mut Document) -> Result<(), StoreError> {
        match self {
            Self::Append { field, items } => {
                let slot = document
                    .entry(field.clone())
                    .or_insert_with(|| Value::Array(Vec::new()));
                if slot.is_null() {
                    *slot = Value::Array(Vec::new());
                }
                match slot.as_array_mut() {
                    Some(list) => list.extend(items.iter().cloned()),
                    None => return Err(StoreError::invalid_update(field, "not a list")),
                }
            }
            Self::Add { field, delta } => {
                let current = match document.get(field) {
                    Some(Value::Number(n)) => n
                        .as_i64()
                        .ok_or_else(|| StoreError::invalid_update(field, "not an integer"))?,
                    Some(_) => return Err(StoreError::invalid_update(field, "not a number")),
                    None => return Err(StoreError::invalid_update(field, "missing numeric field")),
                };
                let next = current
                    .checked_add(*delta)
                    .ok_or_else(|| StoreError::invalid_update(field, "integer overflow"))?;
                document.insert(field.clone(), Value::from(next));
            }
            Self::Set { field, value } => {
                document.insert(field.clone(), value.clone());
            }
            Self::Remove { field, value } => match document.get_mut(field) {
                Some(Value::Array(list)) => list.retain(|item| item != value),
                Some(Value::Null) | None => {}
                Some(_) => return Err(StoreError::invalid_update(field, "not a list")),
            },
        }
        Ok(())
    }
}

/// Apply `ops` in order. On error `document` is left as it was.
pub fn apply_ops(document: &mut Document, ops: &[UpdateOp]) -> Result<(), StoreError> {
    let mut next = document.clone();
    for op in ops {
        op.apply(&mut next)?;
    }
    *document = next;
    Ok(())
}
