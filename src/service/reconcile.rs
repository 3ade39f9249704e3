//! Partial-update field selection shared by both stores.

use crate::error::AppError;
use serde_json::{Map, Value};

/// A field that may appear on an update allow-list. `key` is used verbatim as
/// column name and document key, so implementors must only return constants.
pub trait AllowedField: Copy + Eq + 'static {
    fn key(self) -> &'static str;
}

/// Fields selected for a partial update, in allow-list order.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldChanges<F, V = Value> {
    entries: Vec<(F, V)>,
}

impl<F: AllowedField, V> FieldChanges<F, V> {
    pub fn iter(&self) -> impl Iterator<Item = (F, &V)> {
        self.entries.iter().map(|(f, v)| (*f, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names of the fields that will be written, for `updatedFields`.
    pub fn applied(&self) -> Vec<&'static str> {
        self.entries.iter().map(|(f, _)| f.key()).collect()
    }

    pub fn try_map<W, E>(self, mut f: impl FnMut(F, V) -> Result<W, E>) -> Result<FieldChanges<F, W>, E> {
        let mut entries = Vec::with_capacity(self.entries.len());
        for (field, value) in self.entries {
            let mapped = f(field, value)?;
            entries.push((field, mapped));
        }
        Ok(FieldChanges { entries })
    }
}

/// Keep only keys that are both in `input` and on `allowed`, skipping nulls.
/// An empty selection is rejected so callers never issue an empty write.
pub fn reconcile<F: AllowedField>(input: &Map<String, Value>, allowed: &[F]) -> Result<FieldChanges<F>, AppError> {
    let entries: Vec<(F, Value)> = allowed
        .iter()
        .filter_map(|field| match input.get(field.key()) {
            None | Some(Value::Null) => None,
            Some(v) => Some((*field, v.clone())),
        })
        .collect();
    if entries.is_empty() {
        return Err(AppError::invalid("No valid fields provided for update"));
    }
    Ok(FieldChanges { entries })
}
