use crate::error::StopwiseError;
use crate::matrix::Matrix;
use std::collections::BTreeMap;

/// A set of pending parameter assignments, `name -> new value`.
///
/// Produced by an update rule (e.g. `Sgd::updates`) and applied with
/// `ParamStore::apply_updates`.
pub type Updates = Vec<(String, Matrix)>;

/// Gradients keyed by parameter name.
pub type Gradients = BTreeMap<String, Matrix>;

/// Named storage for the learnable parameters of a model.
///
/// Models never own their weights; they hold parameter names and read the
/// values from a store that is passed to them explicitly. This keeps the
/// mutable state in one place that the trainer can own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamStore {
    params: BTreeMap<String, Matrix>,
}

impl ParamStore {
    pub fn new() -> Self {
        ParamStore::default()
    }

    /// Registers a new parameter.
    ///
    /// # Errors
    /// Returns `StopwiseError::DuplicateParameter` if `name` is already taken.
    pub fn register(&mut self, name: impl Into<String>, value: Matrix) -> Result<(), StopwiseError> {
        let name = name.into();
        if self.params.contains_key(&name) {
            return Err(StopwiseError::DuplicateParameter(name));
        }
        self.params.insert(name, value);
        Ok(())
    }

    /// Returns the current value of `name`.
    pub fn get(&self, name: &str) -> Result<&Matrix, StopwiseError> {
        self.params
            .get(name)
            .ok_or_else(|| StopwiseError::UnknownParameter(name.to_string()))
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut Matrix, StopwiseError> {
        self.params
            .get_mut(name)
            .ok_or_else(|| StopwiseError::UnknownParameter(name.to_string()))
    }

    /// Overwrites the value of an existing parameter. The shape must not change.
    pub fn set_value(&mut self, name: &str, value: Matrix) -> Result<(), StopwiseError> {
        let slot = self.get_mut(name)?;
        if slot.shape() != value.shape() {
            return Err(StopwiseError::ShapeMismatch {
                expected: slot.shape().to_vec(),
                actual: value.shape().to_vec(),
                operation: format!("set_value({})", name),
            });
        }
        *slot = value;
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    /// Parameter names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Matrix)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Total number of scalar values across all parameters.
    pub fn num_elements(&self) -> usize {
        self.params.values().map(Matrix::numel).sum()
    }

    /// Applies a set of updates as a single transaction.
    ///
    /// Every update is checked (known name, same shape, finite values)
    /// before any value is written, so on error the store is unchanged.
    pub fn apply_updates(&mut self, updates: Updates) -> Result<(), StopwiseError> {
        for (name, value) in &updates {
            let current = self.get(name)?;
            if current.shape() != value.shape() {
                return Err(StopwiseError::ShapeMismatch {
                    expected: current.shape().to_vec(),
                    actual: value.shape().to_vec(),
                    operation: format!("apply_updates({})", name),
                });
            }
            if !value.is_finite() {
                return Err(StopwiseError::NonFiniteValue {
                    operation: format!("apply_updates({})", name),
                });
            }
        }
        for (name, value) in updates {
            self.params.insert(name, value);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "params_test.rs"]
mod tests;
