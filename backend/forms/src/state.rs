//! # Form State
//!
//! Holds what a mounted form knows about itself:
//! - `values`: raw input, one string per field
//! - `touched`: which fields the user has interacted with
//! - `errors`: the latest validation result, recomputed lazily
//! - `is_submitting`: true only while a submit is in flight
//!
//! A separate server banner carries the last remote failure. It is cleared on
//! every edit, while per-field errors wait for the next blur or submit.
use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::{
    error::FormError,
    schema::{Record, Schema, ValidationErrors},
};

/// Raw values of one concrete form.
pub trait FormValues: Clone + Default + Serialize {
    fn schema() -> &'static Schema;

    /// The input slot behind `name`, using the wire (camelCase) field name.
    fn field_mut(&mut self, name: &str) -> Option<&mut String>;

    fn record(&self) -> Result<Record, FormError> {
        match serde_json::to_value(self)? {
            Value::Object(record) => Ok(record),
            _ => Err(FormError::NotARecord),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FormState<T> {
    pub(crate) values: T,
    pub(crate) touched: BTreeMap<&'static str, bool>,
    pub(crate) errors: ValidationErrors,
    pub(crate) server_error: Option<String>,
    pub(crate) is_submitting: bool,
    pub(crate) generation: u64,
}

impl<T: FormValues> Default for FormState<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FormValues> FormState<T> {
    pub fn new() -> Self {
        Self::with_values(T::default())
    }

    pub fn with_values(values: T) -> Self {
        Self {
            values,
            touched: untouched::<T>(),
            errors: ValidationErrors::default(),
            server_error: None,
            is_submitting: false,
            generation: 0,
        }
    }

    pub fn values(&self) -> &T {
        &self.values
    }

    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> Result<(), FormError> {
        let slot = self
            .values
            .field_mut(name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))?;

        *slot = value.into();
        self.server_error = None;

        Ok(())
    }

    /// Marks `name` as interacted with and refreshes the errors so it can show its own.
    pub fn mark_touched(&mut self, name: &str) -> Result<(), FormError> {
        let touched = self
            .touched
            .get_mut(name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))?;

        *touched = true;
        self.validate()?;

        Ok(())
    }

    pub fn touch_all(&mut self) {
        self.touched.values_mut().for_each(|touched| *touched = true);
    }

    pub fn is_touched(&self, name: &str) -> bool {
        self.touched.get(name).copied().unwrap_or(false)
    }

    pub fn validate(&mut self) -> Result<&ValidationErrors, FormError> {
        self.errors = T::schema().validate(&self.values.record()?);

        Ok(&self.errors)
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// The error to render next to `name`: only once the field is touched.
    pub fn visible_error(&self, name: &str) -> Option<&str> {
        if self.is_touched(name) {
            self.errors.get(name)
        } else {
            None
        }
    }

    pub fn server_error(&self) -> Option<&str> {
        self.server_error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    /// Back to initial defaults. Any submit still in flight is orphaned.
    pub fn reset(&mut self) {
        self.values = T::default();
        self.touched = untouched::<T>();
        self.errors = ValidationErrors::default();
        self.server_error = None;
        self.is_submitting = false;
        self.generation += 1;
    }

    /// Tears the form down. Responses to submits begun before this are discarded.
    pub fn unmount(&mut self) {
        self.is_submitting = false;
        self.generation += 1;
    }
}

fn untouched<T: FormValues>() -> BTreeMap<&'static str, bool> {
    T::schema().fields().map(|field| (field.name(), false)).collect()
}
