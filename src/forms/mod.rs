//! Schema-driven form state.
//!
//! A [`Form`] is built from a [`Schema`] and a submit handler. It owns one
//! [`FieldState`] per descriptor, dispatches value changes by field name and
//! checks required fields when submitted. Everything here is synchronous; any
//! slow work belongs to the submit handler.

mod descriptor;
mod error;

#[cfg(test)]
mod tests;

pub use descriptor::{FieldDescriptor, FieldKind, Schema};
pub use error::{FormError, SchemaError, ValidationError};

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Event that triggered a submit. The form suppresses its default action
/// before validating.
pub trait SubmitEvent {
    fn prevent_default(&mut self);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldState {
    pub value: Option<String>,
    pub kind: FieldKind,
    pub label: String,
    pub required: bool,
    pub placeholder: Option<String>,
}

impl FieldState {
    fn from_descriptor(desc: &FieldDescriptor) -> Self {
        Self {
            value: desc.kind.empty_value(),
            kind: desc.kind.clone(),
            label: desc.label.clone(),
            required: desc.required,
            placeholder: desc.placeholder.clone(),
        }
    }

    pub fn is_satisfied(&self) -> bool {
        !self.required || self.kind.satisfies_required(self.value.as_deref())
    }
}

/// Change notification delivered to subscribers after each mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormEvent {
    ValueChanged { name: String },
    SchemaReset,
    Cleared,
    ErrorChanged { error: Option<ValidationError> },
}

pub type SubmitHandler<E> = Box<dyn FnMut(E) + Send>;
type Listener = Box<dyn FnMut(&FormEvent) + Send>;

pub struct Form<E> {
    schema: Arc<Schema>,
    fields: HashMap<String, FieldState>,
    error: Option<ValidationError>,
    on_submit: SubmitHandler<E>,
    listeners: Vec<Listener>,
    revision: u64,
}

impl<E> fmt::Debug for Form<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Form")
            .field("schema", &self.schema)
            .field("fields", &self.fields)
            .field("error", &self.error)
            .field("listeners", &self.listeners.len())
            .field("revision", &self.revision)
            .finish()
    }
}

impl<E> Form<E> {
    pub fn new<F>(schema: Arc<Schema>, on_submit: F) -> Self
    where
        F: FnMut(E) + Send + 'static,
    {
        let fields = initial_state(&schema);
        Self {
            schema,
            fields,
            error: None,
            on_submit: Box::new(on_submit),
            listeners: Vec::new(),
            revision: 0,
        }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Installs a new schema. A different `Arc` discards every value, including
    /// those of fields present in both schemas; the same `Arc` is a no-op.
    pub fn set_schema(&mut self, schema: Arc<Schema>) {
        if Arc::ptr_eq(&self.schema, &schema) {
            return;
        }
        tracing::debug!(fields = schema.len(), "form schema replaced");
        self.fields = initial_state(&schema);
        self.schema = schema;
        self.bump(FormEvent::SchemaReset);
    }

    pub fn field(&self, name: &str) -> Option<&FieldState> {
        self.fields.get(name)
    }

    /// Descriptor and live state pairs in schema order.
    pub fn fields(&self) -> impl Iterator<Item = (&FieldDescriptor, &FieldState)> {
        self.schema
            .fields()
            .iter()
            .filter_map(|d| self.fields.get(&d.name).map(|st| (d, st)))
    }

    pub fn values(&self) -> Vec<(&str, Option<&str>)> {
        self.fields()
            .map(|(d, st)| (d.name.as_str(), st.value.as_deref()))
            .collect()
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(|st| st.value.as_deref())
    }

    /// Replaces the named field's value. No validation happens here.
    pub fn on_change(&mut self, name: &str, value: Option<String>) -> Result<(), FormError> {
        let slot = self
            .fields
            .get_mut(name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))?;
        slot.value = slot.kind.coerce(value);
        self.bump(FormEvent::ValueChanged {
            name: name.to_string(),
        });
        Ok(())
    }

    /// Resets every value to its kind's empty representation. The error is kept.
    pub fn clear(&mut self) {
        for st in self.fields.values_mut() {
            st.value = st.kind.empty_value();
        }
        self.bump(FormEvent::Cleared);
    }

    pub fn error(&self) -> Option<&ValidationError> {
        self.error.as_ref()
    }

    pub fn is_submittable(&self) -> bool {
        self.error.is_none()
    }

    /// Counter bumped on every mutation; consumers can compare it to decide
    /// whether to redraw.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Registers a listener that lives as long as the form.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&FormEvent) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    fn set_error(&mut self, error: Option<ValidationError>) {
        if self.error == error {
            return;
        }
        self.error = error.clone();
        self.bump(FormEvent::ErrorChanged { error });
    }

    fn bump(&mut self, event: FormEvent) {
        self.revision = self.revision.wrapping_add(1);
        for listener in &mut self.listeners {
            listener(&event);
        }
    }
}

impl<E: SubmitEvent> Form<E> {
    /// Validates and, on success, hands `event` to the submit handler.
    ///
    /// The returned error and [`Form::error`] come from the same check, so the
    /// handler has run if and only if this returns `Ok`.
    pub fn submit(&mut self, mut event: E) -> Result<(), ValidationError> {
        event.prevent_default();
        match validate(&self.schema, &self.fields) {
            Ok(()) => {
                self.set_error(None);
                tracing::info!("form accepted");
                (self.on_submit)(event);
                Ok(())
            }
            Err(err) => {
                tracing::info!(field = err.field(), "form rejected");
                self.set_error(Some(err.clone()));
                Err(err)
            }
        }
    }
}

fn initial_state(schema: &Schema) -> HashMap<String, FieldState> {
    schema
        .fields()
        .iter()
        .map(|d| (d.name.clone(), FieldState::from_descriptor(d)))
        .collect()
}

/// Checks required fields in schema order and stops at the first failure.
pub fn validate(
    schema: &Schema,
    fields: &HashMap<String, FieldState>,
) -> Result<(), ValidationError> {
    for desc in schema.fields() {
        let ok = fields
            .get(&desc.name)
            .map_or(!desc.required, FieldState::is_satisfied);
        if !ok {
            return Err(ValidationError::Required {
                field: desc.name.clone(),
            });
        }
    }
    Ok(())
}
