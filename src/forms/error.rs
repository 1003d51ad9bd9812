use thiserror::Error;

/// Outcome of a rejected submit. Only the first unsatisfied field is reported.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Error: form is not valid. Field \"{field}\" is required")]
    Required { field: String },
}

impl ValidationError {
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field } => field,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("duplicate field name \"{0}\"")]
    DuplicateField(String),
    #[error("select field \"{0}\" has no options")]
    EmptyOptions(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("unknown field \"{0}\"")]
    UnknownField(String),
}
