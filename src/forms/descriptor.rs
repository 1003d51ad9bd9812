use super::error::SchemaError;
use serde::Deserialize;
use std::collections::HashSet;

/// Input kind of a field. `options` only exists for selects.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Email,
    Password,
    Select { options: Vec<String> },
}

impl FieldKind {
    pub fn is_text_like(&self) -> bool {
        !matches!(self, FieldKind::Select { .. })
    }

    pub fn options(&self) -> &[String] {
        match self {
            FieldKind::Select { options } => options,
            _ => &[],
        }
    }

    /// Value a field of this kind holds before any input and after `clear`.
    pub fn empty_value(&self) -> Option<String> {
        if self.is_text_like() {
            Some(String::new())
        } else {
            None
        }
    }

    /// Text-like kinds never hold `None`; an absent value becomes `""`.
    pub fn coerce(&self, value: Option<String>) -> Option<String> {
        if self.is_text_like() {
            Some(value.unwrap_or_default())
        } else {
            value
        }
    }

    // Whitespace-only text counts as present: no trimming here.
    pub fn satisfies_required(&self, value: Option<&str>) -> bool {
        match self {
            FieldKind::Select { .. } => value.is_some(),
            _ => value.is_some_and(|v| !v.is_empty()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub placeholder: Option<String>,
    /// Longest accepted input, in chars. Ignored for selects.
    #[serde(default)]
    pub max: Option<usize>,
    #[serde(flatten)]
    pub kind: FieldKind,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            required: false,
            placeholder: None,
            max: None,
            kind,
        }
    }

    pub fn text(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    pub fn email(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Email)
    }

    pub fn password(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Password)
    }

    pub fn select<I, S>(name: impl Into<String>, label: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let options = options.into_iter().map(Into::into).collect();
        Self::new(name, label, FieldKind::Select { options })
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = Some(text.into());
        self
    }

    #[must_use]
    pub fn max(mut self, chars: usize) -> Self {
        self.max = Some(chars);
        self
    }

    /// Whether a text-like field can take one more char.
    pub fn accepts_more(&self, current: &str) -> bool {
        self.max.map_or(true, |m| current.chars().count() < m)
    }
}

/// Ordered, checked list of field descriptors.
///
/// A form treats each `Arc<Schema>` as a distinct schema: handing it a
/// different `Arc` re-initializes all field values, even when the contents are
/// equal.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<FieldDescriptor>,
}

impl Schema {
    pub fn new(fields: Vec<FieldDescriptor>) -> Result<Self, SchemaError> {
        let mut seen: HashSet<&str> = HashSet::new();
        for fld in &fields {
            if !seen.insert(fld.name.as_str()) {
                return Err(SchemaError::DuplicateField(fld.name.clone()));
            }
            if let FieldKind::Select { options } = &fld.kind {
                if options.is_empty() {
                    return Err(SchemaError::EmptyOptions(fld.name.clone()));
                }
            }
        }
        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
