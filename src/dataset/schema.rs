//! Field schemas for dataset kinds
//!
//! A schema is the typed lookup table behind query validation: every field
//! reference in a query resolves here, so an unknown field name is a
//! validation error rather than a runtime access failure.

use std::collections::HashMap;

/// The value shape of a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Numeric value (f64 in record bodies)
    Numeric,
    /// UTF-8 string
    Text,
    /// Ordered list of strings
    TextList,
}

impl FieldKind {
    /// Returns the kind name for error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldKind::Numeric => "numeric",
            FieldKind::Text => "string",
            FieldKind::TextList => "string list",
        }
    }
}

/// Field whitelist for one dataset kind.
#[derive(Debug, Clone)]
pub struct Schema {
    kind: String,
    fields: HashMap<String, FieldKind>,
}

impl Schema {
    /// Creates a schema from a kind name and field table.
    pub fn new(kind: impl Into<String>, fields: HashMap<String, FieldKind>) -> Self {
        Self {
            kind: kind.into(),
            fields,
        }
    }

    /// The built-in contractor schema.
    pub fn contractors() -> Self {
        let mut fields = HashMap::new();
        fields.insert("id".to_string(), FieldKind::Numeric);
        fields.insert("lat".to_string(), FieldKind::Numeric);
        fields.insert("lon".to_string(), FieldKind::Numeric);
        fields.insert("companyName".to_string(), FieldKind::Text);
        fields.insert("city".to_string(), FieldKind::Text);
        fields.insert("region".to_string(), FieldKind::Text);
        fields.insert("province".to_string(), FieldKind::Text);
        fields.insert("address".to_string(), FieldKind::Text);
        fields.insert("phone".to_string(), FieldKind::Text);
        fields.insert("website".to_string(), FieldKind::Text);
        fields.insert("operations".to_string(), FieldKind::TextList);
        fields.insert("equipment".to_string(), FieldKind::TextList);
        fields.insert("models".to_string(), FieldKind::TextList);
        Self::new("contractors", fields)
    }

    /// Returns the kind name
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Resolves a field name to its kind, if declared.
    pub fn field_kind(&self, field: &str) -> Option<FieldKind> {
        self.fields.get(field).copied()
    }

    /// Checks whether a field is declared with the given kind.
    pub fn is_kind(&self, field: &str, kind: FieldKind) -> bool {
        self.field_kind(field) == Some(kind)
    }

    /// Checks whether a field is declared at all.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// All declared field names, sorted for deterministic output.
    pub fn field_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
