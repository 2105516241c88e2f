//! Interactive form field types.
//!
//! [`FieldSpec`] is what the field-enumeration collaborator reports;
//! [`FormField`] is one resolved widget entry produced by
//! [`crate::form::FieldResolver`].

use super::Rect;
use serde::{Deserialize, Serialize};

/// Kind of an interactive form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Free text input
    Text,
    /// Checkbox
    Checkbox,
    /// Radio button group
    Radio,
    /// Combo box (dropdown)
    Combo,
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Checkbox => write!(f, "checkbox"),
            Self::Radio => write!(f, "radio"),
            Self::Combo => write!(f, "combo"),
        }
    }
}

/// A field as enumerated from the document's form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Fully qualified field name
    #[serde(default)]
    pub name: String,

    /// Field kind
    pub kind: FieldKind,

    /// Entered text, selected export value, or checkbox state
    #[serde(default)]
    pub value: Option<String>,

    /// Choices for combo boxes
    #[serde(default)]
    pub options: Vec<ChoiceOption>,

    /// Default appearance string (e.g. `/Helv 10 Tf 0 g`)
    #[serde(default)]
    pub default_appearance: Option<String>,

    /// Widget annotations showing the field
    #[serde(default)]
    pub widgets: Vec<Widget>,
}

impl FieldSpec {
    /// Create a field with no widgets.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            value: None,
            options: Vec::new(),
            default_appearance: None,
            widgets: Vec::new(),
        }
    }

    /// Set the field value.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Add a widget.
    pub fn with_widget(mut self, widget: Widget) -> Self {
        self.widgets.push(widget);
        self
    }

    /// Add a combo box option.
    pub fn with_option(mut self, export: impl Into<String>, label: impl Into<String>) -> Self {
        self.options.push(ChoiceOption {
            export: export.into(),
            label: label.into(),
        });
        self
    }

    /// Set the default appearance string.
    pub fn with_appearance(mut self, da: impl Into<String>) -> Self {
        self.default_appearance = Some(da.into());
        self
    }
}

/// A combo box choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    /// Value stored in the field when chosen
    pub export: String,
    /// Label shown to the user
    pub label: String,
}

/// A widget annotation: one visible rectangle of a field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Widget {
    /// Annotation id, matched against [`super::Page::annotations`]
    #[serde(default)]
    pub id: Option<String>,

    /// Widget rectangle
    pub rect: Rect,

    /// 0-based index of the page the widget claims to be on
    #[serde(default)]
    pub page: Option<usize>,

    /// Export value (radio buttons)
    #[serde(default)]
    pub export_value: Option<String>,
}

impl Widget {
    /// Create a widget on a known page.
    pub fn new(rect: Rect, page: usize) -> Self {
        Self {
            id: None,
            rect,
            page: Some(page),
            export_value: None,
        }
    }

    /// Create a widget whose page reference is missing.
    pub fn detached(id: impl Into<String>, rect: Rect) -> Self {
        Self {
            id: Some(id.into()),
            rect,
            page: None,
            export_value: None,
        }
    }

    /// Set the annotation id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the radio export value.
    pub fn with_export(mut self, export: impl Into<String>) -> Self {
        self.export_value = Some(export.into());
        self
    }
}

/// A resolved widget entry with its placeholder token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormField {
    /// Name of the owning field
    pub name: String,
    /// Field kind
    pub kind: FieldKind,
    /// Widget rectangle
    pub rect: Rect,
    /// 0-based page index
    pub page_index: usize,
    /// Display text substituted for the token
    pub text: String,
    /// Unique placeholder token
    pub token: String,
    /// Whether the value does not fit in the widget
    pub overflows: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_spec_builder() {
        let field = FieldSpec::new("country", FieldKind::Combo)
            .with_value("de")
            .with_option("de", "Germany")
            .with_widget(Widget::new(Rect::new(0.0, 0.0, 10.0, 10.0), 0));

        assert_eq!(field.options[0].label, "Germany");
        assert_eq!(field.widgets.len(), 1);
        assert_eq!(field.value.as_deref(), Some("de"));
    }

    #[test]
    fn test_field_kind_serde() {
        let kind: FieldKind = serde_json::from_str("\"checkbox\"").unwrap();
        assert_eq!(kind, FieldKind::Checkbox);
        assert_eq!(kind.to_string(), "checkbox");
    }
}
