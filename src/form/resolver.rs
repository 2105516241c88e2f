//! Field display text, page ownership and placeholder tokens.

use super::overflow::text_overflows;
use crate::model::{FieldKind, FieldSpec, FormField, Page, Widget};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which resolved entries take part in substitution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldScope {
    /// Every widget of every field
    #[default]
    All,
    /// Only text fields whose value does not fit the widget
    OverflowOnly,
}

/// Options for form field resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldOptions {
    /// Entries taking part in substitution
    pub scope: FieldScope,

    /// Insert tokens into the page text instead of expecting the
    /// extractor to surface them
    pub splice_tokens: bool,

    /// Token prefix
    pub token_prefix: String,

    /// Token suffix
    pub token_suffix: String,
}

impl Default for FieldOptions {
    fn default() -> Self {
        Self {
            scope: FieldScope::All,
            splice_tokens: false,
            token_prefix: "@@FIELD_".to_string(),
            token_suffix: "@@".to_string(),
        }
    }
}

impl FieldOptions {
    /// Set the substitution scope.
    pub fn with_scope(mut self, scope: FieldScope) -> Self {
        self.scope = scope;
        self
    }

    /// Enable or disable token splicing.
    pub fn with_splice_tokens(mut self, enabled: bool) -> Self {
        self.splice_tokens = enabled;
        self
    }

    /// Create a token sequence using the configured prefix and suffix.
    pub fn token_sequence(&self) -> TokenSequence {
        TokenSequence::new(&self.token_prefix, &self.token_suffix)
    }
}

/// Request-scoped generator of unique placeholder tokens.
#[derive(Debug, Clone)]
pub struct TokenSequence {
    prefix: String,
    suffix: String,
    counter: u64,
}

impl TokenSequence {
    /// Create a sequence starting at 1.
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
            counter: 0,
        }
    }

    /// Produce the next token.
    pub fn next_token(&mut self) -> String {
        self.counter += 1;
        format!("{}{}{}", self.prefix, self.counter, self.suffix)
    }

    /// Number of tokens handed out so far.
    pub fn issued(&self) -> u64 {
        self.counter
    }
}

impl Default for TokenSequence {
    fn default() -> Self {
        FieldOptions::default().token_sequence()
    }
}

/// Resolved form fields of one document, immutable once built.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FieldMap {
    fields: Vec<FormField>,
    #[serde(skip)]
    by_token: HashMap<String, usize>,
}

impl FieldMap {
    fn from_fields(fields: Vec<FormField>) -> Self {
        let by_token = fields
            .iter()
            .enumerate()
            .map(|(idx, field)| (field.token.clone(), idx))
            .collect();
        Self { fields, by_token }
    }

    /// Look up the entry owning a placeholder token.
    pub fn by_token(&self, token: &str) -> Option<&FormField> {
        self.by_token.get(token).map(|&idx| &self.fields[idx])
    }

    /// Entries placed on a page (0-based index).
    pub fn on_page(&self, page_index: usize) -> Vec<&FormField> {
        self.fields
            .iter()
            .filter(|field| field.page_index == page_index)
            .collect()
    }

    /// Iterate over all entries.
    pub fn iter(&self) -> impl Iterator<Item = &FormField> {
        self.fields.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Resolves field specs into display entries.
#[derive(Debug, Clone, Default)]
pub struct FieldResolver {
    scope: FieldScope,
}

impl FieldResolver {
    /// Create a resolver.
    pub fn new(options: &FieldOptions) -> Self {
        Self {
            scope: options.scope,
        }
    }

    /// Resolve every widget of every field.
    ///
    /// Widgets whose page cannot be determined are left out.
    pub fn resolve(&self, specs: &[FieldSpec], pages: &[Page], tokens: &mut TokenSequence) -> FieldMap {
        let mut fields = Vec::new();
        let mut excluded = 0usize;

        for spec in specs {
            for widget in &spec.widgets {
                let Some(page_index) = page_index(widget, pages) else {
                    log::warn!(
                        "Field '{}': cannot determine the page of a widget, skipping",
                        spec.name
                    );
                    continue;
                };

                let text = display_text(spec, widget);
                let overflows = spec.kind == FieldKind::Text
                    && text_overflows(&text, &widget.rect, spec.default_appearance.as_deref());

                if self.scope == FieldScope::OverflowOnly && !overflows {
                    excluded += 1;
                    continue;
                }

                fields.push(FormField {
                    name: spec.name.clone(),
                    kind: spec.kind,
                    rect: widget.rect,
                    page_index,
                    text,
                    token: tokens.next_token(),
                    overflows,
                });
            }
        }

        log::debug!(
            "Resolved {} field entries ({} out of scope)",
            fields.len(),
            excluded
        );
        FieldMap::from_fields(fields)
    }
}

/// Page of a widget: its direct reference when valid, otherwise the page
/// whose annotations list the widget id.
fn page_index(widget: &Widget, pages: &[Page]) -> Option<usize> {
    if let Some(page) = widget.page.filter(|&page| page < pages.len()) {
        return Some(page);
    }

    let id = widget.id.as_deref()?;
    let found = pages
        .iter()
        .position(|page| page.annotations.iter().any(|ann| ann == id));
    if let Some(index) = found {
        log::debug!("Widget '{}' located through page annotations: {}", id, index);
    }
    found
}

fn display_text(spec: &FieldSpec, widget: &Widget) -> String {
    let value = spec.value.as_deref().unwrap_or("");
    match spec.kind {
        FieldKind::Checkbox => {
            if !value.is_empty() && value != "Off" {
                "[x]".to_string()
            } else {
                "[ ]".to_string()
            }
        }
        FieldKind::Radio => {
            let selected = !value.is_empty() && widget.export_value.as_deref() == Some(value);
            let mark = if selected { "(x)" } else { "( )" };
            mark.to_string()
        }
        FieldKind::Combo => spec
            .options
            .iter()
            .find(|option| option.export == value)
            .map(|option| option.label.clone())
            .unwrap_or_else(|| value.to_string()),
        FieldKind::Text => value.to_string(),
    }
}
