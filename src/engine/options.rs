//! Engine configuration.

use crate::boilerplate::BoilerplateOptions;
use crate::error::Result;
use crate::form::{FieldOptions, FieldScope};
use crate::table::TableOptions;
use crate::variant::{QuestionProfile, VariantMode};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options for cleaning a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Boilerplate detection
    pub boilerplate: BoilerplateOptions,

    /// Table handling
    pub tables: TableOptions,

    /// Form field resolution
    pub fields: FieldOptions,

    /// What a structured questionnaire looks like
    pub questions: QuestionProfile,

    /// How the document variant is chosen
    pub variant_mode: VariantMode,

    /// Substitute form field values for their placeholder tokens
    pub resolve_form_fields: bool,

    /// Reconstruct pages in parallel
    pub parallel: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            boilerplate: BoilerplateOptions::default(),
            tables: TableOptions::default(),
            fields: FieldOptions::default(),
            questions: QuestionProfile::default(),
            variant_mode: VariantMode::Standard,
            resolve_form_fields: true,
            parallel: true,
        }
    }
}

impl EngineOptions {
    /// Create engine options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a JSON string; missing keys keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    /// Check ranges and patterns before any page is touched.
    pub fn validate(&self) -> Result<()> {
        self.boilerplate.validate()?;
        Regex::new(&self.boilerplate.page_number_pattern)?;
        self.questions.rule()?;
        Ok(())
    }

    /// Set the header/footer band height.
    pub fn with_band_height(mut self, height: f32) -> Self {
        self.boilerplate.band_height = height;
        self
    }

    /// Set the frequency threshold.
    pub fn with_frequency_threshold(mut self, threshold: f32) -> Self {
        self.boilerplate.frequency_threshold = threshold;
        self
    }

    /// Set the similarity threshold.
    pub fn with_similarity_threshold(mut self, threshold: f32) -> Self {
        self.boilerplate.similarity_threshold = threshold;
        self
    }

    /// Enable or disable the `|---|` separator after the first table row.
    pub fn with_header_separator(mut self, enabled: bool) -> Self {
        self.tables.with_header_separator = enabled;
        self
    }

    /// Enable or disable form field substitution.
    pub fn with_form_fields(mut self, enabled: bool) -> Self {
        self.resolve_form_fields = enabled;
        self
    }

    /// Select which field entries are substituted.
    pub fn with_field_scope(mut self, scope: FieldScope) -> Self {
        self.fields.scope = scope;
        self
    }

    /// Insert field tokens into the page text during reconstruction.
    pub fn with_splice_tokens(mut self, enabled: bool) -> Self {
        self.fields.splice_tokens = enabled;
        self
    }

    /// Set the variant mode.
    pub fn with_variant_mode(mut self, mode: VariantMode) -> Self {
        self.variant_mode = mode;
        self
    }

    /// Set the questionnaire profile.
    pub fn with_questions(mut self, profile: QuestionProfile) -> Self {
        self.questions = profile;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}
