//! Plugin metadata exposed to the host
//!
//! A provider describes itself with a constant [`PluginDefinition`]: display
//! name and version, extra configuration pages to mount, and the fields it
//! adds to the host's record form. Select fields resolve their options from
//! the data the plugin stored in the host configuration.

use serde::Serialize;

/// Resolves select options from a plugin's stored dataset
pub type OptionsResolver = fn(&serde_json::Value) -> Vec<SelectOption>;

/// Static description of a provider plugin
#[derive(Debug, Clone, Serialize)]
pub struct PluginDefinition {
    /// Human-readable name
    pub name: &'static str,
    /// Plugin version
    pub version: &'static str,
    /// Description (may contain HTML)
    pub description: &'static str,
    /// Extra configuration pages to mount
    pub configurator: &'static [Configurator],
    /// Fields added to each record
    pub record: &'static [RecordField],
}

impl PluginDefinition {
    /// Find a record field by name
    pub fn field(&self, name: &str) -> Option<&RecordField> {
        self.record.iter().find(|f| f.name == name)
    }
}

/// An extra page and script mounted in the host's configuration UI
#[derive(Debug, Clone, Serialize)]
pub struct Configurator {
    /// Fragment name
    pub name: &'static str,
    /// Page path
    pub page: &'static str,
    /// Script path
    pub script: &'static str,
    /// Where the fragment is placed
    pub position: Position,
}

/// Placement of a configurator fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    /// Before the host's own fields
    Front,
    /// After the host's own fields
    Back,
}

/// A field added to the host's record form
#[derive(Debug, Clone, Serialize)]
pub struct RecordField {
    /// Label shown to the user
    pub print: &'static str,
    /// Key stored on the record
    pub name: &'static str,
    /// Input kind
    #[serde(flatten)]
    pub kind: FieldKind,
    /// Optional hover help
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<&'static str>,
    /// Whether the host must require a value
    pub required: bool,
}

impl RecordField {
    /// Options of a select field for the given dataset; empty for other kinds
    pub fn options(&self, dataset: &serde_json::Value) -> Vec<SelectOption> {
        match self.kind {
            FieldKind::Select { options } => options(dataset),
            FieldKind::Text | FieldKind::Number => Vec::new(),
        }
    }
}

/// Input kind of a record field
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    /// Free text
    Text,
    /// Number
    Number,
    /// Drop-down populated from the plugin dataset
    Select {
        /// Option resolver
        #[serde(skip)]
        options: OptionsResolver,
    },
}

/// One entry of a select field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    /// Displayed text
    pub text: String,
    /// Stored value
    pub value: String,
}

impl SelectOption {
    /// Create a select option
    pub fn new(text: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            value: value.into(),
        }
    }
}
