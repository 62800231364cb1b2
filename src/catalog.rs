//! Tool catalog — typed descriptors for externally supplied tool schemas.
//!
//! The catalog is read-only input: a `serverName -> [ToolDescriptor]` mapping
//! declared once per calibration run. Property declaration order is preserved
//! because the parameter synthesizer falls back to the first three declared
//! properties when a schema lists no required names.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

use crate::types::{Error, Result};

// =============================================================================
// Parameter types
// =============================================================================

/// Declared JSON type of a single tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    /// Any type string this catalog does not model. Tolerated on input;
    /// synthesizes no value.
    #[serde(other)]
    Unknown,
}

impl ParamType {
    /// Human-readable type name for log and prompt output.
    pub fn display_name(self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Number => "number",
            ParamType::Integer => "integer",
            ParamType::Boolean => "boolean",
            ParamType::Array => "array",
            ParamType::Object => "object",
            ParamType::Unknown => "unknown",
        }
    }
}

/// Item schema of an array parameter. Only the item type is consulted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemsSchema {
    #[serde(rename = "type", default)]
    pub item_type: Option<ParamType>,
}

/// Declared schema for one named parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertySchema {
    #[serde(rename = "type", default)]
    pub param_type: Option<ParamType>,

    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<ItemsSchema>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

// =============================================================================
// Tool descriptor
// =============================================================================

/// Input schema of a tool: named properties plus required-name list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolInputSchema {
    #[serde(default)]
    pub properties: IndexMap<String, PropertySchema>,

    #[serde(default)]
    pub required: Vec<String>,
}

impl ToolInputSchema {
    /// Whether a named property is required.
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }
}

/// Complete tool metadata entry. Supplied externally, read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,

    /// Owning server. Filled from the catalog key when the descriptor
    /// itself omits it.
    #[serde(default)]
    pub server: String,

    #[serde(rename = "inputSchema", default)]
    pub input_schema: ToolInputSchema,
}

impl ToolDescriptor {
    /// One-line summary for logs.
    ///
    /// Format: `- tool_name(param1: type, param2?: type)`
    pub fn prompt_line(&self) -> String {
        let params: Vec<String> = self
            .input_schema
            .properties
            .iter()
            .map(|(name, prop)| {
                let optional = if self.input_schema.is_required(name) { "" } else { "?" };
                let type_name = prop
                    .param_type
                    .map(ParamType::display_name)
                    .unwrap_or("unknown");
                format!("{}{}: {}", name, optional, type_name)
            })
            .collect();

        format!("- {}({})", self.name, params.join(", "))
    }
}

// =============================================================================
// Tool catalog
// =============================================================================

/// Static `serverName -> [ToolDescriptor]` catalog for a calibration run.
#[derive(Debug, Default)]
pub struct ToolCatalog {
    servers: BTreeMap<String, Vec<ToolDescriptor>>,
}

impl ToolCatalog {
    /// Load the catalog from a JSON file.
    ///
    /// Descriptors that omit `server` inherit the catalog key.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::catalog(format!("cannot read {}: {}", path.display(), e)))?;
        let mut servers: BTreeMap<String, Vec<ToolDescriptor>> = serde_json::from_str(&raw)
            .map_err(|e| Error::catalog(format!("invalid catalog {}: {}", path.display(), e)))?;

        for (server, tools) in &mut servers {
            for tool in tools {
                if tool.server.is_empty() {
                    tool.server = server.clone();
                }
            }
        }
        Ok(Self { servers })
    }

    /// All configured server names, sorted.
    pub fn server_names(&self) -> Vec<String> {
        self.servers.keys().cloned().collect()
    }

    /// Tools declared for one server.
    ///
    /// An unknown server is a catalog failure: fatal to that server's
    /// calibration pass only.
    pub fn tools_for(&self, server: &str) -> Result<&[ToolDescriptor]> {
        self.servers
            .get(server)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::catalog(format!("unknown server: {}", server)))
    }

    /// Number of configured servers.
    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================
