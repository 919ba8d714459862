//! Tool catalog: operation name -> descriptor of the service that offers it

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::types::Tool;

use super::error::ToolError;
use super::registry::ServiceEndpoint;

/// What to do when two services advertise the same operation name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// The later service in registry order wins
    #[default]
    LastWriterWins,
    /// Fail discovery with `DuplicateOperation`
    Reject,
}

/// A discovered remote operation
#[derive(Debug, Clone)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    /// JSON schema of the argument object
    pub input_schema: Option<Value>,
    /// Service that advertised the operation
    pub service: Arc<ServiceEndpoint>,
}

impl ToolDescriptor {
    pub fn from_tool(tool: Tool, service: Arc<ServiceEndpoint>) -> Self {
        Self {
            name: tool.name,
            description: tool.description,
            input_schema: tool.input_schema,
            service,
        }
    }

    /// Model-facing declaration of this operation
    pub fn to_tool(&self) -> Tool {
        Tool {
            name: self.name.clone(),
            description: self.description.clone(),
            input_schema: self.input_schema.clone(),
        }
    }
}

/// Operation names mapped to their descriptors; names are unique
#[derive(Debug, Clone, Default)]
pub struct ToolCatalog {
    tools: HashMap<String, ToolDescriptor>,
}

impl ToolCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a descriptor under the given collision policy
    ///
    /// Returns the descriptor it displaced, if any.
    pub fn insert(
        &mut self,
        descriptor: ToolDescriptor,
        policy: CollisionPolicy,
    ) -> Result<Option<ToolDescriptor>, ToolError> {
        if let Some(existing) = self.tools.get(&descriptor.name) {
            if policy == CollisionPolicy::Reject {
                return Err(ToolError::DuplicateOperation {
                    name: descriptor.name.clone(),
                    first: existing.service.name.clone(),
                    second: descriptor.service.name.clone(),
                });
            }
        }
        Ok(self.tools.insert(descriptor.name.clone(), descriptor))
    }

    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Operation names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Declarations to pass to the model, sorted by name
    pub fn to_llm_tools(&self) -> Vec<Tool> {
        let mut tools: Vec<Tool> = self.tools.values().map(ToolDescriptor::to_tool).collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
