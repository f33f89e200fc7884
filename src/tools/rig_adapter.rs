//! Adapter exposing shopkeep [`ToolDefinition`]s as rig-core [`ToolDyn`]s.
//!
//! rig-core reads tool definitions from the agent's tool set when it builds a
//! completion request, so every declared tool is wrapped in a
//! [`RigToolAdapter`]. Tool calls coming back from the model are executed by
//! the orchestrator; the adapter only declares.

use std::pin::Pin;

use rig::completion::ToolDefinition as RigToolDefinition;
use rig::tool::{ToolDyn, ToolError};

use super::ToolDefinition;

/// Declares one shopkeep tool to rig-core.
pub struct RigToolAdapter {
    definition: ToolDefinition,
}

impl RigToolAdapter {
    pub fn new(definition: ToolDefinition) -> Self {
        Self { definition }
    }
}

/// Wraps every definition for an agent builder's `.tools()`.
pub fn declare(definitions: &[ToolDefinition]) -> Vec<Box<dyn ToolDyn>> {
    definitions
        .iter()
        .cloned()
        .map(|d| Box::new(RigToolAdapter::new(d)) as Box<dyn ToolDyn>)
        .collect()
}

impl ToolDyn for RigToolAdapter {
    fn name(&self) -> String {
        self.definition.name.clone()
    }

    fn definition<'a>(
        &'a self,
        _prompt: String,
    ) -> Pin<Box<dyn std::future::Future<Output = RigToolDefinition> + Send + 'a>> {
        let definition = RigToolDefinition {
            name: self.definition.name.clone(),
            description: self.definition.description.clone(),
            parameters: self.definition.parameters.clone(),
        };
        Box::pin(async move { definition })
    }

    fn call<'a>(
        &'a self,
        _args: String,
    ) -> Pin<Box<dyn std::future::Future<Output = Result<String, ToolError>> + Send + 'a>> {
        let name = self.definition.name.clone();
        Box::pin(async move {
            Err(ToolError::ToolCallError(
                format!("tool {name} is executed by the orchestrator").into(),
            ))
        })
    }
}
