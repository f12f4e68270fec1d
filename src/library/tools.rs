// Tool definitions - OpenAI-style function tools offered to profiles

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

use super::LibraryError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolFunction {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "empty_object")]
    pub parameters: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolDefinition {
    #[serde(rename = "type", default = "function_kind")]
    pub kind: String,
    pub function: ToolFunction,
}

/// List row for the tools view
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ToolRow {
    pub index: usize,
    pub name: String,
    pub description: String,
    /// Pretty JSON, ready to load into the editor
    pub parameters: String,
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

fn function_kind() -> String {
    "function".to_string()
}

impl ToolDefinition {
    pub fn new(name: &str, description: &str, parameters: Value) -> Self {
        Self {
            kind: function_kind(),
            function: ToolFunction {
                name: name.to_string(),
                description: description.to_string(),
                parameters,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.function.name
    }
}

/// Create a tool or, with `overwrite`, replace the description and
/// parameters of the tool with the same name.
///
/// Blank parameters mean `{}`.
#[must_use = "this returns a Result that should be handled"]
pub fn save_tool(
    tools: &mut Vec<ToolDefinition>,
    name: &str,
    description: &str,
    parameters_json: &str,
    overwrite: bool,
) -> Result<(), LibraryError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LibraryError::EmptyToolName);
    }

    let parameters = parse_parameters(parameters_json)?;
    let description = description.trim();

    match tools.iter_mut().find(|t| t.function.name == name) {
        Some(_) if !overwrite => Err(LibraryError::ToolExists(name.to_string())),
        Some(existing) => {
            existing.function.description = description.to_string();
            existing.function.parameters = parameters;
            crate::info!("Updated tool {:?}", name);
            Ok(())
        }
        None => {
            tools.push(ToolDefinition::new(name, description, parameters));
            crate::info!("Added tool {:?}", name);
            Ok(())
        }
    }
}

fn parse_parameters(text: &str) -> Result<Value, LibraryError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(empty_object());
    }
    match serde_json::from_str::<Value>(text) {
        Ok(value @ Value::Object(_)) => Ok(value),
        Ok(_) => Err(LibraryError::InvalidToolParameters(
            "parameters must be a JSON object".to_string(),
        )),
        Err(e) => Err(LibraryError::InvalidToolParameters(e.to_string())),
    }
}

#[must_use = "this returns a Result that should be handled"]
pub fn delete_tool(tools: &mut Vec<ToolDefinition>, index: usize) -> Result<ToolDefinition, LibraryError> {
    if index >= tools.len() {
        return Err(LibraryError::IndexOutOfRange(index));
    }
    Ok(tools.remove(index))
}

/// Pretty JSON list of the tools named in `names`, in library order.
/// Empty selection yields an empty string so the profile field stays unset.
pub fn select_tools(tools: &[ToolDefinition], names: &[String]) -> String {
    let wanted: HashSet<&str> = names.iter().map(String::as_str).collect();
    let selected: Vec<&ToolDefinition> = tools
        .iter()
        .filter(|t| wanted.contains(t.name()))
        .collect();
    if selected.is_empty() {
        return String::new();
    }
    serde_json::to_string_pretty(&selected).unwrap_or_default()
}

/// Names of tools already present in a profile's `tools` field text.
/// Unparseable text selects nothing.
pub fn selected_names(current: &str) -> Vec<String> {
    let Ok(Value::Array(items)) = serde_json::from_str::<Value>(current.trim()) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| item.pointer("/function/name").and_then(Value::as_str))
        .map(str::to_string)
        .collect()
}

pub fn rows(tools: &[ToolDefinition]) -> Vec<ToolRow> {
    tools
        .iter()
        .enumerate()
        .map(|(index, tool)| ToolRow {
            index,
            name: tool.function.name.clone(),
            description: tool.function.description.clone(),
            parameters: serde_json::to_string_pretty(&tool.function.parameters).unwrap_or_default(),
        })
        .collect()
}

#[cfg(test)]
#[path = "tools_test.rs"]
mod tests;
