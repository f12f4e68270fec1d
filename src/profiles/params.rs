// Parameter schema validator - turns free-form profile settings into a typed request payload
//
// Values arrive either as strings (form fields) or as typed JSON (stored profiles).
// Unset, null and blank values are omitted. Out-of-range values are rejected.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keys a settings map may carry that are not sampling parameters
pub const NON_SAMPLING_KEYS: [&str; 2] = ["model", "system_message"];

/// Every sampling parameter the validator understands, in form order
pub const SAMPLING_PARAMETERS: [&str; 22] = [
    "temperature",
    "top_p",
    "top_k",
    "frequency_penalty",
    "presence_penalty",
    "repetition_penalty",
    "min_p",
    "top_a",
    "seed",
    "max_tokens",
    "logit_bias",
    "logprobs",
    "top_logprobs",
    "response_format",
    "structured_outputs",
    "stop",
    "tools",
    "tool_choice",
    "parallel_tool_calls",
    "verbosity",
    "reasoning",
    "include_reasoning",
];

/// A settings value failed validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Parameter Validation Error: {field}: {reason}")]
pub struct ParameterValidationError {
    pub field: String,
    pub reason: String,
}

impl ParameterValidationError {
    fn new(field: &str, reason: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// low / medium / high, used by `verbosity` and `reasoning`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effort {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: ResponseFormatKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormatKind {
    JsonObject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolChoiceFunction {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolChoiceKind {
    Function,
}

/// `"auto"`-style mode string, or a specific function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolChoice {
    Mode(String),
    Function {
        #[serde(rename = "type")]
        kind: ToolChoiceKind,
        function: ToolChoiceFunction,
    },
}

/// Validated sampling parameters, serialized straight into the request body
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SamplingParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repetition_penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_a: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logit_bias: Option<IndexMap<String, f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logprobs: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_logprobs: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured_outputs: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Map<String, Value>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel_tool_calls: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbosity: Option<Effort>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<Effort>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_reasoning: Option<bool>,
}

impl SamplingParameters {
    /// Set parameters as a JSON object, ready to merge into a request body
    pub fn to_payload(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

/// Validate a settings map. Non-sampling keys are skipped, unknown keys ignored.
pub fn validate_parameters(
    values: &Map<String, Value>,
) -> Result<SamplingParameters, ParameterValidationError> {
    for key in values.keys() {
        let known = SAMPLING_PARAMETERS.contains(&key.as_str())
            || NON_SAMPLING_KEYS.contains(&key.as_str());
        if !known {
            crate::debug!("Ignoring unknown parameter '{}'", key);
        }
    }

    let fields = FieldReader { values };
    Ok(SamplingParameters {
        temperature: fields.float("temperature", 0.0, 2.0)?,
        top_p: fields.float("top_p", 0.0, 1.0)?,
        top_k: fields.integer("top_k", Some(0), None)?,
        frequency_penalty: fields.float("frequency_penalty", -2.0, 2.0)?,
        presence_penalty: fields.float("presence_penalty", -2.0, 2.0)?,
        repetition_penalty: fields.float("repetition_penalty", 0.0, 2.0)?,
        min_p: fields.float("min_p", 0.0, 1.0)?,
        top_a: fields.float("top_a", 0.0, 1.0)?,
        seed: fields.integer("seed", None, None)?,
        max_tokens: fields.integer("max_tokens", Some(1), None)?,
        logit_bias: fields.json_collection("logit_bias", |m: &IndexMap<String, f64>| m.is_empty())?,
        logprobs: fields.boolean("logprobs")?,
        top_logprobs: fields.integer("top_logprobs", Some(0), Some(20))?,
        response_format: fields.json("response_format")?,
        structured_outputs: fields.boolean("structured_outputs")?,
        stop: fields.json_collection("stop", |v: &Vec<String>| v.is_empty())?,
        tools: fields.json_collection("tools", |v: &Vec<Map<String, Value>>| v.is_empty())?,
        tool_choice: fields.tool_choice("tool_choice")?,
        parallel_tool_calls: fields.boolean("parallel_tool_calls")?,
        verbosity: fields.effort("verbosity")?,
        reasoning: fields.effort("reasoning")?,
        include_reasoning: fields.boolean("include_reasoning")?,
    })
}

/// Reads one field at a time, treating null and blank strings as unset
struct FieldReader<'a> {
    values: &'a Map<String, Value>,
}

impl FieldReader<'_> {
    fn get(&self, field: &str) -> Option<&Value> {
        match self.values.get(field)? {
            Value::Null => None,
            Value::String(s) if s.trim().is_empty() => None,
            value => Some(value),
        }
    }

    fn float(&self, field: &str, min: f64, max: f64) -> Result<Option<f64>, ParameterValidationError> {
        let Some(value) = self.get(field) else {
            return Ok(None);
        };
        let number = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
        .filter(|n| n.is_finite())
        .ok_or_else(|| ParameterValidationError::new(field, "must be a number"))?;

        if number < min || number > max {
            return Err(ParameterValidationError::new(
                field,
                format!("must be between {} and {}", min, max),
            ));
        }
        Ok(Some(number))
    }

    fn integer(
        &self,
        field: &str,
        min: Option<i64>,
        max: Option<i64>,
    ) -> Result<Option<i64>, ParameterValidationError> {
        let Some(value) = self.get(field) else {
            return Ok(None);
        };
        let number = match value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
        .ok_or_else(|| ParameterValidationError::new(field, "must be an integer"))?;

        if let Some(min) = min.filter(|min| number < *min) {
            return Err(ParameterValidationError::new(
                field,
                format!("must be at least {}", min),
            ));
        }
        if let Some(max) = max.filter(|max| number > *max) {
            return Err(ParameterValidationError::new(
                field,
                format!("must be at most {}", max),
            ));
        }
        Ok(Some(number))
    }

    fn boolean(&self, field: &str) -> Result<Option<bool>, ParameterValidationError> {
        let Some(value) = self.get(field) else {
            return Ok(None);
        };
        let flag = match value {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => match n.as_i64() {
                Some(0) => Some(false),
                Some(1) => Some(true),
                _ => None,
            },
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Some(true),
                "false" | "0" | "no" | "off" => Some(false),
                _ => None,
            },
            _ => None,
        };
        flag.map(Some)
            .ok_or_else(|| ParameterValidationError::new(field, "must be true or false"))
    }

    fn effort(&self, field: &str) -> Result<Option<Effort>, ParameterValidationError> {
        let Some(value) = self.get(field) else {
            return Ok(None);
        };
        let level = value
            .as_str()
            .and_then(|s| match s.trim().to_ascii_lowercase().as_str() {
                "low" => Some(Effort::Low),
                "medium" => Some(Effort::Medium),
                "high" => Some(Effort::High),
                _ => None,
            });
        level
            .map(Some)
            .ok_or_else(|| ParameterValidationError::new(field, "must be one of low, medium, high"))
    }

    /// Parse a JSON field. String values are parsed as JSON text first.
    fn json<T: DeserializeOwned>(&self, field: &str) -> Result<Option<T>, ParameterValidationError> {
        let Some(value) = self.get(field) else {
            return Ok(None);
        };
        let parsed = match value {
            Value::String(text) => serde_json::from_str::<Value>(text.trim())
                .map_err(|e| ParameterValidationError::new(field, format!("invalid JSON: {}", e)))?,
            other => other.clone(),
        };
        serde_json::from_value(parsed)
            .map(Some)
            .map_err(|e| ParameterValidationError::new(field, format!("unexpected shape: {}", e)))
    }

    /// Like `json`, but an empty list or object counts as unset
    fn json_collection<T: DeserializeOwned>(
        &self,
        field: &str,
        is_empty: impl Fn(&T) -> bool,
    ) -> Result<Option<T>, ParameterValidationError> {
        Ok(self.json::<T>(field)?.filter(|value| !is_empty(value)))
    }

    /// Plain strings are modes ("auto", "none", ...); objects name a function
    fn tool_choice(&self, field: &str) -> Result<Option<ToolChoice>, ParameterValidationError> {
        match self.get(field) {
            Some(Value::String(text)) if !text.trim_start().starts_with('{') => {
                Ok(Some(ToolChoice::Mode(text.trim().to_string())))
            }
            Some(_) => match self.json::<ToolChoice>(field)? {
                Some(ToolChoice::Mode(_)) => Err(ParameterValidationError::new(
                    field,
                    "must be a mode string or a function object",
                )),
                choice => Ok(choice),
            },
            None => Ok(None),
        }
    }
}

#[cfg(test)]
#[path = "params_test.rs"]
mod tests;
