//! Typed response schema tree
//!
//! Schema documents arrive from the endpoint store as opaque JSON. They are
//! converted into [`SchemaNode`] once per request so that every node carries
//! exactly the fields that make sense for its type.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

use super::error::MockError;

/// Nesting limit applied when no explicit limit is configured
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Largest repeat count accepted in a `{n}` / `{n,m}` pattern quantifier
pub const MAX_PATTERN_REPEAT: usize = 256;

/// Integer bounds must lie strictly inside this magnitude (2^63)
const INT_BOUND_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// One node of a response schema tree
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    pub name: String,
    pub required: bool,
    pub description: Option<String>,
    /// Recorded example value, used for string nodes when enabled
    pub example: Option<String>,
    pub mock: Option<MockOverride>,
    pub kind: SchemaKind,
}

/// Type-specific part of a schema node
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind {
    Object { children: Vec<SchemaNode> },
    Array { element: Box<SchemaNode> },
    String,
    Int,
    Float,
    Boolean,
}

impl SchemaKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Object { .. } => "object",
            Self::Array { .. } => "array",
            Self::String => "string",
            Self::Int => "int",
            Self::Float => "float",
            Self::Boolean => "boolean",
        }
    }
}

/// Per-node generation hints
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct MockOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faker: Option<FakerKind>,
    /// Lower bound for numeric nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Upper bound for numeric nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Character pattern for string nodes (`#` digit, `?` letter, `\d`, `[a-z]{3}`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Fixed set of string values to pick from
    #[serde(default, rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
}

/// Faker generators available for string nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FakerKind {
    // Personal
    FirstName,
    LastName,
    FullName,
    Username,

    // Contact
    Email,
    Phone,

    // Address
    StreetAddress,
    City,
    State,
    Country,
    PostalCode,

    // Text
    Word,
    Sentence,
    Paragraph,

    // Identifiers and time
    Uuid,
    DateTime,
}

impl SchemaNode {
    pub fn new(name: impl Into<String>, kind: SchemaKind) -> Self {
        Self {
            name: name.into(),
            required: false,
            description: None,
            example: None,
            mock: None,
            kind,
        }
    }

    pub fn object(name: impl Into<String>, children: Vec<SchemaNode>) -> Self {
        Self::new(name, SchemaKind::Object { children })
    }

    pub fn array(name: impl Into<String>, element: SchemaNode) -> Self {
        Self::new(
            name,
            SchemaKind::Array {
                element: Box::new(element),
            },
        )
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, SchemaKind::String)
    }

    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, SchemaKind::Int)
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, SchemaKind::Float)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, SchemaKind::Boolean)
    }

    /// Mark the node as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }

    pub fn with_mock(mut self, mock: MockOverride) -> Self {
        self.mock = Some(mock);
        self
    }

    /// Convert a stored schema document into a typed tree.
    ///
    /// Fails on the first unsupported type, array without `element`,
    /// duplicate sibling name or node nested deeper than `max_depth`.
    pub fn from_value(value: &Value, max_depth: usize) -> Result<Self, MockError> {
        Self::parse(value, 0, max_depth, None)
    }

    fn parse(
        value: &Value,
        depth: usize,
        max_depth: usize,
        parent: Option<&str>,
    ) -> Result<Self, MockError> {
        let obj = value.as_object().ok_or_else(|| MockError::InvalidSchema {
            path: parent.unwrap_or("root").to_string(),
            reason: "schema node must be a JSON object".to_string(),
        })?;

        let name = optional_string(obj, "name", parent.unwrap_or("root"))?.unwrap_or_default();
        let path = match parent {
            None if name.is_empty() => "root".to_string(),
            None => name.clone(),
            Some(p) if name.is_empty() => p.to_string(),
            Some(p) => format!("{}.{}", p, name),
        };

        if depth > max_depth {
            return Err(MockError::DepthExceeded {
                limit: max_depth,
                path,
            });
        }

        let type_name = match obj.get("type") {
            Some(Value::String(t)) => t.to_ascii_lowercase(),
            Some(other) => {
                return Err(MockError::UnknownNodeType {
                    node_type: other.to_string(),
                    path,
                })
            }
            None => {
                return Err(MockError::UnknownNodeType {
                    node_type: "<missing>".to_string(),
                    path,
                })
            }
        };

        let required = match obj.get("required") {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(_) => {
                return Err(MockError::InvalidSchema {
                    path,
                    reason: "'required' must be a boolean".to_string(),
                })
            }
        };

        let description = optional_string(obj, "description", &path)?;

        let example = match obj.get("example") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(v @ (Value::Number(_) | Value::Bool(_))) => Some(v.to_string()),
            Some(_) => {
                return Err(MockError::InvalidSchema {
                    path,
                    reason: "'example' must be a scalar value".to_string(),
                })
            }
        };

        let mock = match obj.get("mock") {
            None | Some(Value::Null) => None,
            Some(v) => {
                let rule: MockOverride =
                    serde_json::from_value(v.clone()).map_err(|e| MockError::InvalidSchema {
                        path: path.clone(),
                        reason: format!("invalid 'mock' override: {}", e),
                    })?;
                if let (Some(min), Some(max)) = (rule.min, rule.max) {
                    if min > max {
                        return Err(MockError::InvalidSchema {
                            path,
                            reason: format!("mock range min {} exceeds max {}", min, max),
                        });
                    }
                }
                if let Some(pattern) = &rule.pattern {
                    check_pattern(pattern).map_err(|reason| MockError::InvalidSchema {
                        path: path.clone(),
                        reason,
                    })?;
                }
                Some(rule)
            }
        };

        let kind = match type_name.as_str() {
            "object" => {
                let children = match obj.get("children") {
                    None | Some(Value::Null) => Vec::new(),
                    Some(Value::Array(items)) => {
                        let mut seen = HashSet::new();
                        let mut children = Vec::with_capacity(items.len());
                        for item in items {
                            let child = Self::parse(item, depth + 1, max_depth, Some(&path))?;
                            if !seen.insert(child.name.clone()) {
                                return Err(MockError::DuplicateChildName {
                                    name: child.name,
                                    path,
                                });
                            }
                            children.push(child);
                        }
                        children
                    }
                    Some(_) => {
                        return Err(MockError::InvalidSchema {
                            path,
                            reason: "'children' must be an array".to_string(),
                        })
                    }
                };
                SchemaKind::Object { children }
            }
            "array" => match obj.get("element") {
                None | Some(Value::Null) => return Err(MockError::MissingElementSchema { path }),
                Some(element) => {
                    let element_path = format!("{}[]", path);
                    let element = Self::parse(element, depth + 1, max_depth, Some(&element_path))?;
                    SchemaKind::Array {
                        element: Box::new(element),
                    }
                }
            },
            "string" => SchemaKind::String,
            "int" | "integer" => SchemaKind::Int,
            "float" | "number" | "double" => SchemaKind::Float,
            "boolean" | "bool" => SchemaKind::Boolean,
            _ => {
                return Err(MockError::UnknownNodeType {
                    node_type: type_name,
                    path,
                })
            }
        };

        if let Some(rule) = &mock {
            check_bounds(rule, &kind).map_err(|reason| MockError::InvalidSchema {
                path: path.clone(),
                reason,
            })?;
        }

        Ok(Self {
            name,
            required,
            description,
            example,
            mock,
            kind,
        })
    }
}

fn check_bounds(rule: &MockOverride, kind: &SchemaKind) -> Result<(), String> {
    match kind {
        SchemaKind::Int => {
            for bound in [rule.min, rule.max].into_iter().flatten() {
                if bound.abs() >= INT_BOUND_LIMIT {
                    return Err(format!("mock bound {} does not fit a 64-bit integer", bound));
                }
            }
            Ok(())
        }
        SchemaKind::Float => {
            let min = rule.min.unwrap_or(0.0);
            let max = rule.max.unwrap_or(min.max(1000.0));
            if !(max - min).is_finite() {
                return Err(format!("mock range {}..{} is too wide", min, max));
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Reject quantifiers that would repeat a character more than [`MAX_PATTERN_REPEAT`] times
fn check_pattern(pattern: &str) -> Result<(), String> {
    let mut chars = pattern.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                chars.next();
            }
            '[' => {
                for c in chars.by_ref() {
                    if c == ']' {
                        break;
                    }
                }
            }
            '{' => {
                let quantifier: String = chars.by_ref().take_while(|c| *c != '}').collect();
                for part in quantifier.split(',') {
                    let part = part.trim();
                    let too_large = !part.is_empty()
                        && part.chars().all(|c| c.is_ascii_digit())
                        && part.parse::<usize>().map_or(true, |n| n > MAX_PATTERN_REPEAT);
                    if too_large {
                        return Err(format!(
                            "pattern quantifier {{{}}} exceeds {} repeats",
                            quantifier, MAX_PATTERN_REPEAT
                        ));
                    }
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn optional_string(
    obj: &Map<String, Value>,
    field: &str,
    path: &str,
) -> Result<Option<String>, MockError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(MockError::InvalidSchema {
            path: path.to_string(),
            reason: format!("'{}' must be a string", field),
        }),
    }
}
