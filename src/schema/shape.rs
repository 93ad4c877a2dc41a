// Declarative shapes and the validator that walks them

use serde_json::Value;
use std::fmt;

/// Expected structure of a JSON value
///
/// Unknown object keys are ignored; only the listed fields are checked.
#[derive(Debug, Clone)]
pub enum Shape {
    String,
    Number,
    Boolean,
    /// Accepts any value, including `null`
    Any,
    Array(Box<Shape>),
    /// Fixed-length array with one shape per position
    Tuple(Vec<Shape>),
    Object(Vec<Field>),
    /// Deferred shape, used for self-referential trees
    Lazy(fn() -> Shape),
}

impl Shape {
    pub fn array(item: Shape) -> Self {
        Shape::Array(Box::new(item))
    }

    pub fn object(fields: impl IntoIterator<Item = Field>) -> Self {
        Shape::Object(fields.into_iter().collect())
    }

    fn expected(&self) -> &'static str {
        match self {
            Shape::String => "string",
            Shape::Number => "number",
            Shape::Boolean => "boolean",
            Shape::Any => "any",
            Shape::Array(_) | Shape::Tuple(_) => "array",
            Shape::Object(_) => "object",
            Shape::Lazy(_) => "value",
        }
    }
}

/// A named object member
#[derive(Debug, Clone)]
pub struct Field {
    pub name: &'static str,
    pub shape: Shape,
    pub optional: bool,
}

impl Field {
    pub fn required(name: &'static str, shape: Shape) -> Self {
        Self {
            name,
            shape,
            optional: false,
        }
    }

    /// May be missing; when present it must still match (`null` does not)
    pub fn optional(name: &'static str, shape: Shape) -> Self {
        Self {
            name,
            shape,
            optional: true,
        }
    }
}

/// One failed check, tagged with the dotted path to the offending value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Every violation found in one value, in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<Violation>);

impl ValidationErrors {
    pub fn violations(&self) -> &[Violation] {
        &self.0
    }

    /// Whether any violation points at `path`
    pub fn has_path(&self, path: &str) -> bool {
        self.0.iter().any(|v| v.path == path)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        f.write_str(&parts.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

const ROOT_PATH: &str = "(root)";

/// Check `value` against `shape`, collecting every violation
pub fn validate(value: &Value, shape: &Shape) -> Result<(), ValidationErrors> {
    let mut path = Vec::new();
    let mut violations = Vec::new();
    check(value, shape, &mut path, &mut violations);

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(violations))
    }
}

fn render(path: &[String]) -> String {
    if path.is_empty() {
        ROOT_PATH.to_string()
    } else {
        path.join(".")
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn mismatch(value: &Value, shape: &Shape, path: &[String], out: &mut Vec<Violation>) {
    out.push(Violation {
        path: render(path),
        message: format!("Expected {}, received {}", shape.expected(), kind(value)),
    });
}

fn check(value: &Value, shape: &Shape, path: &mut Vec<String>, out: &mut Vec<Violation>) {
    match (shape, value) {
        (Shape::Any, _)
        | (Shape::String, Value::String(_))
        | (Shape::Number, Value::Number(_))
        | (Shape::Boolean, Value::Bool(_)) => {}

        (Shape::Lazy(resolve), _) => check(value, &resolve(), path, out),

        (Shape::Array(item), Value::Array(items)) => {
            for (i, element) in items.iter().enumerate() {
                path.push(i.to_string());
                check(element, item, path, out);
                path.pop();
            }
        }

        (Shape::Tuple(slots), Value::Array(items)) => {
            if items.len() != slots.len() {
                out.push(Violation {
                    path: render(path),
                    message: format!(
                        "Expected array of length {}, received length {}",
                        slots.len(),
                        items.len()
                    ),
                });
                return;
            }
            for (i, (element, slot)) in items.iter().zip(slots).enumerate() {
                path.push(i.to_string());
                check(element, slot, path, out);
                path.pop();
            }
        }

        (Shape::Object(fields), Value::Object(map)) => {
            for field in fields {
                path.push(field.name.to_string());
                match map.get(field.name) {
                    Some(member) => check(member, &field.shape, path, out),
                    None if field.optional => {}
                    None => out.push(Violation {
                        path: render(path),
                        message: "Required".to_string(),
                    }),
                }
                path.pop();
            }
        }

        _ => mismatch(value, shape, path, out),
    }
}
