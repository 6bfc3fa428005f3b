//! Syntax-level building blocks shared by the [`schema`][crate::schema]
//! and [`executable`][crate::executable] representations.

use crate::response::JsonValue;
use crate::Name;
use std::fmt;

/// A type reference: a named type wrapped in any number of list and non-null markers
///
/// Named references are resolved through [`Schema::types`][crate::Schema::types]
/// rather than pointing to the definition, which lets types refer to each other
/// (or themselves) without reference cycles.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub enum Type {
    /// A `NamedType`
    Named(Name),
    /// A `NamedType!`
    NonNullNamed(Name),
    /// A `[Type]`
    List(Box<Type>),
    /// A `[Type]!`
    NonNullList(Box<Type>),
}

/// Kind of operation
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
pub enum OperationType {
    Query,
    Mutation,
    Subscription,
}

/// A literal value from a document, possibly referencing variables
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Enum(Name),
    Variable(Name),
    String(String),
    /// The source text of an integer literal, parsed on demand
    Int(IntValue),
    /// The source text of a float literal, parsed on demand
    Float(FloatValue),
    Boolean(bool),
    List(Vec<Value>),
    Object(Vec<(Name, Value)>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntValue(String);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FloatValue(String);

/// A directive applied to an executable node, such as `@skip(if: $foo)`
#[derive(Clone, Debug, PartialEq)]
pub struct Directive {
    pub name: Name,
    pub arguments: Vec<Argument>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Argument {
    pub name: Name,
    pub value: Value,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DirectiveList(pub Vec<Directive>);

impl Type {
    /// Returns the inner named type, after unwrapping any non-null or list markers.
    pub fn inner_named_type(&self) -> &Name {
        match self {
            Type::Named(name) | Type::NonNullNamed(name) => name,
            Type::List(inner) | Type::NonNullList(inner) => inner.inner_named_type(),
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, Type::NonNullNamed(_) | Type::NonNullList(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Type::List(_) | Type::NonNullList(_))
    }

    /// Returns this type with the outermost non-null marker removed
    pub fn nullable(&self) -> Type {
        match self {
            Type::Named(name) | Type::NonNullNamed(name) => Type::Named(name.clone()),
            Type::List(inner) | Type::NonNullList(inner) => Type::List(inner.clone()),
        }
    }

    /// Returns the item type of a list type, or `None` for a named type
    pub fn item_type(&self) -> Option<&Type> {
        match self {
            Type::List(inner) | Type::NonNullList(inner) => Some(inner),
            Type::Named(_) | Type::NonNullNamed(_) => None,
        }
    }

    /// Wrap this type in a list
    pub fn list(self) -> Type {
        Type::List(Box::new(self))
    }

    /// Add a non-null marker, if there isn't one already
    pub fn non_null(self) -> Type {
        match self {
            Type::Named(name) => Type::NonNullNamed(name),
            Type::List(inner) => Type::NonNullList(inner),
            Type::NonNullNamed(_) | Type::NonNullList(_) => self,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Named(name) => write!(f, "{name}"),
            Type::NonNullNamed(name) => write!(f, "{name}!"),
            Type::List(inner) => write!(f, "[{inner}]"),
            Type::NonNullList(inner) => write!(f, "[{inner}]!"),
        }
    }
}

impl OperationType {
    pub fn name(self) -> &'static str {
        match self {
            OperationType::Query => "query",
            OperationType::Mutation => "mutation",
            OperationType::Subscription => "subscription",
        }
    }

    /// Name of the root operation type used when the schema has no `schema` definition
    pub fn default_type_name(self) -> &'static str {
        match self {
            OperationType::Query => "Query",
            OperationType::Mutation => "Mutation",
            OperationType::Subscription => "Subscription",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl IntValue {
    pub fn new_parsed(text: &str) -> Self {
        Self(text.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `None` if the value overflows `i32`
    pub fn try_to_i32(&self) -> Option<i32> {
        self.0.parse().ok()
    }

    /// Converts to `f64`, used when an integer literal is given for a `Float` input
    pub fn try_to_f64(&self) -> Option<f64> {
        self.0.parse::<f64>().ok().filter(|value| value.is_finite())
    }
}

impl FloatValue {
    pub fn new_parsed(text: &str) -> Self {
        Self(text.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `None` if the value overflows to infinity
    pub fn try_to_f64(&self) -> Option<f64> {
        self.0.parse::<f64>().ok().filter(|value| value.is_finite())
    }
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_variable(&self) -> Option<&Name> {
        match self {
            Value::Variable(name) => Some(name),
            _ => None,
        }
    }

    /// Convert a constant value (such as a default value) to JSON,
    /// without coercing it to any type.
    ///
    /// Returns `None` if the value contains a variable or an out of range number.
    pub fn to_json(&self) -> Option<JsonValue> {
        Some(match self {
            Value::Null => JsonValue::Null,
            Value::Enum(value) => value.as_str().into(),
            Value::Variable(_) => return None,
            Value::String(value) => value.as_str().into(),
            Value::Boolean(value) => (*value).into(),
            Value::Int(value) => match value.as_str().parse::<i64>() {
                Ok(int) => int.into(),
                Err(_) => value.try_to_f64()?.into(),
            },
            Value::Float(value) => value.try_to_f64()?.into(),
            Value::List(items) => items
                .iter()
                .map(Value::to_json)
                .collect::<Option<Vec<_>>>()?
                .into(),
            Value::Object(fields) => {
                let mut map = crate::JsonMap::with_capacity(fields.len());
                for (name, value) in fields {
                    map.insert(name.to_byte_string(), value.to_json()?);
                }
                JsonValue::Object(map)
            }
        })
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Enum(name) => write!(f, "{name}"),
            Value::Variable(name) => write!(f, "${name}"),
            Value::String(value) => write!(f, "{value:?}"),
            Value::Int(value) => f.write_str(value.as_str()),
            Value::Float(value) => f.write_str(value.as_str()),
            Value::Boolean(value) => write!(f, "{value}"),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Object(fields) => {
                f.write_str("{")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl Directive {
    pub fn argument_by_name(&self, name: &str) -> Option<&Value> {
        self.arguments
            .iter()
            .find(|argument| argument.name == name)
            .map(|argument| &argument.value)
    }
}

impl DirectiveList {
    pub fn get(&self, name: &str) -> Option<&Directive> {
        self.0.iter().find(|directive| directive.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Directive> {
        self.0.iter()
    }
}
