//! The [GraphQL response](https://spec.graphql.org/October2021/#sec-Response-Format)
//! produced by execution.

use crate::execution::RequestError;
use crate::Name;
use serde::Deserialize;
use serde::Serialize;

/// Any JSON value flowing through execution: arguments, variables, resolver output, response data.
///
/// Strings and map keys are reference-counted [`ByteString`][serde_json_bytes::ByteString]s,
/// so cloning a value is cheap.
pub type JsonValue = serde_json_bytes::Value;

/// A JSON object, keeping insertion order
pub type JsonMap = serde_json_bytes::Map<serde_json_bytes::ByteString, JsonValue>;

/// A [GraphQL response](https://spec.graphql.org/October2021/#sec-Response-Format)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Response {
    // Serialized before `data`: <https://spec.graphql.org/October2021/#note-6f005>
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub errors: Vec<GraphQLError>,

    #[serde(skip_serializing_if = "ResponseData::is_absent")]
    #[serde(default = "ResponseData::absent")]
    pub data: ResponseData,

    #[serde(skip_serializing_if = "JsonMap::is_empty")]
    #[serde(default)]
    pub extensions: JsonMap,
}

/// The `data` entry of a [`Response`]
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Option<JsonMap>")]
pub enum ResponseData {
    /// The root selection set completed, possibly with some null fields
    Object(JsonMap),

    /// A non-null root field failed, so the whole of `data` is `null`
    Null,

    /// Execution never started or its result was discarded: `data` is not serialized at all
    Absent,
}

/// One entry of [`Response::errors`]
///
/// <https://spec.graphql.org/October2021/#sec-Errors.Error-result-format>
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GraphQLError {
    pub message: String,

    /// Where in the document the error comes from
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub locations: Vec<GraphQLLocation>,

    /// Response path of the failed field. Empty for request errors.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub path: Vec<PathElement>,

    /// Copied from [`FieldError::extensions`][crate::FieldError]
    #[serde(skip_serializing_if = "JsonMap::is_empty")]
    #[serde(default)]
    pub extensions: JsonMap,
}

/// A 1-based line and column in a source file
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GraphQLLocation {
    pub line: usize,
    /// Counts Unicode scalar values, not bytes
    pub column: usize,
}

/// An element of [`GraphQLError::path`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathElement {
    /// A response key: the alias of a field, or its name
    Field(Name),

    ListIndex(usize),
}

impl Response {
    /// A response with errors and no `data` entry
    pub fn from_request_error(error: &RequestError) -> Self {
        Self {
            errors: error.to_graphql_errors(),
            data: ResponseData::Absent,
            extensions: JsonMap::new(),
        }
    }

    /// Returns the data object, if execution produced one
    pub fn data_object(&self) -> Option<&JsonMap> {
        match &self.data {
            ResponseData::Object(map) => Some(map),
            ResponseData::Null | ResponseData::Absent => None,
        }
    }
}

impl From<RequestError> for Response {
    fn from(error: RequestError) -> Self {
        Self::from_request_error(&error)
    }
}

impl GraphQLError {
    pub fn new(message: impl Into<String>, location: Option<GraphQLLocation>) -> Self {
        Self {
            message: message.into(),
            locations: location.into_iter().collect(),
            path: Vec::new(),
            extensions: JsonMap::new(),
        }
    }
}

impl std::fmt::Display for GraphQLError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(location) = self.locations.first() {
            write!(f, "{}:{}: ", location.line, location.column)?;
        }
        f.write_str(&self.message)
    }
}

impl std::fmt::Display for PathElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathElement::Field(name) => f.write_str(name),
            PathElement::ListIndex(index) => write!(f, "{index}"),
        }
    }
}

impl ResponseData {
    /// For serde `skip_serializing_if`
    fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// For serde `default`
    fn absent() -> Self {
        Self::Absent
    }
}

impl Serialize for ResponseData {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            ResponseData::Absent => Err(serde::ser::Error::custom(
                "absent response data must be skipped",
            )),
            ResponseData::Null => serializer.serialize_unit(),
            ResponseData::Object(map) => map.serialize(serializer),
        }
    }
}

impl From<Option<JsonMap>> for ResponseData {
    fn from(value: Option<JsonMap>) -> Self {
        match value {
            Some(data) => Self::Object(data),
            None => Self::Null,
        }
    }
}
