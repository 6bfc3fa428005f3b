//! Executing a GraphQL request against a [`Schema`] and a set of [`Resolvers`]
//!
//! Build an [`Execution`], then call [`execute`][Execution::execute] for queries and
//! mutations, or [`subscribe`][Execution::subscribe] for subscriptions.
//!
//! Field errors do not fail execution: they are collected into [`Response::errors`]
//! and null is [propagated] to the closest nullable field.
//! Problems with the request as a whole, detected before any resolver runs,
//! are returned as a [`RequestError`] instead.
//!
//! [propagated]: https://spec.graphql.org/October2021/#sec-Handling-Field-Errors

use crate::ast::OperationType;
use crate::config::ExecutionConfig;
use crate::executable::ExecutableDocument;
use crate::executable::GetOperationError;
use crate::executable::Operation;
use crate::response::GraphQLError;
use crate::response::JsonMap;
use crate::response::Response;
use crate::response::ResponseData;
use crate::schema::ObjectType;
use crate::validation::Validator;
use crate::Schema;
use futures::stream::BoxStream;
use std::any::Any;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

mod collect_fields;
mod engine;
mod input_coercion;
mod resolver;
mod result_coercion;
mod subscription;

pub(crate) use self::collect_fields::collect_fields;
pub use self::input_coercion::coerce_variable_values;
pub use self::input_coercion::InputCoercionError;
pub use self::resolver::EventStream;
pub use self::resolver::FieldError;
pub use self::resolver::ObjectValue;
pub use self::resolver::ResolveInfo;
pub use self::resolver::ResolvedValue;
pub use self::resolver::Resolver;
pub use self::resolver::Resolvers;
pub use self::resolver::ScalarSerializer;
pub use self::resolver::Subscriber;
pub use self::resolver::SyncResolver;
pub use self::resolver::TypeResolver;

/// Builder for executing one request
///
/// ```
/// use graphql_executor::{ExecutableDocument, Execution, ResolvedValue, Resolvers, Schema};
///
/// let schema = Schema::parse("type Query { hello: String }", "schema.graphql").unwrap();
/// let document = ExecutableDocument::parse("{ hello }", "query.graphql").unwrap();
/// let resolvers = Resolvers::new().sync_field("Query", "hello", |_info| {
///     Ok(ResolvedValue::leaf("world"))
/// });
/// let response = futures::executor::block_on(
///     Execution::new(&schema, &document, &resolvers).execute(),
/// )
/// .unwrap();
/// assert_eq!(
///     serde_json::to_string(&response).unwrap(),
///     r#"{"data":{"hello":"world"}}"#
/// );
/// ```
pub struct Execution<'a> {
    schema: &'a Schema,
    document: &'a ExecutableDocument,
    resolvers: &'a Resolvers,
    operation_name: Option<&'a str>,
    variable_values: Option<VariableValues<'a>>,
    root_value: Option<ObjectValue>,
    context_data: Option<Arc<dyn Any + Send + Sync>>,
    cancellation_token: CancellationToken,
    config: ExecutionConfig,
    validator: Option<&'a Validator>,
}

#[derive(Clone, Copy)]
enum VariableValues<'a> {
    Raw(&'a JsonMap),
    Coerced(&'a JsonMap),
}

/// A request error: execution did not start, or its result was discarded
///
/// <https://spec.graphql.org/October2021/#sec-Errors.Request-errors>
#[derive(Debug, Clone, thiserror::Error)]
pub enum RequestError {
    #[error(transparent)]
    GetOperation(#[from] GetOperationError),

    #[error("the document failed validation with {} error(s)", .errors.len())]
    Validation { errors: Vec<GraphQLError> },

    #[error(transparent)]
    InputCoercion(#[from] InputCoercionError),

    #[error("the schema has no root operation type for {0} operations")]
    NoRootOperationType(OperationType),

    #[error("subscribe requires a subscription operation, found a {0} operation")]
    NotASubscription(OperationType),

    /// The subscriber of the root field failed to create the event stream
    #[error("{}", .0.message)]
    SubscriptionSource(GraphQLError),

    #[error("execution was cancelled")]
    Cancelled,
}

/// Everything one execution of an operation needs, after the request was checked
pub(crate) struct PreparedRequest<'a> {
    pub(crate) schema: &'a Schema,
    pub(crate) document: &'a ExecutableDocument,
    pub(crate) operation: &'a Operation,
    pub(crate) root_type: &'a ObjectType,
    pub(crate) resolvers: &'a Resolvers,
    pub(crate) variable_values: JsonMap,
    pub(crate) config: ExecutionConfig,
    pub(crate) cancellation_token: CancellationToken,
    pub(crate) context_data: Option<Arc<dyn Any + Send + Sync>>,
}

impl<'a> Execution<'a> {
    /// Create a new builder for executing `document` against `schema`
    pub fn new(schema: &'a Schema, document: &'a ExecutableDocument, resolvers: &'a Resolvers) -> Self {
        Self {
            schema,
            document,
            resolvers,
            operation_name: None,
            variable_values: None,
            root_value: None,
            context_data: None,
            cancellation_token: CancellationToken::new(),
            config: ExecutionConfig::default(),
            validator: None,
        }
    }

    /// Sets the name of the operation to execute.
    ///
    /// If not called, the document is expected to contain exactly one operation.
    pub fn operation_name(mut self, operation_name: &'a str) -> Self {
        self.operation_name = Some(operation_name);
        self
    }

    /// Provide values of the request’s variables.
    ///
    /// Mutually exclusive with [`coerced_variable_values`][Self::coerced_variable_values].
    ///
    /// If neither is used, an empty map is assumed.
    pub fn raw_variable_values(mut self, variable_values: &'a JsonMap) -> Self {
        assert!(
            self.variable_values.is_none(),
            "variable values already provided"
        );
        self.variable_values = Some(VariableValues::Raw(variable_values));
        self
    }

    /// Provide values of the request’s variables,
    /// having already gone through [`coerce_variable_values`].
    ///
    /// Mutually exclusive with [`raw_variable_values`][Self::raw_variable_values].
    pub fn coerced_variable_values(mut self, variable_values: &'a JsonMap) -> Self {
        assert!(
            self.variable_values.is_none(),
            "variable values already provided"
        );
        self.variable_values = Some(VariableValues::Coerced(variable_values));
        self
    }

    /// The parent value of root fields.
    /// Defaults to an empty JSON object.
    pub fn root_value(mut self, root_value: ObjectValue) -> Self {
        self.root_value = Some(root_value);
        self
    }

    /// Request-scoped data, available to resolvers through [`ResolveInfo::context_data`]
    pub fn context_data<T: Any + Send + Sync>(mut self, context_data: T) -> Self {
        self.context_data = Some(Arc::new(context_data));
        self
    }

    /// Cancelling this token aborts execution with [`RequestError::Cancelled`],
    /// or ends a subscription stream.
    pub fn cancellation_token(mut self, cancellation_token: CancellationToken) -> Self {
        self.cancellation_token = cancellation_token;
        self
    }

    pub fn config(mut self, config: ExecutionConfig) -> Self {
        self.config = config;
        self
    }

    /// Use these validation rules instead of [`Validator::new`]’s defaults
    pub fn validator(mut self, validator: &'a Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Execute a query or mutation operation.
    ///
    /// A subscription operation executes once, against the root value.
    pub async fn execute(&self) -> Result<Response, RequestError> {
        let request = self.prepare()?;
        let span = tracing::debug_span!(
            "graphql.execute",
            operation.name = request.operation.name.as_ref().map(|name| name.as_str()),
            operation.kind = %request.operation.operation_type,
        );
        let root_value = self
            .root_value
            .clone()
            .unwrap_or_else(|| ObjectValue::json(JsonMap::new()));
        let response = request.execute_root(&root_value).instrument(span).await;
        if self.cancellation_token.is_cancelled() {
            return Err(RequestError::Cancelled);
        }
        Ok(response)
    }

    /// Execute a subscription operation.
    ///
    /// Each event from the root field’s [`Subscriber`] becomes the root value
    /// of an independent execution of the operation, producing one response.
    ///
    /// <https://spec.graphql.org/October2021/#Subscribe()>
    pub async fn subscribe(&self) -> Result<BoxStream<'a, Response>, RequestError> {
        let request = self.prepare()?;
        if !request.operation.is_subscription() {
            return Err(RequestError::NotASubscription(
                request.operation.operation_type,
            ));
        }
        let root_value = self
            .root_value
            .clone()
            .unwrap_or_else(|| ObjectValue::json(JsonMap::new()));
        subscription::subscribe(request, root_value).await
    }

    /// Select the operation, validate, and coerce variables
    fn prepare(&self) -> Result<PreparedRequest<'a>, RequestError> {
        let operation = self.document.get_operation(self.operation_name)?;
        let empty = JsonMap::new();
        let raw_variable_values = match self.variable_values {
            Some(VariableValues::Raw(values) | VariableValues::Coerced(values)) => values,
            None => &empty,
        };
        if self.config.validate {
            let default_validator;
            let validator = match self.validator {
                Some(validator) => validator,
                None => {
                    default_validator = Validator::new();
                    &default_validator
                }
            };
            let result = validator.validate(self.schema, self.document, raw_variable_values);
            if !result.is_valid() {
                tracing::debug!(errors = result.errors.len(), "validation failed");
                return Err(RequestError::Validation {
                    errors: result.errors,
                });
            }
        }
        let root_type = operation
            .object_type(self.schema)
            .and_then(|name| self.schema.get_object(name))
            .ok_or(RequestError::NoRootOperationType(operation.operation_type))?;
        let variable_values = match self.variable_values {
            Some(VariableValues::Coerced(values)) => values.clone(),
            Some(VariableValues::Raw(_)) | None => coerce_variable_values(
                self.schema,
                operation,
                raw_variable_values,
                self.config.closed_input_objects,
            )?,
        };
        Ok(PreparedRequest {
            schema: self.schema,
            document: self.document,
            operation,
            root_type,
            resolvers: self.resolvers,
            variable_values,
            config: self.config.clone(),
            cancellation_token: self.cancellation_token.clone(),
            context_data: self.context_data.clone(),
        })
    }
}

impl<'a> PreparedRequest<'a> {
    pub(crate) fn context<'b>(&'b self, errors: &'b engine::ErrorSink) -> engine::ExecutionContext<'b> {
        engine::ExecutionContext {
            schema: self.schema,
            document: self.document,
            operation: self.operation,
            variable_values: &self.variable_values,
            resolvers: self.resolvers,
            errors,
            config: &self.config,
            cancellation_token: &self.cancellation_token,
            context_data: self.context_data.as_deref(),
        }
    }

    /// Execute the root selection set and drain the error sink into a response
    ///
    /// <https://spec.graphql.org/October2021/#sec-Executing-Operations>
    pub(crate) async fn execute_root(&self, root_value: &ObjectValue) -> Response {
        let mode = if self.operation.is_mutation() {
            engine::ExecutionMode::Sequential
        } else {
            engine::ExecutionMode::Normal
        };
        let errors = engine::ErrorSink::default();
        let ctx = self.context(&errors);
        let result = engine::execute_selection_set(
            &ctx,
            None,
            mode,
            self.root_type,
            root_value,
            &self.operation.selection_set.selections,
        )
        .await;
        let data = match result {
            Ok(map) => ResponseData::Object(map),
            // A field error on a non-null field propagated all the way to the root
            Err(engine::PropagateNull) => ResponseData::Null,
        };
        Response {
            errors: errors.into_sorted(),
            data,
            extensions: JsonMap::new(),
        }
    }
}

impl RequestError {
    /// Convert to the errors of a response without data
    pub fn to_graphql_errors(&self) -> Vec<GraphQLError> {
        match self {
            Self::Validation { errors } => errors.clone(),
            Self::InputCoercion(error) => vec![GraphQLError::new(&error.message, error.location)],
            Self::SubscriptionSource(error) => vec![error.clone()],
            Self::GetOperation(_)
            | Self::NoRootOperationType(_)
            | Self::NotASubscription(_)
            | Self::Cancelled => vec![GraphQLError::new(self.to_string(), None)],
        }
    }
}
