use crate::execution::engine::path_to_vec;
use crate::execution::engine::LinkedPath;
use crate::executable;
use crate::executable::ExecutableDocument;
use crate::executable::Operation;
use crate::response::GraphQLError;
use crate::response::GraphQLLocation;
use crate::response::JsonMap;
use crate::response::JsonValue;
use crate::response::PathElement;
use crate::schema::FieldDefinition;
use crate::schema::ObjectType;
use crate::Name;
use crate::Schema;
use futures::future::BoxFuture;
use futures::stream::BoxStream;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Information passed to a [`Resolver`] about the field being resolved
pub struct ResolveInfo<'a> {
    pub(crate) schema: &'a Schema,
    pub(crate) document: &'a ExecutableDocument,
    pub(crate) operation: &'a Operation,
    pub(crate) parent_type: &'a ObjectType,
    pub(crate) parent_value: &'a ObjectValue,
    pub(crate) field_definition: &'a FieldDefinition,
    pub(crate) fields: &'a [&'a executable::Field],
    pub(crate) arguments: &'a JsonMap,
    pub(crate) variable_values: &'a JsonMap,
    pub(crate) path: LinkedPath<'a>,
    pub(crate) cancellation_token: &'a CancellationToken,
    pub(crate) context_data: Option<&'a (dyn Any + Send + Sync)>,
}

/// Resolves the value of one field of one object
///
/// Implemented for closures taking a [`ResolveInfo`] and returning a boxed future.
/// See [`SyncResolver`] for resolvers that never need to wait.
pub trait Resolver: Send + Sync {
    fn resolve<'a>(
        &'a self,
        info: &'a ResolveInfo<'a>,
    ) -> BoxFuture<'a, Result<ResolvedValue, FieldError>>;
}

impl<F> Resolver for F
where
    F: for<'a> Fn(&'a ResolveInfo<'a>) -> BoxFuture<'a, Result<ResolvedValue, FieldError>>
        + Send
        + Sync,
{
    fn resolve<'a>(
        &'a self,
        info: &'a ResolveInfo<'a>,
    ) -> BoxFuture<'a, Result<ResolvedValue, FieldError>> {
        self(info)
    }
}

/// Adapts a synchronous closure into a [`Resolver`]
pub struct SyncResolver<F>(pub F);

impl<F> Resolver for SyncResolver<F>
where
    F: Fn(&ResolveInfo<'_>) -> Result<ResolvedValue, FieldError> + Send + Sync,
{
    fn resolve<'a>(
        &'a self,
        info: &'a ResolveInfo<'a>,
    ) -> BoxFuture<'a, Result<ResolvedValue, FieldError>> {
        Box::pin(futures::future::ready((self.0)(info)))
    }
}

/// Creates the stream of events for a subscription root field.
///
/// Each item becomes the root value of one execution of the subscription’s selection set.
pub trait Subscriber: Send + Sync {
    fn subscribe<'a>(
        &'a self,
        info: &'a ResolveInfo<'a>,
    ) -> BoxFuture<'a, Result<EventStream, FieldError>>;
}

/// The source stream returned by a [`Subscriber`]
pub type EventStream = BoxStream<'static, Result<ObjectValue, FieldError>>;

impl<F> Subscriber for F
where
    F: for<'a> Fn(&'a ResolveInfo<'a>) -> BoxFuture<'a, Result<EventStream, FieldError>>
        + Send
        + Sync,
{
    fn subscribe<'a>(
        &'a self,
        info: &'a ResolveInfo<'a>,
    ) -> BoxFuture<'a, Result<EventStream, FieldError>> {
        self(info)
    }
}

/// Determines the concrete object type of a value of an interface or union type.
///
/// Returns the name of an object type, or `None` if it cannot tell.
pub type TypeResolver = dyn Fn(&ObjectValue, &Schema) -> Option<String> + Send + Sync;

/// Serializes a resolved value of a custom scalar type.
///
/// Returns `None` if the value cannot be represented by that scalar.
pub type ScalarSerializer = dyn Fn(&JsonValue) -> Option<JsonValue> + Send + Sync;

/// The successful return type of a [`Resolver`]
#[derive(Debug, Clone)]
pub enum ResolvedValue {
    /// * JSON null represents GraphQL null
    /// * A GraphQL enum value is represented as a JSON string
    /// * GraphQL built-in scalars are coerced according to their respective *Result Coercion* spec
    /// * Custom scalars go through the serializer registered in [`Resolvers`], if any
    /// * A JSON array is completed as a list, and a JSON object as an object,
    ///   where the field type expects one
    Leaf(JsonValue),

    /// Expected where the GraphQL type is an object, interface, or union type
    Object(ObjectValue),

    /// Expected for GraphQL list types. Each item may fail separately.
    List(Vec<Result<ResolvedValue, FieldError>>),
}

/// An opaque object value, handed back to the resolvers of its fields as
/// [`ResolveInfo::parent_value`].
///
/// Cloning is cheap.
#[derive(Clone)]
pub struct ObjectValue {
    type_name: Option<Name>,
    value: Arc<dyn Any + Send + Sync>,
}

/// A field error returned by a resolver
///
/// Anything implementing [`std::error::Error`] converts into it, so `?` works in resolvers.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    pub message: String,
    /// Copied into the response error
    pub extensions: JsonMap,
}

/// Resolver functions and type-system hooks for one schema
///
/// Fields without a registered resolver read the property of the same name
/// when the parent value is a JSON object (see [`ObjectValue::json`]),
/// and resolve to null otherwise.
#[derive(Clone, Default)]
pub struct Resolvers {
    fields: HashMap<Name, HashMap<Name, Arc<dyn Resolver>>>,
    subscribers: HashMap<Name, Arc<dyn Subscriber>>,
    type_resolvers: HashMap<Name, Arc<TypeResolver>>,
    scalars: HashMap<Name, Arc<ScalarSerializer>>,
}

impl<'a> ResolveInfo<'a> {
    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    pub fn document(&self) -> &'a ExecutableDocument {
        self.document
    }

    /// The operation being executed
    pub fn operation(&self) -> &'a Operation {
        self.operation
    }

    /// The object type whose field is being resolved
    pub fn parent_type(&self) -> &'a ObjectType {
        self.parent_type
    }

    /// The object value whose field is being resolved
    pub fn parent_value(&self) -> &'a ObjectValue {
        self.parent_value
    }

    /// The name of the field being resolved
    pub fn field_name(&self) -> &'a str {
        &self.fields[0].name
    }

    /// The field definition in the schema
    pub fn field_definition(&self) -> &'a FieldDefinition {
        self.field_definition
    }

    /// The field selections being resolved.
    ///
    /// There is always at least one, but there may be more in case of
    /// [field merging](https://spec.graphql.org/October2021/#sec-Field-Selection-Merging).
    pub fn field_selections(&self) -> &'a [&'a executable::Field] {
        self.fields
    }

    /// The arguments passed to this field, after
    /// [`CoerceArgumentValues()`](https://spec.graphql.org/October2021/#CoerceArgumentValues()):
    /// this matches the argument definitions in the schema.
    pub fn arguments(&self) -> &'a JsonMap {
        self.arguments
    }

    pub fn argument(&self, name: &str) -> Option<&'a JsonValue> {
        self.arguments.get(name)
    }

    /// Coerced values of the request’s variables
    pub fn variable_values(&self) -> &'a JsonMap {
        self.variable_values
    }

    /// Path from the response root to this field
    pub fn path(&self) -> Vec<PathElement> {
        path_to_vec(self.path)
    }

    /// Cancelled when the request is aborted or a subscription ends
    pub fn cancellation_token(&self) -> &'a CancellationToken {
        self.cancellation_token
    }

    /// Request-scoped data passed to [`Execution::context_data`][crate::Execution::context_data],
    /// if it has type `T`
    pub fn context_data<T: Any>(&self) -> Option<&'a T> {
        self.context_data?.downcast_ref()
    }
}

impl ResolvedValue {
    /// Construct a null leaf resolved value
    pub fn null() -> Self {
        Self::Leaf(JsonValue::Null)
    }

    /// Construct a leaf resolved value from something that is convertible to JSON
    pub fn leaf(json: impl Into<JsonValue>) -> Self {
        Self::Leaf(json.into())
    }

    /// Construct an object resolved value
    pub fn object(object: ObjectValue) -> Self {
        Self::Object(object)
    }

    /// Construct an object resolved value or null
    pub fn nullable_object(opt_object: Option<ObjectValue>) -> Self {
        match opt_object {
            Some(object) => Self::Object(object),
            None => Self::null(),
        }
    }

    /// Construct a list resolved value from an iterator
    ///
    /// If some items can fail,
    /// construct the [`ResolvedValue::List`] enum variant directly instead.
    pub fn list(iter: impl IntoIterator<Item = Self>) -> Self {
        Self::List(iter.into_iter().map(Ok).collect())
    }
}

impl From<JsonValue> for ResolvedValue {
    fn from(value: JsonValue) -> Self {
        Self::Leaf(value)
    }
}

impl From<ObjectValue> for ResolvedValue {
    fn from(value: ObjectValue) -> Self {
        Self::Object(value)
    }
}

impl ObjectValue {
    /// Wrap any value. Its concrete GraphQL type is known from the field type,
    /// or found by a type resolver for interface and union fields.
    pub fn new(value: impl Any + Send + Sync) -> Self {
        Self {
            type_name: None,
            value: Arc::new(value),
        }
    }

    /// Wrap a value of a known object type
    pub fn typed(type_name: Name, value: impl Any + Send + Sync) -> Self {
        Self {
            type_name: Some(type_name),
            value: Arc::new(value),
        }
    }

    /// Wrap a JSON object. Fields without a registered resolver read its properties.
    pub fn json(map: JsonMap) -> Self {
        Self::new(map)
    }

    pub fn with_type_name(mut self, type_name: Name) -> Self {
        self.type_name = Some(type_name);
        self
    }

    /// The object type name this value was created with, if any
    pub fn type_name(&self) -> Option<&Name> {
        self.type_name.as_ref()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref()
    }

    /// Returns the wrapped JSON object, if this value was created by [`ObjectValue::json`]
    pub fn as_json(&self) -> Option<&JsonMap> {
        self.downcast_ref()
    }
}

impl fmt::Debug for ObjectValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("ObjectValue");
        debug.field("type_name", &self.type_name);
        if let Some(json) = self.as_json() {
            debug.field("json", json);
        }
        debug.finish_non_exhaustive()
    }
}

impl FieldError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            extensions: JsonMap::new(),
        }
    }

    pub fn with_extension(mut self, key: &str, value: impl Into<JsonValue>) -> Self {
        self.extensions.insert(key, value.into());
        self
    }

    pub(crate) fn into_graphql_error(
        self,
        path: LinkedPath<'_>,
        location: Option<GraphQLLocation>,
    ) -> GraphQLError {
        let mut error = GraphQLError::field_error(self.message, path, location);
        error.extensions = self.extensions;
        error
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl<E: std::error::Error> From<E> for FieldError {
    fn from(error: E) -> Self {
        Self::new(error.to_string())
    }
}

impl Resolvers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an async resolver closure for `type_name.field_name`
    pub fn field<F>(self, type_name: &str, field_name: &str, resolver: F) -> Self
    where
        F: for<'a> Fn(&'a ResolveInfo<'a>) -> BoxFuture<'a, Result<ResolvedValue, FieldError>>
            + Send
            + Sync
            + 'static,
    {
        self.field_resolver(type_name, field_name, resolver)
    }

    /// Register a synchronous resolver closure for `type_name.field_name`
    pub fn sync_field<F>(self, type_name: &str, field_name: &str, resolver: F) -> Self
    where
        F: Fn(&ResolveInfo<'_>) -> Result<ResolvedValue, FieldError> + Send + Sync + 'static,
    {
        self.field_resolver(type_name, field_name, SyncResolver(resolver))
    }

    /// Register any [`Resolver`] implementation for `type_name.field_name`
    pub fn field_resolver(
        mut self,
        type_name: &str,
        field_name: &str,
        resolver: impl Resolver + 'static,
    ) -> Self {
        self.fields
            .entry(Name::new_unchecked(type_name))
            .or_default()
            .insert(Name::new_unchecked(field_name), Arc::new(resolver));
        self
    }

    /// Register the source stream for a root field of the subscription type
    pub fn subscriber<F>(mut self, field_name: &str, subscriber: F) -> Self
    where
        F: for<'a> Fn(&'a ResolveInfo<'a>) -> BoxFuture<'a, Result<EventStream, FieldError>>
            + Send
            + Sync
            + 'static,
    {
        self.subscribers
            .insert(Name::new_unchecked(field_name), Arc::new(subscriber));
        self
    }

    /// Register how to find the concrete type of values of an interface or union type
    pub fn type_resolver<F>(mut self, abstract_type: &str, resolver: F) -> Self
    where
        F: Fn(&ObjectValue, &Schema) -> Option<String> + Send + Sync + 'static,
    {
        self.type_resolvers
            .insert(Name::new_unchecked(abstract_type), Arc::new(resolver));
        self
    }

    /// Register the result coercion of a custom scalar type
    pub fn scalar<F>(mut self, scalar_type: &str, serialize: F) -> Self
    where
        F: Fn(&JsonValue) -> Option<JsonValue> + Send + Sync + 'static,
    {
        self.scalars
            .insert(Name::new_unchecked(scalar_type), Arc::new(serialize));
        self
    }

    pub(crate) fn get_field(&self, type_name: &str, field_name: &str) -> Option<&dyn Resolver> {
        Some(&**self.fields.get(type_name)?.get(field_name)?)
    }

    pub(crate) fn get_subscriber(&self, field_name: &str) -> Option<&dyn Subscriber> {
        Some(&**self.subscribers.get(field_name)?)
    }

    pub(crate) fn get_type_resolver(&self, abstract_type: &str) -> Option<&TypeResolver> {
        Some(&**self.type_resolvers.get(abstract_type)?)
    }

    pub(crate) fn get_scalar(&self, scalar_type: &str) -> Option<&ScalarSerializer> {
        Some(&**self.scalars.get(scalar_type)?)
    }
}

impl fmt::Debug for Resolvers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<String> = self
            .fields
            .iter()
            .flat_map(|(ty, fields)| fields.keys().map(move |field| format!("{ty}.{field}")))
            .collect();
        f.debug_struct("Resolvers")
            .field("fields", &fields)
            .field("subscribers", &self.subscribers.keys().collect::<Vec<_>>())
            .field("type_resolvers", &self.type_resolvers.keys().collect::<Vec<_>>())
            .field("scalars", &self.scalars.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// The resolver used for fields without a registered one:
/// read a property of a JSON parent value
pub(crate) fn default_resolve(parent: &ObjectValue, field_name: &str) -> ResolvedValue {
    match parent.as_json().and_then(|map| map.get(field_name)) {
        Some(value) => ResolvedValue::Leaf(value.clone()),
        None => ResolvedValue::null(),
    }
}
