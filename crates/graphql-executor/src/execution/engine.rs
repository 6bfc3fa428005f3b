use crate::ast::Type;
use crate::config::ExecutionConfig;
use crate::executable::ExecutableDocument;
use crate::executable::Field;
use crate::executable::Operation;
use crate::executable::Selection;
use crate::execution::collect_fields::collect_fields;
use crate::execution::collect_fields::GroupedFieldSet;
use crate::execution::input_coercion::coerce_argument_values;
use crate::execution::resolver::default_resolve;
use crate::execution::resolver::ObjectValue;
use crate::execution::resolver::ResolveInfo;
use crate::execution::resolver::Resolvers;
use crate::execution::result_coercion::complete_value;
use crate::response::GraphQLError;
use crate::response::GraphQLLocation;
use crate::response::JsonMap;
use crate::response::JsonValue;
use crate::response::PathElement;
use crate::schema::ObjectType;
use crate::Schema;
use futures::future::BoxFuture;
use futures::future::Either;
use parking_lot::Mutex;
use std::any::Any;
use tokio_util::sync::CancellationToken;

/// <https://spec.graphql.org/October2021/#sec-Normal-and-Serial-Execution>
#[derive(Debug, Copy, Clone)]
pub(crate) enum ExecutionMode {
    /// Allowed to resolve fields in any order, including in parallel
    Normal,
    /// Top-level fields of a mutation operation must be executed in order
    Sequential,
}

/// Return in `Err` when a field error occurred at some non-nullable place
///
/// <https://spec.graphql.org/October2021/#sec-Handling-Field-Errors>
#[derive(Debug)]
pub(crate) struct PropagateNull;

/// Linked-list version of `Vec<PathElement>`, taking advantage of the call stack
pub(crate) type LinkedPath<'a> = Option<&'a LinkedPathElement<'a>>;

pub(crate) struct LinkedPathElement<'a> {
    pub(crate) element: PathElement,
    /// Position of this element among its siblings in the response.
    /// For list items this is the same as the index.
    pub(crate) ordinal: usize,
    pub(crate) next: LinkedPath<'a>,
}

/// Everything shared by the fields of one execution
pub(crate) struct ExecutionContext<'a> {
    pub(crate) schema: &'a Schema,
    pub(crate) document: &'a ExecutableDocument,
    pub(crate) operation: &'a Operation,
    pub(crate) variable_values: &'a JsonMap,
    pub(crate) resolvers: &'a Resolvers,
    pub(crate) errors: &'a ErrorSink,
    pub(crate) config: &'a ExecutionConfig,
    pub(crate) cancellation_token: &'a CancellationToken,
    pub(crate) context_data: Option<&'a (dyn Any + Send + Sync)>,
}

/// Field errors of one execution, collected from concurrently executing fields
#[derive(Default)]
pub(crate) struct ErrorSink {
    errors: Mutex<Vec<(Vec<usize>, GraphQLError)>>,
}

impl ErrorSink {
    pub(crate) fn push(&self, path: LinkedPath<'_>, error: GraphQLError) {
        tracing::debug!(path = %PathDisplay(path), message = %error.message, "field error");
        let mut ordinals = Vec::new();
        let mut link = path;
        while let Some(node) = link {
            ordinals.push(node.ordinal);
            link = node.next;
        }
        ordinals.reverse();
        self.errors.lock().push((ordinals, error))
    }

    pub(crate) fn field_error(
        &self,
        message: impl Into<String>,
        path: LinkedPath<'_>,
        location: Option<GraphQLLocation>,
    ) {
        self.push(path, GraphQLError::field_error(message, path, location))
    }

    /// Errors in the order of their position in the response
    pub(crate) fn into_sorted(self) -> Vec<GraphQLError> {
        let mut errors = self.errors.into_inner();
        // Stable sort: errors at the same path keep the order they were raised in
        errors.sort_by(|(a, _), (b, _)| a.cmp(b));
        errors.into_iter().map(|(_, error)| error).collect()
    }
}

/// <https://spec.graphql.org/October2021/#ExecuteSelectionSet()>
pub(crate) fn execute_selection_set<'a, 'b>(
    ctx: &'b ExecutionContext<'a>,
    path: LinkedPath<'b>,
    mode: ExecutionMode,
    object_type: &'a ObjectType,
    object_value: &'b ObjectValue,
    selections: impl IntoIterator<Item = &'a Selection>,
) -> BoxFuture<'b, Result<JsonMap, PropagateNull>> {
    let grouped_field_set = collect_fields(
        ctx.schema,
        ctx.document,
        ctx.variable_values,
        object_type,
        selections,
    );
    Box::pin(execute_grouped_field_set(
        ctx,
        path,
        mode,
        object_type,
        object_value,
        grouped_field_set,
    ))
}

async fn execute_grouped_field_set<'a>(
    ctx: &ExecutionContext<'a>,
    path: LinkedPath<'_>,
    mode: ExecutionMode,
    object_type: &'a ObjectType,
    object_value: &ObjectValue,
    grouped_field_set: GroupedFieldSet<'a>,
) -> Result<JsonMap, PropagateNull> {
    let field_futures = grouped_field_set
        .iter()
        .enumerate()
        .map(|(ordinal, (&response_key, fields))| async move {
            let field_path = LinkedPathElement {
                element: PathElement::Field(response_key.clone()),
                ordinal,
                next: path,
            };
            let value =
                execute_field(ctx, Some(&field_path), object_type, object_value, fields).await?;
            Ok::<_, PropagateNull>(value.map(|value| (response_key, value)))
        });
    let mut response_map = JsonMap::with_capacity(grouped_field_set.len());
    let results = match mode {
        ExecutionMode::Sequential => {
            for future in field_futures {
                // Stop at the first null that reaches this object:
                // later mutation fields must not run
                if let Some((response_key, value)) = future.await? {
                    response_map.insert(response_key.as_str(), value);
                }
            }
            return Ok(response_map);
        }
        ExecutionMode::Normal if ctx.config.parallel => {
            futures::future::join_all(field_futures).await
        }
        ExecutionMode::Normal => {
            let mut results = Vec::with_capacity(grouped_field_set.len());
            for future in field_futures {
                results.push(future.await)
            }
            results
        }
    };
    for result in results {
        if let Some((response_key, value)) = result? {
            response_map.insert(response_key.as_str(), value);
        }
    }
    Ok(response_map)
}

/// <https://spec.graphql.org/October2021/#ExecuteField()>
///
/// Return `Ok(None)` for silently skipping that field.
async fn execute_field<'a>(
    ctx: &ExecutionContext<'a>,
    path: LinkedPath<'_>,
    object_type: &'a ObjectType,
    object_value: &ObjectValue,
    fields: &[&'a Field],
) -> Result<Option<JsonValue>, PropagateNull> {
    // Indexing should not panic: `collect_fields` only creates a `Vec` to push to it
    let field = fields[0];
    if field.name == "__typename" {
        return Ok(Some(object_type.name.as_str().into()));
    }
    let Ok(field_def) = ctx.schema.type_field(&object_type.name, &field.name) else {
        tracing::warn!(
            type_name = %object_type.name,
            field_name = %field.name,
            "skipping a field that is not defined in the schema"
        );
        return Ok(None);
    };
    if ctx.cancellation_token.is_cancelled() {
        return Err(PropagateNull);
    }
    if let Some(max_depth) = ctx.config.max_depth {
        if depth(path) > max_depth {
            ctx.errors.field_error(
                format!("field `{}` exceeds the maximum depth of {max_depth}", field.name),
                path,
                field.location,
            );
            return try_nullify(&field_def.ty, Err(PropagateNull)).map(Some);
        }
    }
    let argument_values =
        match coerce_argument_values(ctx.schema, ctx.variable_values, field_def, field) {
            Ok(argument_values) => argument_values,
            Err(error) => {
                ctx.errors.field_error(error.message, path, error.location);
                return try_nullify(&field_def.ty, Err(PropagateNull)).map(Some);
            }
        };
    let resolved_result = match ctx.resolvers.get_field(&object_type.name, &field.name) {
        Some(resolver) => {
            let info = ResolveInfo {
                schema: ctx.schema,
                document: ctx.document,
                operation: ctx.operation,
                parent_type: object_type,
                parent_value: object_value,
                field_definition: field_def,
                fields,
                arguments: &argument_values,
                variable_values: ctx.variable_values,
                path,
                cancellation_token: ctx.cancellation_token,
                context_data: ctx.context_data,
            };
            tracing::trace!(path = %PathDisplay(path), "resolving field");
            let resolve = resolver.resolve(&info);
            let cancelled = std::pin::pin!(ctx.cancellation_token.cancelled());
            let result = match futures::future::select(resolve, cancelled).await {
                Either::Left((result, _)) => result,
                Either::Right(((), _)) => return Err(PropagateNull),
            };
            result
        }
        None => Ok(default_resolve(object_value, &field.name)),
    };
    let completed_result = match resolved_result {
        Ok(resolved) => complete_value(ctx, path, &field_def.ty, resolved, fields).await,
        Err(error) => {
            ctx.errors
                .push(path, error.into_graphql_error(path, field.location));
            Err(PropagateNull)
        }
    };
    try_nullify(&field_def.ty, completed_result).map(Some)
}

/// Try to insert a propagated null if possible, or keep propagating it.
///
/// <https://spec.graphql.org/October2021/#sec-Handling-Field-Errors>
pub(crate) fn try_nullify(
    ty: &Type,
    result: Result<JsonValue, PropagateNull>,
) -> Result<JsonValue, PropagateNull> {
    match result {
        Ok(json) => Ok(json),
        Err(PropagateNull) => {
            if ty.is_non_null() {
                Err(PropagateNull)
            } else {
                Ok(JsonValue::Null)
            }
        }
    }
}

/// Number of fields from the root to this path, including the last one
fn depth(mut link: LinkedPath<'_>) -> usize {
    let mut depth = 0;
    while let Some(node) = link {
        if let PathElement::Field(_) = node.element {
            depth += 1
        }
        link = node.next;
    }
    depth
}

pub(crate) fn path_to_vec(mut link: LinkedPath<'_>) -> Vec<PathElement> {
    let mut path = Vec::new();
    while let Some(node) = link {
        path.push(node.element.clone());
        link = node.next;
    }
    path.reverse();
    path
}

/// Formats a path as `a.b.0.c` for logs
struct PathDisplay<'a>(LinkedPath<'a>);

impl std::fmt::Display for PathDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, element) in path_to_vec(self.0).iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{element}")?;
        }
        Ok(())
    }
}

impl GraphQLError {
    pub(crate) fn field_error(
        message: impl Into<String>,
        path: LinkedPath<'_>,
        location: Option<GraphQLLocation>,
    ) -> Self {
        let mut err = Self::new(message, location);
        err.path = path_to_vec(path);
        err
    }
}
