use crate::ast::Type;
use crate::executable::Field;
use crate::execution::engine::execute_selection_set;
use crate::execution::engine::try_nullify;
use crate::execution::engine::ExecutionContext;
use crate::execution::engine::ExecutionMode;
use crate::execution::engine::LinkedPath;
use crate::execution::engine::LinkedPathElement;
use crate::execution::engine::PropagateNull;
use crate::execution::resolver::FieldError;
use crate::execution::resolver::ObjectValue;
use crate::execution::resolver::ResolvedValue;
use crate::response::JsonValue;
use crate::response::PathElement;
use crate::schema::ExtendedType;
use crate::schema::ObjectType;
use crate::Name;
use futures::future::BoxFuture;

/// <https://spec.graphql.org/October2021/#CompleteValue()>
///
/// Returns `Err` for a field error being propagated upwards to find a nullable place
pub(crate) fn complete_value<'a, 'b>(
    ctx: &'b ExecutionContext<'a>,
    path: LinkedPath<'b>,
    ty: &'a Type,
    resolved: ResolvedValue,
    fields: &'b [&'a Field],
) -> BoxFuture<'b, Result<JsonValue, PropagateNull>> {
    Box::pin(complete_resolved_value(ctx, path, ty, resolved, fields))
}

async fn complete_resolved_value<'a>(
    ctx: &ExecutionContext<'a>,
    path: LinkedPath<'_>,
    ty: &'a Type,
    resolved: ResolvedValue,
    fields: &[&'a Field],
) -> Result<JsonValue, PropagateNull> {
    let location = fields[0].location;
    macro_rules! field_error {
        ($($arg: tt)+) => {
            {
                ctx.errors.field_error(format!($($arg)+), path, location);
                return Err(PropagateNull);
            }
        };
    }
    let object = match resolved {
        ResolvedValue::Leaf(JsonValue::Null) => {
            if ty.is_non_null() {
                field_error!("non-null type {ty} resolved to null")
            } else {
                return Ok(JsonValue::Null);
            }
        }
        ResolvedValue::List(items) => {
            return complete_list_value(ctx, path, ty, fields, items).await;
        }
        ResolvedValue::Leaf(JsonValue::Array(items)) if ty.is_list() => {
            let items = items
                .into_iter()
                .map(|item| Ok(ResolvedValue::Leaf(item)))
                .collect();
            return complete_list_value(ctx, path, ty, fields, items).await;
        }
        ResolvedValue::Leaf(leaf) => {
            let ty_name = ty.inner_named_type();
            match (ctx.schema.types.get(ty_name), leaf) {
                (
                    Some(ExtendedType::Object(_) | ExtendedType::Interface(_) | ExtendedType::Union(_)),
                    JsonValue::Object(map),
                ) if !ty.is_list() => ObjectValue::json(map),
                (_, leaf) => return complete_leaf_value(ctx, path, ty, leaf, fields),
            }
        }
        ResolvedValue::Object(object) => object,
    };

    let ty_name = match ty {
        Type::List(_) | Type::NonNullList(_) => {
            field_error!("list type {ty} resolved to an object")
        }
        Type::Named(name) | Type::NonNullNamed(name) => name,
    };
    let object_type = match ctx.schema.types.get(ty_name) {
        None => field_error!("undefined type {ty_name}"),
        Some(ExtendedType::InputObject(_)) => {
            field_error!("field with input object type {ty_name}")
        }
        Some(ExtendedType::Enum(_) | ExtendedType::Scalar(_)) => {
            field_error!("resolver returned an object, expected {ty_name}")
        }
        Some(ExtendedType::Interface(_) | ExtendedType::Union(_)) => {
            match resolve_abstract_type(ctx, ty_name, &object) {
                Ok(object_type) => object_type,
                Err(message) => field_error!("{message}"),
            }
        }
        Some(ExtendedType::Object(def)) => match object.type_name() {
            Some(resolved_type_name) if resolved_type_name != ty_name => {
                field_error!(
                    "resolver returned an object of type {resolved_type_name}, expected {ty_name}"
                )
            }
            _ => def,
        },
    };
    execute_selection_set(
        ctx,
        path,
        ExecutionMode::Normal,
        object_type,
        &object,
        fields
            .iter()
            .flat_map(|field| &field.selection_set.selections),
    )
    .await
    .map(JsonValue::Object)
}

/// Find the concrete object type of a value whose field type is an interface or union.
///
/// In order: the type name the value was created with, the type resolver registered
/// for the abstract type, then a `__typename` property of a JSON object value.
///
/// <https://spec.graphql.org/October2021/#ResolveAbstractType()>
fn resolve_abstract_type<'a>(
    ctx: &ExecutionContext<'a>,
    abstract_type: &Name,
    object: &ObjectValue,
) -> Result<&'a ObjectType, String> {
    let resolved_type_name = if let Some(name) = object.type_name() {
        name.as_str().to_owned()
    } else if let Some(type_name) = ctx
        .resolvers
        .get_type_resolver(abstract_type)
        .and_then(|resolve_type| resolve_type(object, ctx.schema))
    {
        type_name
    } else if let Some(type_name) = object
        .as_json()
        .and_then(|map| map.get("__typename"))
        .and_then(JsonValue::as_str)
    {
        type_name.to_owned()
    } else {
        return Err(format!(
            "could not determine the concrete object type of abstract type {abstract_type}"
        ));
    };
    let Some(object_def) = ctx.schema.get_object(&resolved_type_name) else {
        return Err(format!(
            "abstract type {abstract_type} resolved to {resolved_type_name}, \
             which is not an object type of the schema"
        ));
    };
    if !ctx.schema.is_subtype(abstract_type, &resolved_type_name) {
        return Err(format!(
            "runtime object type {resolved_type_name} is not a possible type for {abstract_type}"
        ));
    }
    Ok(object_def)
}

async fn complete_list_value<'a>(
    ctx: &ExecutionContext<'a>,
    path: LinkedPath<'_>,
    ty: &'a Type,
    fields: &[&'a Field],
    items: Vec<Result<ResolvedValue, FieldError>>,
) -> Result<JsonValue, PropagateNull> {
    let location = fields[0].location;
    let inner_ty = match ty {
        Type::Named(_) | Type::NonNullNamed(_) => {
            ctx.errors.field_error(
                format!("non-list type {ty} resolved to a list"),
                path,
                location,
            );
            return Err(PropagateNull);
        }
        Type::List(inner_ty) | Type::NonNullList(inner_ty) => &**inner_ty,
    };
    let len = items.len();
    let item_futures = items
        .into_iter()
        .enumerate()
        .map(|(index, inner_result)| async move {
            let inner_path = LinkedPathElement {
                element: PathElement::ListIndex(index),
                ordinal: index,
                next: path,
            };
            let inner_result = match inner_result {
                Ok(inner_resolved) => {
                    complete_value(ctx, Some(&inner_path), inner_ty, inner_resolved, fields).await
                }
                Err(error) => {
                    ctx.errors.push(
                        Some(&inner_path),
                        error.into_graphql_error(Some(&inner_path), location),
                    );
                    Err(PropagateNull)
                }
            };
            // On field error, try to nullify that item
            try_nullify(inner_ty, inner_result)
        });
    let results = if ctx.config.parallel {
        futures::future::join_all(item_futures).await
    } else {
        let mut results = Vec::with_capacity(len);
        for future in item_futures {
            results.push(future.await)
        }
        results
    };
    let mut completed_list = Vec::with_capacity(len);
    for result in results {
        match result {
            Ok(inner_value) => completed_list.push(inner_value),
            // If the item is non-null, try to nullify the list
            Err(PropagateNull) => return try_nullify(ty, Err(PropagateNull)),
        }
    }
    Ok(completed_list.into())
}

fn complete_leaf_value(
    ctx: &ExecutionContext<'_>,
    path: LinkedPath<'_>,
    ty: &Type,
    json_value: JsonValue,
    fields: &[&Field],
) -> Result<JsonValue, PropagateNull> {
    let location = fields[0].location;
    macro_rules! field_error {
        ($($arg: tt)+) => {
            {
                ctx.errors.field_error(format!($($arg)+), path, location);
                return Err(PropagateNull);
            }
        };
    }
    let ty_name = match ty {
        Type::List(_) | Type::NonNullList(_) => {
            field_error!("list type {ty} resolved to a non-list value {json_value}")
        }
        Type::Named(name) | Type::NonNullNamed(name) => name,
    };
    let Some(ty_def) = ctx.schema.types.get(ty_name) else {
        field_error!("undefined type {ty_name}")
    };
    match ty_def {
        ExtendedType::InputObject(_) => {
            field_error!("field with input object type {ty_name}")
        }
        ExtendedType::Object(_) | ExtendedType::Interface(_) | ExtendedType::Union(_) => {
            field_error!("resolver returned a leaf value but expected an object for type {ty_name}")
        }
        ExtendedType::Enum(enum_def) => {
            // https://spec.graphql.org/October2021/#sec-Enums.Result-Coercion
            if !json_value
                .as_str()
                .is_some_and(|str| enum_def.values.contains_key(str))
            {
                field_error!("resolver returned {json_value}, expected enum {ty_name}")
            }
        }
        ExtendedType::Scalar(_) => {
            if let Some(serialize) = ctx.resolvers.get_scalar(ty_name) {
                return match serialize(&json_value) {
                    Some(serialized) => Ok(serialized),
                    None => field_error!("{ty_name} cannot represent value {json_value}"),
                };
            }
            match ty_name.as_str() {
                "Int" => {
                    // https://spec.graphql.org/October2021/#sec-Int.Result-Coercion
                    // > GraphQL services may coerce non-integer internal values to integers
                    // > when reasonable without losing information
                    //
                    // We choose not to, to keep with Rust’s strong typing
                    if let Some(int) = json_value.as_i64() {
                        if i32::try_from(int).is_err() {
                            field_error!("resolver returned {json_value} which overflows Int")
                        }
                    } else {
                        field_error!("resolver returned {json_value}, expected Int")
                    }
                }
                "Float" => {
                    // https://spec.graphql.org/October2021/#sec-Float.Result-Coercion
                    if !json_value.is_number() {
                        field_error!("resolver returned {json_value}, expected Float")
                    }
                }
                "String" => {
                    // https://spec.graphql.org/October2021/#sec-String.Result-Coercion
                    if !json_value.is_string() {
                        field_error!("resolver returned {json_value}, expected String")
                    }
                }
                "Boolean" => {
                    // https://spec.graphql.org/October2021/#sec-Boolean.Result-Coercion
                    if !json_value.is_boolean() {
                        field_error!("resolver returned {json_value}, expected Boolean")
                    }
                }
                "ID" => {
                    // https://spec.graphql.org/October2021/#sec-ID.Result-Coercion
                    if let Some(int) = json_value.as_i64() {
                        return Ok(int.to_string().into());
                    }
                    if !json_value.is_string() {
                        field_error!("resolver returned {json_value}, expected ID")
                    }
                }
                _ => {
                    // Custom scalar without a serializer: accept any JSON value
                    // (including an array or object, despite this being a "leaf"
                    // as far as GraphQL resolution is concerned)
                }
            }
        }
    };
    Ok(json_value)
}
