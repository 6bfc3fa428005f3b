use crate::ast::Type;
use crate::ast::Value;
use crate::executable::Field;
use crate::executable::Operation;
use crate::response::GraphQLLocation;
use crate::response::JsonMap;
use crate::response::JsonValue;
use crate::schema::ExtendedType;
use crate::schema::FieldDefinition;
use crate::Schema;

/// A value from the request (a variable) or the document (an argument or a default value)
/// that cannot be coerced to its expected input type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct InputCoercionError {
    pub message: String,
    pub location: Option<GraphQLLocation>,
}

macro_rules! coercion_error {
    ($location: expr, $($arg: tt)+) => {
        return Err(InputCoercionError {
            message: format!($($arg)+),
            location: $location,
        })
    };
}

/// Where a value being coerced comes from, for error messages
#[derive(Clone, Copy)]
struct Site<'a> {
    kind: &'a str,
    parent: &'a str,
    sep: &'a str,
    name: &'a str,
}

impl std::fmt::Display for Site<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Self {
            kind,
            parent,
            sep,
            name,
        } = self;
        write!(f, "{kind} {parent}{sep}{name}")
    }
}

impl<'a> Site<'a> {
    fn top(kind: &'a str, name: &'a str) -> Self {
        Self {
            kind,
            parent: "",
            sep: "",
            name,
        }
    }

    fn input_field(parent: &'a str, name: &'a str) -> Self {
        Self {
            kind: "input field",
            parent,
            sep: ".",
            name,
        }
    }
}

/// Coerce the values of variables from a GraphQL request to the types expected by the operation.
///
/// If type coercion fails, the request must not be executed.
///
/// <https://spec.graphql.org/October2021/#CoerceVariableValues()>
pub fn coerce_variable_values(
    schema: &Schema,
    operation: &Operation,
    values: &JsonMap,
    closed_input_objects: bool,
) -> Result<JsonMap, InputCoercionError> {
    let mut coerced_values = JsonMap::new();
    for variable_def in &operation.variables {
        let name = variable_def.name.as_str();
        let ty = &variable_def.ty;
        let location = variable_def.location;
        if let Some((key, value)) = values.get_key_value(name) {
            let value = coerce_variable_value(
                schema,
                closed_input_objects,
                location,
                Site::top("variable", name),
                ty,
                value,
            )
            .map_err(|err| InputCoercionError {
                message: format!("variable `${name}` of type {ty}: {}", err.message),
                location,
            })?;
            coerced_values.insert(key.clone(), value);
        } else if let Some(default) = &variable_def.default_value {
            let site = Site::top("variable", name);
            let value = coerce_constant(schema, &JsonMap::new(), location, site, ty, default)?;
            coerced_values.insert(name, value);
        } else if ty.is_non_null() {
            coercion_error!(
                location,
                "missing value for non-null variable `${name}` of type {ty}"
            )
        } else {
            // Absent, which is distinct from an explicit null
        }
    }
    Ok(coerced_values)
}

fn coerce_variable_value(
    schema: &Schema,
    closed_input_objects: bool,
    location: Option<GraphQLLocation>,
    site: Site<'_>,
    ty: &Type,
    value: &JsonValue,
) -> Result<JsonValue, InputCoercionError> {
    if value.is_null() {
        if ty.is_non_null() {
            coercion_error!(location, "null value for non-null {site}")
        } else {
            return Ok(JsonValue::Null);
        }
    }
    let ty_name = match ty {
        Type::List(inner) | Type::NonNullList(inner) => {
            // https://spec.graphql.org/October2021/#sec-List.Input-Coercion
            return value
                .as_array()
                .map(Vec::as_slice)
                // If not an array, treat the value as an array of size one:
                .unwrap_or(std::slice::from_ref(value))
                .iter()
                .map(|item| {
                    coerce_variable_value(schema, closed_input_objects, location, site, inner, item)
                })
                .collect();
        }
        Type::Named(ty_name) | Type::NonNullNamed(ty_name) => ty_name,
    };
    let Some(ty_def) = schema.types.get(ty_name) else {
        coercion_error!(location, "undefined type {ty_name} for {site}")
    };
    match ty_def {
        ExtendedType::Object(_) | ExtendedType::Interface(_) | ExtendedType::Union(_) => {
            coercion_error!(location, "non-input type {ty_name} for {site}")
        }
        ExtendedType::Scalar(_) => match ty_name.as_str() {
            "Int" => {
                // https://spec.graphql.org/October2021/#sec-Int.Input-Coercion
                if value
                    .as_i64()
                    .is_some_and(|value| i32::try_from(value).is_ok())
                {
                    return Ok(value.clone());
                }
            }
            "Float" => {
                // https://spec.graphql.org/October2021/#sec-Float.Input-Coercion
                if let Some(float) = value.as_f64() {
                    return Ok(float.into());
                }
            }
            "String" => {
                // https://spec.graphql.org/October2021/#sec-String.Input-Coercion
                if value.is_string() {
                    return Ok(value.clone());
                }
            }
            "Boolean" => {
                // https://spec.graphql.org/October2021/#sec-Boolean.Input-Coercion
                if value.is_boolean() {
                    return Ok(value.clone());
                }
            }
            "ID" => {
                // https://spec.graphql.org/October2021/#sec-ID.Input-Coercion
                if value.is_string() {
                    return Ok(value.clone());
                }
                if let Some(int) = value.as_i64() {
                    return Ok(int.to_string().into());
                }
            }
            // Custom scalars are passed through
            _ => return Ok(value.clone()),
        },
        ExtendedType::Enum(ty_def) => {
            // https://spec.graphql.org/October2021/#sec-Enums.Input-Coercion
            if let Some(str) = value.as_str() {
                if ty_def.values.contains_key(str) {
                    return Ok(value.clone());
                }
            }
        }
        ExtendedType::InputObject(ty_def) => {
            // https://spec.graphql.org/October2021/#sec-Input-Objects.Input-Coercion
            if let Some(object) = value.as_object() {
                if let Some(key) = object
                    .keys()
                    .find(|key| !ty_def.fields.contains_key(key.as_str()))
                {
                    if closed_input_objects {
                        coercion_error!(
                            location,
                            "input object has key {} not in type {ty_name}",
                            key.as_str()
                        )
                    }
                }
                let mut coerced_object = JsonMap::with_capacity(ty_def.fields.len());
                for (field_name, field_def) in &ty_def.fields {
                    let field_site = Site::input_field(ty_name, field_name);
                    if let Some(field_value) = object.get(field_name.as_str()) {
                        let coerced_value = coerce_variable_value(
                            schema,
                            closed_input_objects,
                            location,
                            field_site,
                            &field_def.ty,
                            field_value,
                        )?;
                        coerced_object.insert(field_name.as_str(), coerced_value);
                    } else if let Some(default) = &field_def.default_value {
                        let default = coerce_constant(
                            schema,
                            &JsonMap::new(),
                            location,
                            field_site,
                            &field_def.ty,
                            default,
                        )?;
                        coerced_object.insert(field_name.as_str(), default);
                    } else if field_def.ty.is_non_null() {
                        coercion_error!(
                            location,
                            "missing value for non-null input object field {ty_name}.{field_name}"
                        )
                    } else {
                        // Field not required
                    }
                }
                return Ok(coerced_object.into());
            }
        }
    }
    coercion_error!(location, "could not coerce {site}: {value} to type {ty_name}")
}

/// <https://spec.graphql.org/October2021/#sec-Coercing-Field-Arguments>
pub(crate) fn coerce_argument_values(
    schema: &Schema,
    variable_values: &JsonMap,
    field_def: &FieldDefinition,
    field: &Field,
) -> Result<JsonMap, InputCoercionError> {
    let location = field.location;
    let mut coerced_values = JsonMap::new();
    for arg_def in &field_def.arguments {
        let arg_name = &arg_def.name;
        let site = Site::top("argument", arg_name);
        if let Some(value) = field.argument_by_name(arg_name) {
            if let Value::Variable(var_name) = value {
                if let Some(var_value) = variable_values.get(var_name.as_str()) {
                    if var_value.is_null() && arg_def.ty.is_non_null() {
                        coercion_error!(
                            location,
                            "null value for non-null argument {arg_name} of type {}",
                            arg_def.ty
                        )
                    }
                    coerced_values.insert(arg_name.as_str(), var_value.clone());
                    continue;
                }
                // Variable not provided: treat the argument as absent
            } else {
                let coerced_value =
                    coerce_constant(schema, variable_values, location, site, &arg_def.ty, value)?;
                coerced_values.insert(arg_name.as_str(), coerced_value);
                continue;
            }
        }
        if let Some(default) = &arg_def.default_value {
            let value =
                coerce_constant(schema, &JsonMap::new(), location, site, &arg_def.ty, default)?;
            coerced_values.insert(arg_name.as_str(), value);
            continue;
        }
        if arg_def.ty.is_non_null() {
            coercion_error!(
                location,
                "missing value for required argument {arg_name} of type {}",
                arg_def.ty
            )
        }
    }
    Ok(coerced_values)
}

/// Coerce a value literal from a document, such as an argument or a default value.
/// Variables nested inside list and input object literals are replaced by their value.
fn coerce_constant(
    schema: &Schema,
    variable_values: &JsonMap,
    location: Option<GraphQLLocation>,
    site: Site<'_>,
    ty: &Type,
    value: &Value,
) -> Result<JsonValue, InputCoercionError> {
    if value.is_null() {
        if ty.is_non_null() {
            coercion_error!(location, "null value for non-null {site}")
        } else {
            return Ok(JsonValue::Null);
        }
    }
    if let Some(var_name) = value.as_variable() {
        return match variable_values.get(var_name.as_str()) {
            Some(var_value) if var_value.is_null() && ty.is_non_null() => {
                coercion_error!(location, "null variable value for non-null {site}")
            }
            Some(var_value) => Ok(var_value.clone()),
            None if ty.is_non_null() => {
                coercion_error!(location, "missing variable for non-null {site}")
            }
            None => Ok(JsonValue::Null),
        };
    }
    let ty_name = match ty {
        Type::List(inner) | Type::NonNullList(inner) => {
            // https://spec.graphql.org/October2021/#sec-List.Input-Coercion
            let items = match value {
                Value::List(items) => items.as_slice(),
                // If not a list, treat the value as a list of size one:
                _ => std::slice::from_ref(value),
            };
            return items
                .iter()
                .map(|item| coerce_constant(schema, variable_values, location, site, inner, item))
                .collect();
        }
        Type::Named(ty_name) | Type::NonNullNamed(ty_name) => ty_name,
    };
    let Some(ty_def) = schema.types.get(ty_name) else {
        coercion_error!(location, "undefined type {ty_name} for {site}")
    };
    match (ty_def, value) {
        (ExtendedType::Scalar(_), _) => match (ty_name.as_str(), value) {
            ("Int", Value::Int(int)) => {
                if let Some(int) = int.try_to_i32() {
                    return Ok(int.into());
                }
                coercion_error!(location, "Int cannot represent {} for {site}", int.as_str())
            }
            ("Float", Value::Int(int)) => {
                if let Some(float) = int.try_to_f64() {
                    return Ok(float.into());
                }
            }
            ("Float", Value::Float(float)) => {
                if let Some(float) = float.try_to_f64() {
                    return Ok(float.into());
                }
                coercion_error!(location, "Float value overflow in {site}")
            }
            ("String", Value::String(str)) => return Ok(str.as_str().into()),
            ("Boolean", Value::Boolean(bool)) => return Ok((*bool).into()),
            ("ID", Value::String(str)) => return Ok(str.as_str().into()),
            ("ID", Value::Int(int)) => return Ok(int.as_str().into()),
            ("Int" | "Float" | "String" | "Boolean" | "ID", _) => {}
            // Custom scalars are passed through, with nested variables substituted
            _ => return constant_to_json(variable_values, location, site, value),
        },
        (ExtendedType::Enum(ty_def), Value::Enum(value_name)) => {
            // https://spec.graphql.org/October2021/#sec-Enums.Input-Coercion
            if ty_def.values.contains_key(value_name) {
                return Ok(value_name.as_str().into());
            }
        }
        (ExtendedType::InputObject(ty_def), Value::Object(object)) => {
            // https://spec.graphql.org/October2021/#sec-Input-Objects.Input-Coercion
            if let Some((key, _value)) = object
                .iter()
                .find(|(key, _value)| !ty_def.fields.contains_key(key))
            {
                coercion_error!(location, "input object has key {key} not in type {ty_name}")
            }
            let mut coerced_object = JsonMap::with_capacity(ty_def.fields.len());
            for (field_name, field_def) in &ty_def.fields {
                let field_site = Site::input_field(ty_name, field_name);
                let field_value = object
                    .iter()
                    .find(|(key, _value)| key == field_name)
                    .map(|(_key, value)| value)
                    // A nested variable that was not provided counts as absent
                    .filter(|value| {
                        value
                            .as_variable()
                            .map_or(true, |var| variable_values.contains_key(var.as_str()))
                    });
                if let Some(field_value) = field_value {
                    let coerced_value = coerce_constant(
                        schema,
                        variable_values,
                        location,
                        field_site,
                        &field_def.ty,
                        field_value,
                    )?;
                    coerced_object.insert(field_name.as_str(), coerced_value);
                } else if let Some(default) = &field_def.default_value {
                    let default = coerce_constant(
                        schema,
                        &JsonMap::new(),
                        location,
                        field_site,
                        &field_def.ty,
                        default,
                    )?;
                    coerced_object.insert(field_name.as_str(), default);
                } else if field_def.ty.is_non_null() {
                    coercion_error!(
                        location,
                        "missing value for non-null input object field {ty_name}.{field_name}"
                    )
                } else {
                    // Field not required
                }
            }
            return Ok(coerced_object.into());
        }
        (ExtendedType::Object(_) | ExtendedType::Interface(_) | ExtendedType::Union(_), _) => {
            coercion_error!(location, "non-input type {ty_name} for {site}")
        }
        (ExtendedType::Enum(_) | ExtendedType::InputObject(_), _) => {}
    }
    coercion_error!(location, "could not coerce {site}: {value} to type {ty_name}")
}

/// Convert a literal to JSON as-is, for custom scalars
fn constant_to_json(
    variable_values: &JsonMap,
    location: Option<GraphQLLocation>,
    site: Site<'_>,
    value: &Value,
) -> Result<JsonValue, InputCoercionError> {
    Ok(match value {
        Value::Variable(var_name) => variable_values
            .get(var_name.as_str())
            .cloned()
            .unwrap_or(JsonValue::Null),
        Value::List(items) => items
            .iter()
            .map(|item| constant_to_json(variable_values, location, site, item))
            .collect::<Result<_, _>>()?,
        Value::Object(fields) => {
            let mut map = JsonMap::with_capacity(fields.len());
            for (key, value) in fields {
                map.insert(key.as_str(), constant_to_json(variable_values, location, site, value)?);
            }
            map.into()
        }
        _ => match value.to_json() {
            Some(json) => json,
            None => coercion_error!(location, "number overflow in {site}"),
        },
    })
}
