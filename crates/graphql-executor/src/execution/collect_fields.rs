use crate::ast::Value;
use crate::executable::ExecutableDocument;
use crate::executable::Field;
use crate::executable::Selection;
use crate::response::JsonMap;
use crate::schema::ExtendedType;
use crate::schema::ObjectType;
use crate::Name;
use crate::Schema;
use indexmap::IndexMap;
use std::collections::HashSet;

/// Fields to execute, grouped by response key, in document order
pub(crate) type GroupedFieldSet<'a> = IndexMap<&'a Name, Vec<&'a Field>>;

/// <https://spec.graphql.org/October2021/#CollectFields()>
pub(crate) fn collect_fields<'a>(
    schema: &Schema,
    document: &'a ExecutableDocument,
    variable_values: &JsonMap,
    object_type: &ObjectType,
    selections: impl IntoIterator<Item = &'a Selection>,
) -> GroupedFieldSet<'a> {
    let mut grouped_fields = IndexMap::new();
    collect_fields_into(
        schema,
        document,
        variable_values,
        object_type,
        selections,
        &mut HashSet::new(),
        &mut grouped_fields,
    );
    grouped_fields
}

fn collect_fields_into<'a>(
    schema: &Schema,
    document: &'a ExecutableDocument,
    variable_values: &JsonMap,
    object_type: &ObjectType,
    selections: impl IntoIterator<Item = &'a Selection>,
    visited_fragments: &mut HashSet<&'a Name>,
    grouped_fields: &mut GroupedFieldSet<'a>,
) {
    for selection in selections {
        if !is_included(selection, variable_values) {
            continue;
        }
        match selection {
            Selection::Field(field) => grouped_fields
                .entry(field.response_key())
                .or_default()
                .push(field),
            Selection::FragmentSpread(spread) => {
                let new = visited_fragments.insert(&spread.fragment_name);
                if !new {
                    continue;
                }
                let Some(fragment) = document.fragments.get(&spread.fragment_name) else {
                    continue;
                };
                if !does_fragment_type_apply(schema, object_type, &fragment.type_condition) {
                    continue;
                }
                collect_fields_into(
                    schema,
                    document,
                    variable_values,
                    object_type,
                    &fragment.selection_set.selections,
                    visited_fragments,
                    grouped_fields,
                )
            }
            Selection::InlineFragment(inline) => {
                if let Some(condition) = &inline.type_condition {
                    if !does_fragment_type_apply(schema, object_type, condition) {
                        continue;
                    }
                }
                collect_fields_into(
                    schema,
                    document,
                    variable_values,
                    object_type,
                    &inline.selection_set.selections,
                    visited_fragments,
                    grouped_fields,
                )
            }
        }
    }
}

/// Evaluates `@skip` and `@include` on a selection
pub(crate) fn is_included(selection: &Selection, variable_values: &JsonMap) -> bool {
    !eval_if_arg(selection, "skip", variable_values).unwrap_or(false)
        && eval_if_arg(selection, "include", variable_values).unwrap_or(true)
}

/// <https://spec.graphql.org/October2021/#DoesFragmentTypeApply()>
pub(crate) fn does_fragment_type_apply(
    schema: &Schema,
    object_type: &ObjectType,
    fragment_type: &Name,
) -> bool {
    match schema.types.get(fragment_type) {
        Some(ExtendedType::Object(_)) => *fragment_type == object_type.name,
        Some(ExtendedType::Interface(_)) => {
            object_type.implements_interfaces.contains(fragment_type)
        }
        Some(ExtendedType::Union(def)) => def.members.contains(&object_type.name),
        // Undefined or not an output type: validation catches this
        _ => false,
    }
}

fn eval_if_arg(
    selection: &Selection,
    directive_name: &str,
    variable_values: &JsonMap,
) -> Option<bool> {
    match selection
        .directives()
        .get(directive_name)?
        .argument_by_name("if")?
    {
        Value::Boolean(value) => Some(*value),
        Value::Variable(var) => variable_values.get(var.as_str())?.as_bool(),
        _ => None,
    }
}
