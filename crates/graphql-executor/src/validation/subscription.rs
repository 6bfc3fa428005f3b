use crate::execution::collect_fields;
use crate::response::GraphQLError;
use crate::validation::ValidationContext;
use crate::validation::ValidationRule;

/// Subscription operations select exactly one root field, which is not an introspection field
///
/// Fields are collected the same way execution does,
/// with the request's variables for `@skip` and `@include`.
///
/// <https://spec.graphql.org/October2021/#sec-Single-root-field>
#[derive(Debug, Clone, Copy)]
pub struct SingleRootField;

impl ValidationRule for SingleRootField {
    fn name(&self) -> &'static str {
        "SingleRootField"
    }

    fn check(&self, ctx: &ValidationContext<'_>, errors: &mut Vec<GraphQLError>) {
        for operation in ctx.document.operations() {
            if !operation.is_subscription() {
                continue;
            }
            let Some(root_type) = operation
                .object_type(ctx.schema)
                .and_then(|name| ctx.schema.get_object(name))
            else {
                continue;
            };
            let grouped_field_set = collect_fields(
                ctx.schema,
                ctx.document,
                ctx.variable_values,
                root_type,
                &operation.selection_set.selections,
            );
            let subject = match &operation.name {
                Some(name) => format!("subscription `{name}`"),
                None => "anonymous subscription".to_owned(),
            };
            if grouped_field_set.len() != 1 {
                errors.push(GraphQLError::new(
                    format!(
                        "{subject} must select only one top level field, found {}",
                        grouped_field_set.len()
                    ),
                    operation.location,
                ));
                continue;
            }
            let introspection_fields = grouped_field_set
                .values()
                .flatten()
                .filter(|field| field.name.starts_with("__"));
            for field in introspection_fields {
                errors.push(GraphQLError::new(
                    format!(
                        "{subject} must not select an introspection top level field, found `{}`",
                        field.name
                    ),
                    field.location,
                ))
            }
        }
    }
}
