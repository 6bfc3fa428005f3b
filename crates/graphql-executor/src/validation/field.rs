use crate::executable::Selection;
use crate::response::GraphQLError;
use crate::schema::ExtendedType;
use crate::validation::visit_selections;
use crate::validation::ValidationContext;
use crate::validation::ValidationRule;

/// Every selected field is defined on the type it is selected on
///
/// <https://spec.graphql.org/October2021/#sec-Field-Selections>
#[derive(Debug, Clone, Copy)]
pub struct FieldsOnCorrectType;

/// Type conditions of fragments name an object, interface, or union type of the schema
///
/// <https://spec.graphql.org/October2021/#sec-Fragment-Spread-Type-Existence>
#[derive(Debug, Clone, Copy)]
pub struct KnownTypeConditions;

/// Fields of a leaf type have no sub-selections, and other fields have some
///
/// <https://spec.graphql.org/October2021/#sec-Leaf-Field-Selections>
#[derive(Debug, Clone, Copy)]
pub struct LeafFieldSelections;

impl ValidationRule for FieldsOnCorrectType {
    fn name(&self) -> &'static str {
        "FieldsOnCorrectType"
    }

    fn check(&self, ctx: &ValidationContext<'_>, errors: &mut Vec<GraphQLError>) {
        visit_selections(ctx, &mut |parent_type, selection| {
            let Selection::Field(field) = selection else {
                return;
            };
            if field.name == "__typename" {
                return;
            }
            if ctx.schema.type_field(parent_type, &field.name).is_err() {
                errors.push(GraphQLError::new(
                    format!("cannot query field `{}` on type `{parent_type}`", field.name),
                    field.location,
                ))
            }
        })
    }
}

impl ValidationRule for KnownTypeConditions {
    fn name(&self) -> &'static str {
        "KnownTypeConditions"
    }

    fn check(&self, ctx: &ValidationContext<'_>, errors: &mut Vec<GraphQLError>) {
        let mut check_condition = |type_condition: &str, location| {
            match ctx.schema.types.get(type_condition) {
                None => errors.push(GraphQLError::new(
                    format!("type condition `{type_condition}` is not defined"),
                    location,
                )),
                Some(ty) if ty.is_leaf() || matches!(ty, ExtendedType::InputObject(_)) => {
                    errors.push(GraphQLError::new(
                        format!(
                            "type condition `{type_condition}` is {}, \
                             fragments can only apply to object, interface, or union types",
                            ty.describe()
                        ),
                        location,
                    ))
                }
                Some(_) => {}
            }
        };
        for fragment in ctx.document.fragments.values() {
            check_condition(&fragment.type_condition, fragment.location)
        }
        let mut inline_conditions = Vec::new();
        visit_selections(ctx, &mut |_, selection| {
            if let Selection::InlineFragment(inline) = selection {
                if let Some(type_condition) = &inline.type_condition {
                    inline_conditions.push((type_condition, inline.location))
                }
            }
        });
        for (type_condition, location) in inline_conditions {
            check_condition(type_condition, location)
        }
    }
}

impl ValidationRule for LeafFieldSelections {
    fn name(&self) -> &'static str {
        "LeafFieldSelections"
    }

    fn check(&self, ctx: &ValidationContext<'_>, errors: &mut Vec<GraphQLError>) {
        visit_selections(ctx, &mut |parent_type, selection| {
            let Selection::Field(field) = selection else {
                return;
            };
            let Ok(field_def) = ctx.schema.type_field(parent_type, &field.name) else {
                // __typename, or reported by `FieldsOnCorrectType`
                return;
            };
            let ty = &field_def.ty;
            let Some(ty_def) = ctx.schema.types.get(ty.inner_named_type()) else {
                return;
            };
            let has_selections = !field.selection_set.is_empty();
            if ty_def.is_leaf() && has_selections {
                errors.push(GraphQLError::new(
                    format!(
                        "field `{}` of type `{ty}` is {} and must not have a selection set",
                        field.name,
                        ty_def.describe()
                    ),
                    field.location,
                ))
            } else if !ty_def.is_leaf() && !has_selections {
                errors.push(GraphQLError::new(
                    format!(
                        "field `{}` of type `{ty}` is {} and must have a selection set",
                        field.name,
                        ty_def.describe()
                    ),
                    field.location,
                ))
            }
        })
    }
}
