//! Checks on an executable document, run before execution starts
//!
//! A [`Validator`] holds a list of [`ValidationRule`]s.
//! [`Validator::new`] has the rules execution relies on;
//! more rules can be added, or a validator built from scratch with [`Validator::empty`].

use crate::executable::ExecutableDocument;
use crate::executable::Selection;
use crate::response::GraphQLError;
use crate::response::JsonMap;
use crate::Name;
use crate::Schema;

mod field;
mod fragment;
mod subscription;

pub use self::field::FieldsOnCorrectType;
pub use self::field::KnownTypeConditions;
pub use self::field::LeafFieldSelections;
pub use self::fragment::KnownFragmentNames;
pub use self::fragment::NoFragmentCycles;
pub use self::subscription::SingleRootField;

/// One validation rule
pub trait ValidationRule: Send + Sync {
    /// Short name, for logs
    fn name(&self) -> &'static str;

    /// Push an error for every violation of this rule
    fn check(&self, ctx: &ValidationContext<'_>, errors: &mut Vec<GraphQLError>);
}

/// What rules are checked against
pub struct ValidationContext<'a> {
    pub schema: &'a Schema,
    pub document: &'a ExecutableDocument,
    /// Variable values as provided in the request, not coerced yet
    pub variable_values: &'a JsonMap,
}

pub struct Validator {
    rules: Vec<Box<dyn ValidationRule>>,
}

#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<GraphQLError>,
}

impl Validator {
    /// A validator with the default rules
    pub fn new() -> Self {
        Self::empty()
            .rule(KnownFragmentNames)
            .rule(NoFragmentCycles)
            .rule(KnownTypeConditions)
            .rule(FieldsOnCorrectType)
            .rule(LeafFieldSelections)
            .rule(SingleRootField)
    }

    /// A validator without any rule
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Add a rule, checked after those already present
    pub fn rule(mut self, rule: impl ValidationRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn rule_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|rule| rule.name())
    }

    pub fn validate(
        &self,
        schema: &Schema,
        document: &ExecutableDocument,
        variable_values: &JsonMap,
    ) -> ValidationResult {
        let ctx = ValidationContext {
            schema,
            document,
            variable_values,
        };
        let mut errors = Vec::new();
        for rule in &self.rules {
            let before = errors.len();
            rule.check(&ctx, &mut errors);
            if errors.len() > before {
                tracing::debug!(
                    rule = rule.name(),
                    errors = errors.len() - before,
                    "validation rule failed"
                );
            }
        }
        ValidationResult { errors }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.rule_names()).finish()
    }
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Visit every selection of every operation and fragment definition,
/// with the name of the type it is selected on.
///
/// Fragment spreads are not followed: fragment definitions are visited on their own.
/// Selections below a field or type condition that does not resolve to a composite type
/// are skipped.
pub(crate) fn visit_selections<'a>(
    ctx: &ValidationContext<'a>,
    visit: &mut dyn FnMut(&Name, &'a Selection),
) {
    for operation in ctx.document.operations() {
        if let Some(root_type) = operation.object_type(ctx.schema) {
            visit_selection_set(ctx, root_type, &operation.selection_set.selections, visit)
        }
    }
    for fragment in ctx.document.fragments.values() {
        if is_composite(ctx, &fragment.type_condition) {
            visit_selection_set(
                ctx,
                &fragment.type_condition,
                &fragment.selection_set.selections,
                visit,
            )
        }
    }
}

fn visit_selection_set<'a>(
    ctx: &ValidationContext<'a>,
    parent_type: &Name,
    selections: &'a [Selection],
    visit: &mut dyn FnMut(&Name, &'a Selection),
) {
    for selection in selections {
        visit(parent_type, selection);
        match selection {
            Selection::Field(field) => {
                let field_def = ctx.schema.type_field(parent_type, &field.name);
                if let Some(field_def) = field_def
                    .ok()
                    .filter(|def| is_composite(ctx, def.ty.inner_named_type()))
                {
                    visit_selection_set(
                        ctx,
                        field_def.ty.inner_named_type(),
                        &field.selection_set.selections,
                        visit,
                    )
                }
            }
            Selection::InlineFragment(inline) => {
                let type_condition = inline.type_condition.as_ref().unwrap_or(parent_type);
                if is_composite(ctx, type_condition) {
                    visit_selection_set(ctx, type_condition, &inline.selection_set.selections, visit)
                }
            }
            Selection::FragmentSpread(_) => {}
        }
    }
}

fn is_composite(ctx: &ValidationContext<'_>, type_name: &str) -> bool {
    ctx.schema
        .types
        .get(type_name)
        .is_some_and(|ty| ty.is_composite())
}
