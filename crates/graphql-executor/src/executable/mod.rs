//! Executable documents: operations and fragments, as sent by a client

use crate::ast::Argument;
use crate::ast::DirectiveList;
use crate::ast::OperationType;
use crate::ast::Type;
use crate::ast::Value;
use crate::diagnostic::DiagnosticList;
use crate::response::GraphQLLocation;
use crate::Name;
use indexmap::IndexMap;
use std::path::Path;

mod from_cst;

/// Operations and fragments from one executable document
#[derive(Debug, Clone, Default)]
pub struct ExecutableDocument {
    /// The operation without a name, if any.
    /// When present, it is the only operation of a valid document.
    pub anonymous_operation: Option<Operation>,
    pub named_operations: IndexMap<Name, Operation>,
    pub fragments: IndexMap<Name, Fragment>,
}

#[derive(Debug, Clone)]
pub struct Operation {
    pub operation_type: OperationType,
    pub name: Option<Name>,
    pub variables: Vec<VariableDefinition>,
    pub directives: DirectiveList,
    pub selection_set: SelectionSet,
    pub location: Option<GraphQLLocation>,
}

#[derive(Debug, Clone)]
pub struct VariableDefinition {
    pub name: Name,
    pub ty: Type,
    pub default_value: Option<Value>,
    pub directives: DirectiveList,
    pub location: Option<GraphQLLocation>,
}

#[derive(Debug, Clone)]
pub struct Fragment {
    pub name: Name,
    pub type_condition: Name,
    pub directives: DirectiveList,
    pub selection_set: SelectionSet,
    pub location: Option<GraphQLLocation>,
}

#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    pub selections: Vec<Selection>,
}

#[derive(Debug, Clone)]
pub enum Selection {
    Field(Field),
    FragmentSpread(FragmentSpread),
    InlineFragment(InlineFragment),
}

#[derive(Debug, Clone)]
pub struct Field {
    /// The response key if different from the field name
    pub alias: Option<Name>,
    pub name: Name,
    pub arguments: Vec<Argument>,
    pub directives: DirectiveList,
    /// Empty for leaf fields
    pub selection_set: SelectionSet,
    pub location: Option<GraphQLLocation>,
}

#[derive(Debug, Clone)]
pub struct FragmentSpread {
    pub fragment_name: Name,
    pub directives: DirectiveList,
    pub location: Option<GraphQLLocation>,
}

#[derive(Debug, Clone)]
pub struct InlineFragment {
    pub type_condition: Option<Name>,
    pub directives: DirectiveList,
    pub selection_set: SelectionSet,
    pub location: Option<GraphQLLocation>,
}

/// Could not select the operation to execute
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GetOperationError {
    #[error("the document does not contain any operation")]
    NoOperation,
    #[error("the document contains multiple operations, an operation name is required")]
    OperationNameRequired,
    #[error("the document does not contain an operation named `{0}`")]
    NoSuchOperation(String),
}

impl ExecutableDocument {
    /// Parse an executable document.
    ///
    /// Syntax errors, schema definitions, name collisions
    /// and anonymous operations that are not alone are reported together.
    pub fn parse(
        source_text: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<Self, DiagnosticList> {
        from_cst::build_document(source_text.into(), path.as_ref())
    }

    /// Returns the operation with the given name,
    /// or the only operation of the document when `name_request` is `None`.
    ///
    /// <https://spec.graphql.org/October2021/#GetOperation()>
    pub fn get_operation(&self, name_request: Option<&str>) -> Result<&Operation, GetOperationError> {
        if let Some(name) = name_request {
            return self
                .named_operations
                .get(name)
                .ok_or_else(|| GetOperationError::NoSuchOperation(name.to_owned()));
        }
        if let Some(operation) = &self.anonymous_operation {
            if self.named_operations.is_empty() {
                return Ok(operation);
            }
            return Err(GetOperationError::OperationNameRequired);
        }
        let mut iter = self.named_operations.values();
        match (iter.next(), iter.next()) {
            (Some(operation), None) => Ok(operation),
            (None, _) => Err(GetOperationError::NoOperation),
            (Some(_), Some(_)) => Err(GetOperationError::OperationNameRequired),
        }
    }

    /// Iterate over all operations, the anonymous one first
    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        self.anonymous_operation
            .iter()
            .chain(self.named_operations.values())
    }
}

impl Operation {
    /// Returns the name of the root operation type for this operation in the given schema
    pub fn object_type<'a>(&self, schema: &'a crate::Schema) -> Option<&'a Name> {
        schema.root_operation(self.operation_type)
    }

    pub fn is_mutation(&self) -> bool {
        self.operation_type == OperationType::Mutation
    }

    pub fn is_subscription(&self) -> bool {
        self.operation_type == OperationType::Subscription
    }
}

impl SelectionSet {
    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    /// Iterate over the fields directly in this selection set, ignoring fragments
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.selections.iter().filter_map(|selection| match selection {
            Selection::Field(field) => Some(field),
            Selection::FragmentSpread(_) | Selection::InlineFragment(_) => None,
        })
    }
}

impl Selection {
    pub fn directives(&self) -> &DirectiveList {
        match self {
            Self::Field(sel) => &sel.directives,
            Self::FragmentSpread(sel) => &sel.directives,
            Self::InlineFragment(sel) => &sel.directives,
        }
    }

    pub fn location(&self) -> Option<GraphQLLocation> {
        match self {
            Self::Field(sel) => sel.location,
            Self::FragmentSpread(sel) => sel.location,
            Self::InlineFragment(sel) => sel.location,
        }
    }
}

impl Field {
    /// Returns the response key for this field: the alias if there is one, or the name
    pub fn response_key(&self) -> &Name {
        self.alias.as_ref().unwrap_or(&self.name)
    }

    pub fn argument_by_name(&self, name: &str) -> Option<&Value> {
        self.arguments
            .iter()
            .find(|argument| argument.name == name)
            .map(|argument| &argument.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_selection() {
        let doc = ExecutableDocument::parse("query A { a } query B { b }", "doc.graphql").unwrap();
        assert_eq!(
            doc.get_operation(None).unwrap_err(),
            GetOperationError::OperationNameRequired
        );
        let b = doc.get_operation(Some("B")).unwrap();
        assert_eq!(b.selection_set.fields().next().unwrap().name, "b");
        assert_eq!(
            doc.get_operation(Some("C")).unwrap_err().to_string(),
            "the document does not contain an operation named `C`"
        );

        let doc = ExecutableDocument::parse("{ a: b }", "doc.graphql").unwrap();
        let field = doc
            .get_operation(None)
            .unwrap()
            .selection_set
            .fields()
            .next()
            .unwrap();
        assert_eq!(field.response_key(), "a");
        assert_eq!(field.name, "b");
    }
}
