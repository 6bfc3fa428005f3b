use super::*;
use crate::diagnostic::Diagnostic;
use crate::from_cst::arguments;
use crate::from_cst::collect;
use crate::from_cst::directives;
use crate::from_cst::Convert;
use crate::parser::location_of;
use crate::parser::parse_document;
use crate::parser::SourceFile;
use apollo_parser::cst;
use apollo_parser::cst::CstNode;

#[derive(thiserror::Error, Debug, Clone)]
enum BuildError {
    #[error("an executable document must not contain {describe}")]
    TypeSystemDefinition { describe: &'static str },

    #[error("anonymous operation cannot be selected when the document contains other operations")]
    AmbiguousAnonymousOperation,

    #[error("the operation `{name}` is defined multiple times in the document")]
    OperationNameCollision { name: Name },

    #[error("the fragment `{name}` is defined multiple times in the document")]
    FragmentNameCollision { name: Name },
}

pub(super) fn build_document(
    source_text: String,
    path: &Path,
) -> Result<ExecutableDocument, DiagnosticList> {
    use cst::Definition as D;

    let source = SourceFile::new(path, source_text);
    let mut errors = DiagnosticList::new();
    let cst = parse_document(&source, &mut errors);
    let mut document = ExecutableDocument::default();
    let mut anonymous_count = 0;
    for definition in cst.definitions() {
        let (error, location) = match &definition {
            D::OperationDefinition(def) => {
                let Some(operation) = def.convert(&source) else {
                    continue;
                };
                match operation.name.clone() {
                    Some(name) => {
                        if document.named_operations.contains_key(&name) {
                            (
                                BuildError::OperationNameCollision { name },
                                operation.location,
                            )
                        } else {
                            document.named_operations.insert(name, operation);
                            continue;
                        }
                    }
                    None => {
                        anonymous_count += 1;
                        if document.anonymous_operation.is_some() {
                            (BuildError::AmbiguousAnonymousOperation, operation.location)
                        } else {
                            document.anonymous_operation = Some(operation);
                            continue;
                        }
                    }
                }
            }
            D::FragmentDefinition(def) => {
                let Some(fragment) = def.convert(&source) else {
                    continue;
                };
                if document.fragments.contains_key(&fragment.name) {
                    (
                        BuildError::FragmentNameCollision {
                            name: fragment.name.clone(),
                        },
                        fragment.location,
                    )
                } else {
                    document.fragments.insert(fragment.name.clone(), fragment);
                    continue;
                }
            }
            D::DirectiveDefinition(def) => (
                BuildError::TypeSystemDefinition {
                    describe: "a directive definition",
                },
                location_of(&source, def),
            ),
            D::SchemaDefinition(def) => (
                BuildError::TypeSystemDefinition {
                    describe: "a schema definition",
                },
                location_of(&source, def),
            ),
            D::SchemaExtension(def) => (
                BuildError::TypeSystemDefinition {
                    describe: "a schema extension",
                },
                location_of(&source, def),
            ),
            D::ScalarTypeDefinition(_)
            | D::ObjectTypeDefinition(_)
            | D::InterfaceTypeDefinition(_)
            | D::UnionTypeDefinition(_)
            | D::EnumTypeDefinition(_)
            | D::InputObjectTypeDefinition(_) => (
                BuildError::TypeSystemDefinition {
                    describe: "a type definition",
                },
                source.node_location(definition.syntax()),
            ),
            D::ScalarTypeExtension(_)
            | D::ObjectTypeExtension(_)
            | D::InterfaceTypeExtension(_)
            | D::UnionTypeExtension(_)
            | D::EnumTypeExtension(_)
            | D::InputObjectTypeExtension(_) => (
                BuildError::TypeSystemDefinition {
                    describe: "a type extension",
                },
                source.node_location(definition.syntax()),
            ),
        };
        errors.push(Diagnostic::new(error.to_string(), location))
    }
    if anonymous_count > 0 && !document.named_operations.is_empty() {
        let location = document
            .anonymous_operation
            .as_ref()
            .and_then(|operation| operation.location);
        errors.push(Diagnostic::new(
            BuildError::AmbiguousAnonymousOperation.to_string(),
            location,
        ))
    }
    errors.into_result(document)
}

impl Convert for cst::OperationDefinition {
    type Target = Operation;

    fn convert(&self, source: &SourceFile) -> Option<Self::Target> {
        let operation_type = if let Some(ty) = self.operation_type() {
            ty.convert(source)?
        } else {
            OperationType::Query
        };
        Some(Operation {
            operation_type,
            name: self.name().convert(source)?,
            variables: self
                .variable_definitions()
                .map(|list| collect(source, list.variable_definitions()))
                .unwrap_or_default(),
            directives: directives(source, self.directives()),
            selection_set: self.selection_set()?.convert(source)?,
            location: location_of(source, self),
        })
    }
}

impl Convert for cst::FragmentDefinition {
    type Target = Fragment;

    fn convert(&self, source: &SourceFile) -> Option<Self::Target> {
        Some(Fragment {
            name: self.fragment_name()?.name()?.convert(source)?,
            type_condition: self.type_condition()?.convert(source)?,
            directives: directives(source, self.directives()),
            selection_set: self.selection_set()?.convert(source)?,
            location: location_of(source, self),
        })
    }
}

impl Convert for cst::TypeCondition {
    type Target = Name;

    fn convert(&self, source: &SourceFile) -> Option<Self::Target> {
        self.named_type()?.name()?.convert(source)
    }
}

impl Convert for cst::VariableDefinition {
    type Target = VariableDefinition;

    fn convert(&self, source: &SourceFile) -> Option<Self::Target> {
        let default_value = if let Some(default) = self.default_value() {
            Some(default.value()?.convert(source)?)
        } else {
            None
        };
        Some(VariableDefinition {
            name: self.variable()?.name()?.convert(source)?,
            ty: self.ty()?.convert(source)?,
            default_value,
            directives: directives(source, self.directives()),
            location: location_of(source, self),
        })
    }
}

impl Convert for cst::SelectionSet {
    type Target = SelectionSet;

    fn convert(&self, source: &SourceFile) -> Option<Self::Target> {
        Some(SelectionSet {
            selections: collect(source, self.selections()),
        })
    }
}

impl Convert for cst::Selection {
    type Target = Selection;

    fn convert(&self, source: &SourceFile) -> Option<Self::Target> {
        Some(match self {
            cst::Selection::Field(x) => Selection::Field(x.convert(source)?),
            cst::Selection::FragmentSpread(x) => Selection::FragmentSpread(x.convert(source)?),
            cst::Selection::InlineFragment(x) => Selection::InlineFragment(x.convert(source)?),
        })
    }
}

impl Convert for cst::Field {
    type Target = Field;

    fn convert(&self, source: &SourceFile) -> Option<Self::Target> {
        let name = self.name()?;
        Some(Field {
            alias: self.alias().convert(source)?,
            name: name.convert(source)?,
            arguments: arguments(source, self.arguments()),
            directives: directives(source, self.directives()),
            // Use an empty selection set for a leaf field
            selection_set: self.selection_set().convert(source)?.unwrap_or_default(),
            // Errors point at the field name rather than a preceding alias
            location: location_of(source, &name),
        })
    }
}

impl Convert for cst::Alias {
    type Target = Name;

    fn convert(&self, source: &SourceFile) -> Option<Self::Target> {
        self.name()?.convert(source)
    }
}

impl Convert for cst::FragmentSpread {
    type Target = FragmentSpread;

    fn convert(&self, source: &SourceFile) -> Option<Self::Target> {
        Some(FragmentSpread {
            fragment_name: self.fragment_name()?.name()?.convert(source)?,
            directives: directives(source, self.directives()),
            location: location_of(source, self),
        })
    }
}

impl Convert for cst::InlineFragment {
    type Target = InlineFragment;

    fn convert(&self, source: &SourceFile) -> Option<Self::Target> {
        Some(InlineFragment {
            type_condition: self.type_condition().convert(source)?,
            directives: directives(source, self.directives()),
            selection_set: self.selection_set()?.convert(source)?,
            location: location_of(source, self),
        })
    }
}
