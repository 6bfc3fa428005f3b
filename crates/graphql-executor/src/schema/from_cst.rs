use super::*;
use crate::diagnostic::Diagnostic;
use crate::from_cst::collect;
use crate::from_cst::directives;
use crate::from_cst::Convert;
use crate::parser::location_of;
use crate::parser::parse_document;
use crate::parser::SourceFile;
use apollo_parser::cst;
use apollo_parser::cst::CstNode;
use apollo_parser::S;

/// A schema definition or reference that could not be built
#[derive(thiserror::Error, Debug, Clone)]
pub(crate) enum BuildError {
    #[error("a schema document must not contain {describe}")]
    ExecutableDefinition { describe: &'static str },

    #[error("must not have multiple `schema` definitions")]
    SchemaDefinitionCollision,

    #[error("the {operation_type} root operation type is defined multiple times")]
    RootOperationCollision { operation_type: OperationType },

    #[error("the directive `@{name}` is defined multiple times in the schema")]
    DirectiveDefinitionCollision { name: Name },

    #[error("the type `{name}` is defined multiple times in the schema")]
    TypeDefinitionCollision { name: Name },

    #[error("built-in scalar definitions must be omitted")]
    BuiltInScalarTypeRedefinition,

    #[error("duplicate definitions for the `{name}` {describe} of {parent}")]
    DuplicateMember {
        name: Name,
        describe: &'static str,
        parent: Name,
    },

    #[error("type extension for undefined type `{name}`")]
    OrphanTypeExtension { name: Name },

    #[error("adding {describe_ext}, but `{name}` is {describe_def}")]
    TypeExtensionKindMismatch {
        name: Name,
        describe_ext: &'static str,
        describe_def: &'static str,
    },

    #[error("cannot find type `{name}` referenced by `{coordinate}`")]
    UndefinedType { name: Name, coordinate: String },

    #[error("`{coordinate}` must have an output type, but `{name}` is an input object type")]
    NotAnOutputType { name: Name, coordinate: String },

    #[error("`{coordinate}` must have an input type, but `{name}` is {describe}")]
    NotAnInputType {
        name: Name,
        coordinate: String,
        describe: &'static str,
    },

    #[error("`{implementer}` implements `{name}`, but `{name}` is {describe}, not an interface")]
    NotAnInterface {
        name: Name,
        implementer: Name,
        describe: &'static str,
    },

    #[error("`{implementer}` implements `{interface}` but does not define its field `{field}`")]
    MissingInterfaceField {
        implementer: Name,
        interface: Name,
        field: Name,
    },

    #[error("member `{name}` of union `{union_name}` is {describe}, not an object type")]
    UnionMemberNotAnObject {
        name: Name,
        union_name: Name,
        describe: &'static str,
    },

    #[error("the {operation_type} root operation type `{name}` is not a defined object type")]
    RootOperationNotAnObject {
        name: Name,
        operation_type: OperationType,
    },
}

struct SchemaBuilder<'a> {
    source: &'a SourceFile,
    schema: Schema,
    errors: DiagnosticList,
    has_schema_definition: bool,
    /// Built-in directives that were replaced by an explicit definition
    redefined_directives: HashSet<Name>,
    root_locations: HashMap<OperationType, Option<GraphQLLocation>>,
    /// Applied once all definitions are known, regardless of source order
    extensions: Vec<cst::Definition>,
}

pub(super) fn build_schema(source_text: String, path: &Path) -> Result<Schema, DiagnosticList> {
    let source = SourceFile::new(path, source_text);
    let mut errors = DiagnosticList::new();
    let document = parse_document(&source, &mut errors);
    let mut builder = SchemaBuilder {
        source: &source,
        schema: Schema::new(),
        errors,
        has_schema_definition: false,
        redefined_directives: HashSet::new(),
        root_locations: HashMap::new(),
        extensions: Vec::new(),
    };
    // Phase 1: declare every definition by name
    for definition in document.definitions() {
        builder.add_definition(definition)
    }
    for extension in std::mem::take(&mut builder.extensions) {
        builder.add_extension(&extension)
    }
    builder.add_default_root_operations();

    // Phase 2: resolve every named reference against the complete set of types
    let SchemaBuilder {
        schema,
        mut errors,
        root_locations,
        ..
    } = builder;
    for (error, location) in check_references(&schema, &root_locations) {
        errors.push(Diagnostic::new(error.to_string(), location))
    }
    errors.into_result(schema)
}

impl SchemaBuilder<'_> {
    fn error(&mut self, error: BuildError, location: Option<GraphQLLocation>) {
        self.errors
            .push(Diagnostic::new(error.to_string(), location))
    }

    fn add_definition(&mut self, definition: cst::Definition) {
        use cst::Definition as D;
        let source = self.source;
        match &definition {
            D::OperationDefinition(def) => self.error(
                BuildError::ExecutableDefinition {
                    describe: "an operation definition",
                },
                location_of(source, def),
            ),
            D::FragmentDefinition(def) => self.error(
                BuildError::ExecutableDefinition {
                    describe: "a fragment definition",
                },
                location_of(source, def),
            ),
            D::SchemaDefinition(def) => self.add_schema_definition(def),
            D::DirectiveDefinition(def) => self.add_directive_definition(def),
            D::ScalarTypeDefinition(def) => {
                let Some(name) = convert_name(source, def.name()) else {
                    return;
                };
                let ty = ScalarType {
                    description: description(source, def.description()),
                    name,
                    directives: directives(source, def.directives()),
                    location: location_of(source, def),
                };
                self.insert_type(ExtendedType::Scalar(ty))
            }
            D::ObjectTypeDefinition(def) => {
                let Some(name) = convert_name(source, def.name()) else {
                    return;
                };
                let mut ty = ObjectType {
                    description: description(source, def.description()),
                    name,
                    implements_interfaces: IndexSet::new(),
                    directives: directives(source, def.directives()),
                    fields: IndexMap::new(),
                    location: location_of(source, def),
                };
                add_interfaces(
                    source,
                    def.implements_interfaces(),
                    &mut ty.implements_interfaces,
                );
                add_fields(
                    source,
                    &mut self.errors,
                    &ty.name,
                    def.fields_definition(),
                    &mut ty.fields,
                );
                self.insert_type(ExtendedType::Object(ty))
            }
            D::InterfaceTypeDefinition(def) => {
                let Some(name) = convert_name(source, def.name()) else {
                    return;
                };
                let mut ty = InterfaceType {
                    description: description(source, def.description()),
                    name,
                    implements_interfaces: IndexSet::new(),
                    directives: directives(source, def.directives()),
                    fields: IndexMap::new(),
                    location: location_of(source, def),
                };
                add_interfaces(
                    source,
                    def.implements_interfaces(),
                    &mut ty.implements_interfaces,
                );
                add_fields(
                    source,
                    &mut self.errors,
                    &ty.name,
                    def.fields_definition(),
                    &mut ty.fields,
                );
                self.insert_type(ExtendedType::Interface(ty))
            }
            D::UnionTypeDefinition(def) => {
                let Some(name) = convert_name(source, def.name()) else {
                    return;
                };
                let mut ty = UnionType {
                    description: description(source, def.description()),
                    name,
                    directives: directives(source, def.directives()),
                    members: IndexSet::new(),
                    location: location_of(source, def),
                };
                add_members(source, def.union_member_types(), &mut ty.members);
                self.insert_type(ExtendedType::Union(ty))
            }
            D::EnumTypeDefinition(def) => {
                let Some(name) = convert_name(source, def.name()) else {
                    return;
                };
                let mut ty = EnumType {
                    description: description(source, def.description()),
                    name,
                    directives: directives(source, def.directives()),
                    values: IndexMap::new(),
                    location: location_of(source, def),
                };
                add_enum_values(
                    source,
                    &mut self.errors,
                    &ty.name,
                    def.enum_values_definition(),
                    &mut ty.values,
                );
                self.insert_type(ExtendedType::Enum(ty))
            }
            D::InputObjectTypeDefinition(def) => {
                let Some(name) = convert_name(source, def.name()) else {
                    return;
                };
                let mut ty = InputObjectType {
                    description: description(source, def.description()),
                    name,
                    directives: directives(source, def.directives()),
                    fields: IndexMap::new(),
                    location: location_of(source, def),
                };
                add_input_fields(
                    source,
                    &mut self.errors,
                    &ty.name,
                    def.input_fields_definition(),
                    &mut ty.fields,
                );
                self.insert_type(ExtendedType::InputObject(ty))
            }
            D::SchemaExtension(_)
            | D::ScalarTypeExtension(_)
            | D::ObjectTypeExtension(_)
            | D::InterfaceTypeExtension(_)
            | D::UnionTypeExtension(_)
            | D::EnumTypeExtension(_)
            | D::InputObjectTypeExtension(_) => self.extensions.push(definition.clone()),
        }
    }

    fn insert_type(&mut self, ty: ExtendedType) {
        let name = ty.name().clone();
        if let Some(previous) = self.schema.types.get(&name) {
            let error = if previous.is_built_in_scalar() {
                BuildError::BuiltInScalarTypeRedefinition
            } else {
                BuildError::TypeDefinitionCollision { name }
            };
            self.error(error, ty.location());
            return;
        }
        self.schema.types.insert(name, ty);
    }

    fn add_schema_definition(&mut self, def: &cst::SchemaDefinition) {
        let location = location_of(self.source, def);
        if self.has_schema_definition {
            self.error(BuildError::SchemaDefinitionCollision, location);
            return;
        }
        self.has_schema_definition = true;
        self.schema.schema_definition.description = description(self.source, def.description());
        self.add_root_operations(def.root_operation_type_definitions())
    }

    fn add_root_operations(
        &mut self,
        definitions: impl Iterator<Item = cst::RootOperationTypeDefinition>,
    ) {
        for def in definitions {
            let Some(operation_type) = def
                .operation_type()
                .and_then(|ty| ty.convert(self.source))
            else {
                continue;
            };
            let Some(name) = convert_name(self.source, def.named_type().and_then(|ty| ty.name()))
            else {
                continue;
            };
            let location = location_of(self.source, &def);
            if self.schema.root_operation(operation_type).is_some() {
                self.error(
                    BuildError::RootOperationCollision { operation_type },
                    location,
                );
                continue;
            }
            let definition = &mut self.schema.schema_definition;
            *match operation_type {
                OperationType::Query => &mut definition.query,
                OperationType::Mutation => &mut definition.mutation,
                OperationType::Subscription => &mut definition.subscription,
            } = Some(name);
            self.root_locations.insert(operation_type, location);
        }
    }

    /// Without a `schema` definition, root operation types are found by their conventional name
    fn add_default_root_operations(&mut self) {
        if self.has_schema_definition {
            return;
        }
        for operation_type in [
            OperationType::Query,
            OperationType::Mutation,
            OperationType::Subscription,
        ] {
            let name = operation_type.default_type_name();
            if self.schema.root_operation(operation_type).is_some() {
                continue;
            }
            if let Some(ty) = self.schema.get_object(name) {
                let name = ty.name.clone();
                let definition = &mut self.schema.schema_definition;
                *match operation_type {
                    OperationType::Query => &mut definition.query,
                    OperationType::Mutation => &mut definition.mutation,
                    OperationType::Subscription => &mut definition.subscription,
                } = Some(name);
            }
        }
    }

    fn add_directive_definition(&mut self, def: &cst::DirectiveDefinition) {
        let source = self.source;
        let Some(name) = convert_name(source, def.name()) else {
            return;
        };
        let replaces_built_in = matches!(
            name.as_str(),
            "skip" | "include" | "deprecated" | "specifiedBy"
        ) && !self.redefined_directives.contains(&name);
        if replaces_built_in {
            self.redefined_directives.insert(name.clone());
        } else if self.schema.directive_definitions.contains_key(&name) {
            self.error(
                BuildError::DirectiveDefinitionCollision { name },
                location_of(source, def),
            );
            return;
        }
        let definition = DirectiveDefinition {
            description: description(source, def.description()),
            name: name.clone(),
            arguments: def
                .arguments_definition()
                .map(|list| collect(source, list.input_value_definitions()))
                .unwrap_or_default(),
            repeatable: def.repeatable_token().is_some(),
            locations: def
                .directive_locations()
                .map(|list| collect(source, list.directive_locations()))
                .unwrap_or_default(),
        };
        self.schema.directive_definitions.insert(name, definition);
    }

    fn add_extension(&mut self, definition: &cst::Definition) {
        use cst::Definition as D;
        let source = self.source;
        let (name, location, describe_ext) = match definition {
            D::SchemaExtension(ext) => {
                self.add_root_operations(ext.root_operation_type_definitions());
                return;
            }
            D::ScalarTypeExtension(ext) => (
                ext.name(),
                location_of(source, ext),
                "a scalar type extension",
            ),
            D::ObjectTypeExtension(ext) => (
                ext.name(),
                location_of(source, ext),
                "an object type extension",
            ),
            D::InterfaceTypeExtension(ext) => (
                ext.name(),
                location_of(source, ext),
                "an interface type extension",
            ),
            D::UnionTypeExtension(ext) => (
                ext.name(),
                location_of(source, ext),
                "a union type extension",
            ),
            D::EnumTypeExtension(ext) => (
                ext.name(),
                location_of(source, ext),
                "an enum type extension",
            ),
            D::InputObjectTypeExtension(ext) => (
                ext.name(),
                location_of(source, ext),
                "an input object type extension",
            ),
            _ => return,
        };
        let Some(name) = convert_name(source, name) else {
            return;
        };
        let errors = &mut self.errors;
        let result = match (definition, self.schema.types.get_mut(&name)) {
            (_, None) => Err(BuildError::OrphanTypeExtension { name }),
            (D::ScalarTypeExtension(ext), Some(ExtendedType::Scalar(ty))) => {
                ty.directives
                    .0
                    .extend(directives(source, ext.directives()).0);
                Ok(())
            }
            (D::ObjectTypeExtension(ext), Some(ExtendedType::Object(ty))) => {
                ty.directives
                    .0
                    .extend(directives(source, ext.directives()).0);
                add_interfaces(
                    source,
                    ext.implements_interfaces(),
                    &mut ty.implements_interfaces,
                );
                add_fields(
                    source,
                    errors,
                    &ty.name,
                    ext.fields_definition(),
                    &mut ty.fields,
                );
                Ok(())
            }
            (D::InterfaceTypeExtension(ext), Some(ExtendedType::Interface(ty))) => {
                ty.directives
                    .0
                    .extend(directives(source, ext.directives()).0);
                add_interfaces(
                    source,
                    ext.implements_interfaces(),
                    &mut ty.implements_interfaces,
                );
                add_fields(
                    source,
                    errors,
                    &ty.name,
                    ext.fields_definition(),
                    &mut ty.fields,
                );
                Ok(())
            }
            (D::UnionTypeExtension(ext), Some(ExtendedType::Union(ty))) => {
                ty.directives
                    .0
                    .extend(directives(source, ext.directives()).0);
                add_members(source, ext.union_member_types(), &mut ty.members);
                Ok(())
            }
            (D::EnumTypeExtension(ext), Some(ExtendedType::Enum(ty))) => {
                ty.directives
                    .0
                    .extend(directives(source, ext.directives()).0);
                add_enum_values(
                    source,
                    errors,
                    &ty.name,
                    ext.enum_values_definition(),
                    &mut ty.values,
                );
                Ok(())
            }
            (D::InputObjectTypeExtension(ext), Some(ExtendedType::InputObject(ty))) => {
                ty.directives
                    .0
                    .extend(directives(source, ext.directives()).0);
                add_input_fields(
                    source,
                    errors,
                    &ty.name,
                    ext.input_fields_definition(),
                    &mut ty.fields,
                );
                Ok(())
            }
            (_, Some(ty)) => Err(BuildError::TypeExtensionKindMismatch {
                name,
                describe_ext,
                describe_def: ty.describe(),
            }),
        };
        if let Err(error) = result {
            self.error(error, location)
        }
    }
}

/// Check that every named reference resolves to a type of the expected kind
fn check_references(
    schema: &Schema,
    root_locations: &HashMap<OperationType, Option<GraphQLLocation>>,
) -> Vec<(BuildError, Option<GraphQLLocation>)> {
    let mut errors = Vec::new();
    for ty in schema.types.values() {
        match ty {
            ExtendedType::Object(def) => check_implementer(
                schema,
                &def.name,
                &def.implements_interfaces,
                &def.fields,
                def.location,
                &mut errors,
            ),
            ExtendedType::Interface(def) => check_implementer(
                schema,
                &def.name,
                &def.implements_interfaces,
                &def.fields,
                def.location,
                &mut errors,
            ),
            ExtendedType::Union(def) => {
                for member in &def.members {
                    match schema.types.get(member) {
                        Some(ExtendedType::Object(_)) => {}
                        Some(other) => errors.push((
                            BuildError::UnionMemberNotAnObject {
                                name: member.clone(),
                                union_name: def.name.clone(),
                                describe: other.describe(),
                            },
                            def.location,
                        )),
                        None => errors.push((
                            BuildError::UndefinedType {
                                name: member.clone(),
                                coordinate: def.name.to_string(),
                            },
                            def.location,
                        )),
                    }
                }
            }
            ExtendedType::InputObject(def) => {
                for field in def.fields.values() {
                    check_input_type(
                        schema,
                        &field.ty,
                        format!("{}.{}", def.name, field.name),
                        field.location,
                        &mut errors,
                    )
                }
            }
            ExtendedType::Scalar(_) | ExtendedType::Enum(_) => {}
        }
    }
    for directive in schema.directive_definitions.values() {
        for argument in &directive.arguments {
            check_input_type(
                schema,
                &argument.ty,
                format!("@{}({}:)", directive.name, argument.name),
                argument.location,
                &mut errors,
            )
        }
    }
    for operation_type in [
        OperationType::Query,
        OperationType::Mutation,
        OperationType::Subscription,
    ] {
        if let Some(name) = schema.root_operation(operation_type) {
            if schema.get_object(name).is_none() {
                errors.push((
                    BuildError::RootOperationNotAnObject {
                        name: name.clone(),
                        operation_type,
                    },
                    root_locations.get(&operation_type).copied().flatten(),
                ))
            }
        }
    }
    errors
}

fn check_implementer(
    schema: &Schema,
    name: &Name,
    implements_interfaces: &IndexSet<Name>,
    fields: &IndexMap<Name, FieldDefinition>,
    location: Option<GraphQLLocation>,
    errors: &mut Vec<(BuildError, Option<GraphQLLocation>)>,
) {
    for interface in implements_interfaces {
        match schema.types.get(interface) {
            Some(ExtendedType::Interface(interface_def)) => {
                for field in interface_def.fields.keys() {
                    if !fields.contains_key(field) {
                        errors.push((
                            BuildError::MissingInterfaceField {
                                implementer: name.clone(),
                                interface: interface.clone(),
                                field: field.clone(),
                            },
                            location,
                        ))
                    }
                }
            }
            Some(other) => errors.push((
                BuildError::NotAnInterface {
                    name: interface.clone(),
                    implementer: name.clone(),
                    describe: other.describe(),
                },
                location,
            )),
            None => errors.push((
                BuildError::UndefinedType {
                    name: interface.clone(),
                    coordinate: name.to_string(),
                },
                location,
            )),
        }
    }
    for field in fields.values() {
        let coordinate = format!("{name}.{}", field.name);
        match schema.types.get(field.ty.inner_named_type()) {
            Some(ty) if ty.is_output_type() => {}
            Some(_) => errors.push((
                BuildError::NotAnOutputType {
                    name: field.ty.inner_named_type().clone(),
                    coordinate,
                },
                field.location,
            )),
            None => errors.push((
                BuildError::UndefinedType {
                    name: field.ty.inner_named_type().clone(),
                    coordinate,
                },
                field.location,
            )),
        }
        for argument in &field.arguments {
            check_input_type(
                schema,
                &argument.ty,
                format!("{name}.{}({}:)", field.name, argument.name),
                argument.location,
                errors,
            )
        }
    }
}

fn check_input_type(
    schema: &Schema,
    ty: &Type,
    coordinate: String,
    location: Option<GraphQLLocation>,
    errors: &mut Vec<(BuildError, Option<GraphQLLocation>)>,
) {
    let name = ty.inner_named_type();
    match schema.types.get(name) {
        Some(def) if def.is_input_type() => {}
        Some(def) => errors.push((
            BuildError::NotAnInputType {
                name: name.clone(),
                coordinate,
                describe: def.describe(),
            },
            location,
        )),
        None => errors.push((
            BuildError::UndefinedType {
                name: name.clone(),
                coordinate,
            },
            location,
        )),
    }
}

fn convert_name(source: &SourceFile, name: Option<cst::Name>) -> Option<Name> {
    name?.convert(source)
}

fn description(source: &SourceFile, description: Option<cst::Description>) -> Option<String> {
    description?.convert(source)
}

fn add_interfaces(
    source: &SourceFile,
    cst: Option<cst::ImplementsInterfaces>,
    interfaces: &mut IndexSet<Name>,
) {
    if let Some(cst) = cst {
        interfaces.extend(
            cst.named_types()
                .filter_map(|named| convert_name(source, named.name())),
        )
    }
}

fn add_members(
    source: &SourceFile,
    cst: Option<cst::UnionMemberTypes>,
    members: &mut IndexSet<Name>,
) {
    if let Some(cst) = cst {
        members.extend(
            cst.named_types()
                .filter_map(|named| convert_name(source, named.name())),
        )
    }
}

fn add_fields(
    source: &SourceFile,
    errors: &mut DiagnosticList,
    parent: &Name,
    cst: Option<cst::FieldsDefinition>,
    fields: &mut IndexMap<Name, FieldDefinition>,
) {
    let Some(cst) = cst else { return };
    for def in collect(source, cst.field_definitions()) {
        if fields.contains_key(&def.name) {
            errors.push(duplicate(&def.name, "field", parent, def.location));
            continue;
        }
        fields.insert(def.name.clone(), def);
    }
}

fn add_input_fields(
    source: &SourceFile,
    errors: &mut DiagnosticList,
    parent: &Name,
    cst: Option<cst::InputFieldsDefinition>,
    fields: &mut IndexMap<Name, InputValueDefinition>,
) {
    let Some(cst) = cst else { return };
    for def in collect(source, cst.input_value_definitions()) {
        if fields.contains_key(&def.name) {
            errors.push(duplicate(&def.name, "input field", parent, def.location));
            continue;
        }
        fields.insert(def.name.clone(), def);
    }
}

fn add_enum_values(
    source: &SourceFile,
    errors: &mut DiagnosticList,
    parent: &Name,
    cst: Option<cst::EnumValuesDefinition>,
    values: &mut IndexMap<Name, EnumValueDefinition>,
) {
    let Some(cst) = cst else { return };
    for def in cst.enum_value_definitions() {
        let location = location_of(source, &def);
        let Some(def) = def.convert(source) else {
            continue;
        };
        if values.contains_key(&def.value) {
            errors.push(duplicate(&def.value, "value", parent, location));
            continue;
        }
        values.insert(def.value.clone(), def);
    }
}

fn duplicate(
    name: &Name,
    describe: &'static str,
    parent: &Name,
    location: Option<GraphQLLocation>,
) -> Diagnostic {
    let error = BuildError::DuplicateMember {
        name: name.clone(),
        describe,
        parent: parent.clone(),
    };
    Diagnostic::new(error.to_string(), location)
}

impl Convert for cst::FieldDefinition {
    type Target = FieldDefinition;

    fn convert(&self, source: &SourceFile) -> Option<Self::Target> {
        Some(FieldDefinition {
            description: self.description().convert(source)?,
            name: self.name()?.convert(source)?,
            arguments: self
                .arguments_definition()
                .map(|list| collect(source, list.input_value_definitions()))
                .unwrap_or_default(),
            ty: self.ty()?.convert(source)?,
            directives: directives(source, self.directives()),
            location: location_of(source, self),
        })
    }
}

impl Convert for cst::InputValueDefinition {
    type Target = InputValueDefinition;

    fn convert(&self, source: &SourceFile) -> Option<Self::Target> {
        let default_value = if let Some(default) = self.default_value() {
            Some(default.value()?.convert(source)?)
        } else {
            None
        };
        Some(InputValueDefinition {
            description: self.description().convert(source)?,
            name: self.name()?.convert(source)?,
            ty: self.ty()?.convert(source)?,
            default_value,
            directives: directives(source, self.directives()),
            location: location_of(source, self),
        })
    }
}

impl Convert for cst::EnumValueDefinition {
    type Target = EnumValueDefinition;

    fn convert(&self, source: &SourceFile) -> Option<Self::Target> {
        Some(EnumValueDefinition {
            description: self.description().convert(source)?,
            value: self.enum_value()?.name()?.convert(source)?,
            directives: directives(source, self.directives()),
        })
    }
}

impl Convert for cst::DirectiveLocation {
    type Target = DirectiveLocation;

    fn convert(&self, _source: &SourceFile) -> Option<Self::Target> {
        let token = self.syntax().first_token()?;
        match token.kind() {
            S![QUERY] => Some(DirectiveLocation::Query),
            S![MUTATION] => Some(DirectiveLocation::Mutation),
            S![SUBSCRIPTION] => Some(DirectiveLocation::Subscription),
            S![FIELD] => Some(DirectiveLocation::Field),
            S![FRAGMENT_DEFINITION] => Some(DirectiveLocation::FragmentDefinition),
            S![FRAGMENT_SPREAD] => Some(DirectiveLocation::FragmentSpread),
            S![INLINE_FRAGMENT] => Some(DirectiveLocation::InlineFragment),
            S![VARIABLE_DEFINITION] => Some(DirectiveLocation::VariableDefinition),
            S![SCHEMA] => Some(DirectiveLocation::Schema),
            S![SCALAR] => Some(DirectiveLocation::Scalar),
            S![OBJECT] => Some(DirectiveLocation::Object),
            S![FIELD_DEFINITION] => Some(DirectiveLocation::FieldDefinition),
            S![ARGUMENT_DEFINITION] => Some(DirectiveLocation::ArgumentDefinition),
            S![INTERFACE] => Some(DirectiveLocation::Interface),
            S![UNION] => Some(DirectiveLocation::Union),
            S![ENUM] => Some(DirectiveLocation::Enum),
            S![ENUM_VALUE] => Some(DirectiveLocation::EnumValue),
            S![INPUT_OBJECT] => Some(DirectiveLocation::InputObject),
            S![INPUT_FIELD_DEFINITION] => Some(DirectiveLocation::InputFieldDefinition),
            _ => None,
        }
    }
}
