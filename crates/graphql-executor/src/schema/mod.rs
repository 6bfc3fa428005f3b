//! Read-only view of a GraphQL type system
//!
//! Types live in a flat [`IndexMap`] keyed by name.
//! Every reference from one type to another (field types, interfaces, union members)
//! is a [`Name`] looked up in that map, so recursive and mutually recursive types
//! need no special handling.

use crate::ast::DirectiveList;
use crate::ast::OperationType;
use crate::ast::Type;
use crate::ast::Value;
use crate::diagnostic::DiagnosticList;
use crate::response::GraphQLLocation;
use crate::Name;
use indexmap::IndexMap;
use indexmap::IndexSet;
use std::collections::HashMap;
use std::collections::HashSet;
use std::path::Path;

mod from_cst;

/// A GraphQL schema
#[derive(Debug, Clone)]
pub struct Schema {
    /// The `schema` definition and its root operation types
    pub schema_definition: SchemaDefinition,

    /// Built-in and explicit directive definitions
    pub directive_definitions: IndexMap<Name, DirectiveDefinition>,

    /// Definitions and extensions of built-in scalars and explicit types, merged together
    pub types: IndexMap<Name, ExtendedType>,
}

/// The `schema` definition, explicit or implied by the presence of
/// types named `Query`, `Mutation` and `Subscription`
#[derive(Debug, Clone, Default)]
pub struct SchemaDefinition {
    pub description: Option<String>,
    pub query: Option<Name>,
    pub mutation: Option<Name>,
    pub subscription: Option<Name>,
}

/// The definition of a named type, with all its extensions merged in
#[derive(Debug, Clone)]
pub enum ExtendedType {
    Scalar(ScalarType),
    Object(ObjectType),
    Interface(InterfaceType),
    Union(UnionType),
    Enum(EnumType),
    InputObject(InputObjectType),
}

#[derive(Debug, Clone)]
pub struct ScalarType {
    pub description: Option<String>,
    pub name: Name,
    pub directives: DirectiveList,
    pub location: Option<GraphQLLocation>,
}

#[derive(Debug, Clone)]
pub struct ObjectType {
    pub description: Option<String>,
    pub name: Name,
    pub implements_interfaces: IndexSet<Name>,
    pub directives: DirectiveList,
    pub fields: IndexMap<Name, FieldDefinition>,
    pub location: Option<GraphQLLocation>,
}

#[derive(Debug, Clone)]
pub struct InterfaceType {
    pub description: Option<String>,
    pub name: Name,
    pub implements_interfaces: IndexSet<Name>,
    pub directives: DirectiveList,
    pub fields: IndexMap<Name, FieldDefinition>,
    pub location: Option<GraphQLLocation>,
}

#[derive(Debug, Clone)]
pub struct UnionType {
    pub description: Option<String>,
    pub name: Name,
    pub directives: DirectiveList,
    pub members: IndexSet<Name>,
    pub location: Option<GraphQLLocation>,
}

#[derive(Debug, Clone)]
pub struct EnumType {
    pub description: Option<String>,
    pub name: Name,
    pub directives: DirectiveList,
    pub values: IndexMap<Name, EnumValueDefinition>,
    pub location: Option<GraphQLLocation>,
}

#[derive(Debug, Clone)]
pub struct InputObjectType {
    pub description: Option<String>,
    pub name: Name,
    pub directives: DirectiveList,
    pub fields: IndexMap<Name, InputValueDefinition>,
    pub location: Option<GraphQLLocation>,
}

#[derive(Debug, Clone)]
pub struct FieldDefinition {
    pub description: Option<String>,
    pub name: Name,
    pub arguments: Vec<InputValueDefinition>,
    pub ty: Type,
    pub directives: DirectiveList,
    pub location: Option<GraphQLLocation>,
}

/// An argument definition or input object field definition
#[derive(Debug, Clone)]
pub struct InputValueDefinition {
    pub description: Option<String>,
    pub name: Name,
    pub ty: Type,
    pub default_value: Option<Value>,
    pub directives: DirectiveList,
    pub location: Option<GraphQLLocation>,
}

#[derive(Debug, Clone)]
pub struct EnumValueDefinition {
    pub description: Option<String>,
    pub value: Name,
    pub directives: DirectiveList,
}

#[derive(Debug, Clone)]
pub struct DirectiveDefinition {
    pub description: Option<String>,
    pub name: Name,
    pub arguments: Vec<InputValueDefinition>,
    pub repeatable: bool,
    pub locations: Vec<DirectiveLocation>,
}

#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
pub enum DirectiveLocation {
    Query,
    Mutation,
    Subscription,
    Field,
    FragmentDefinition,
    FragmentSpread,
    InlineFragment,
    VariableDefinition,
    Schema,
    Scalar,
    Object,
    FieldDefinition,
    ArgumentDefinition,
    Interface,
    Union,
    Enum,
    EnumValue,
    InputObject,
    InputFieldDefinition,
}

/// The names of all types that implement a given interface.
/// Returned by [`Schema::implementers_map`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Implementers {
    /// Names of the concrete types that implement an interface.
    pub objects: HashSet<Name>,
    /// Names of the interfaces that implement an interface.
    pub interfaces: HashSet<Name>,
}

/// Could not find the requested field definition
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldLookupError {
    #[error("type `{0}` is not defined")]
    NoSuchType(String),
    #[error("type `{type_name}` does not have a field `{field_name}`")]
    NoSuchField {
        type_name: String,
        field_name: String,
    },
}

const BUILT_IN_SCALARS: [(&str, &str); 5] = [
    (
        "Int",
        "The `Int` scalar type represents non-fractional signed whole numeric values. \
         Int can represent values between -(2^31) and 2^31 - 1.",
    ),
    (
        "Float",
        "The `Float` scalar type represents signed double-precision fractional values \
         as specified by IEEE 754.",
    ),
    (
        "String",
        "The `String` scalar type represents textual data, represented as UTF-8 character \
         sequences.",
    ),
    (
        "Boolean",
        "The `Boolean` scalar type represents `true` or `false`.",
    ),
    (
        "ID",
        "The `ID` scalar type represents a unique identifier, often used to refetch an object \
         or as key for a cache.",
    ),
];

impl Schema {
    /// Returns an (almost) empty schema, containing only built-in scalars and directives.
    ///
    /// Each call creates its own copies of these definitions.
    #[allow(clippy::new_without_default)] // not a great implicit default in generic contexts
    pub fn new() -> Self {
        let mut types = IndexMap::new();
        for (name, description) in BUILT_IN_SCALARS {
            let name = Name::new_unchecked(name);
            types.insert(
                name.clone(),
                ExtendedType::Scalar(ScalarType {
                    description: Some(description.to_owned()),
                    name,
                    directives: DirectiveList::default(),
                    location: None,
                }),
            );
        }
        let mut directive_definitions = IndexMap::new();
        for def in built_in_directives() {
            directive_definitions.insert(def.name.clone(), def);
        }
        Self {
            schema_definition: SchemaDefinition::default(),
            directive_definitions,
            types,
        }
    }

    /// Parse SDL source text into a schema.
    ///
    /// Definitions are first declared by name, then every named reference
    /// is checked against the complete set of types.
    /// All problems found are returned together.
    pub fn parse(
        source_text: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<Self, DiagnosticList> {
        from_cst::build_schema(source_text.into(), path.as_ref())
    }

    /// Returns the type with the given name, if it is a scalar type
    pub fn get_scalar(&self, name: &str) -> Option<&ScalarType> {
        if let Some(ExtendedType::Scalar(ty)) = self.types.get(name) {
            Some(ty)
        } else {
            None
        }
    }

    /// Returns the type with the given name, if it is an object type
    pub fn get_object(&self, name: &str) -> Option<&ObjectType> {
        if let Some(ExtendedType::Object(ty)) = self.types.get(name) {
            Some(ty)
        } else {
            None
        }
    }

    /// Returns the type with the given name, if it is an interface type
    pub fn get_interface(&self, name: &str) -> Option<&InterfaceType> {
        if let Some(ExtendedType::Interface(ty)) = self.types.get(name) {
            Some(ty)
        } else {
            None
        }
    }

    /// Returns the type with the given name, if it is a union type
    pub fn get_union(&self, name: &str) -> Option<&UnionType> {
        if let Some(ExtendedType::Union(ty)) = self.types.get(name) {
            Some(ty)
        } else {
            None
        }
    }

    /// Returns the type with the given name, if it is an enum type
    pub fn get_enum(&self, name: &str) -> Option<&EnumType> {
        if let Some(ExtendedType::Enum(ty)) = self.types.get(name) {
            Some(ty)
        } else {
            None
        }
    }

    /// Returns the type with the given name, if it is an input object type
    pub fn get_input_object(&self, name: &str) -> Option<&InputObjectType> {
        if let Some(ExtendedType::InputObject(ty)) = self.types.get(name) {
            Some(ty)
        } else {
            None
        }
    }

    /// Returns the name of the object type for the root operation with the given operation kind
    pub fn root_operation(&self, operation_type: OperationType) -> Option<&Name> {
        match operation_type {
            OperationType::Query => &self.schema_definition.query,
            OperationType::Mutation => &self.schema_definition.mutation,
            OperationType::Subscription => &self.schema_definition.subscription,
        }
        .as_ref()
    }

    /// Returns the definition of a type’s explicit field.
    ///
    /// The `__typename` meta-field has no definition here:
    /// it is answered by the execution engine directly.
    pub fn type_field(
        &self,
        type_name: &str,
        field_name: &str,
    ) -> Result<&FieldDefinition, FieldLookupError> {
        let ty_def = self
            .types
            .get(type_name)
            .ok_or_else(|| FieldLookupError::NoSuchType(type_name.to_owned()))?;
        match ty_def {
            ExtendedType::Object(ty) => ty.fields.get(field_name),
            ExtendedType::Interface(ty) => ty.fields.get(field_name),
            ExtendedType::Scalar(_)
            | ExtendedType::Union(_)
            | ExtendedType::Enum(_)
            | ExtendedType::InputObject(_) => None,
        }
        .ok_or_else(|| FieldLookupError::NoSuchField {
            type_name: type_name.to_owned(),
            field_name: field_name.to_owned(),
        })
    }

    /// Returns a map of interface names to names of types that implement that interface
    ///
    /// `Schema` only stores the inverse relationship
    /// (in [`ObjectType::implements_interfaces`] and [`InterfaceType::implements_interfaces`]),
    /// so iterating the implementers of an interface requires a linear scan
    /// of all types in the schema.
    /// If that is repeated for multiple interfaces,
    /// gathering them all at once amortizes that cost.
    pub fn implementers_map(&self) -> HashMap<Name, Implementers> {
        let mut map = HashMap::<Name, Implementers>::default();
        for (ty_name, ty) in &self.types {
            match ty {
                ExtendedType::Object(def) => {
                    for interface in &def.implements_interfaces {
                        map.entry(interface.clone())
                            .or_default()
                            .objects
                            .insert(ty_name.clone());
                    }
                }
                ExtendedType::Interface(def) => {
                    for interface in &def.implements_interfaces {
                        map.entry(interface.clone())
                            .or_default()
                            .interfaces
                            .insert(ty_name.clone());
                    }
                }
                ExtendedType::Scalar(_)
                | ExtendedType::Union(_)
                | ExtendedType::Enum(_)
                | ExtendedType::InputObject(_) => (),
            };
        }
        map
    }

    /// Returns whether `maybe_subtype` is a subtype of `abstract_type`, which means either:
    ///
    /// * `maybe_subtype` implements the interface `abstract_type`
    /// * `maybe_subtype` is a member of the union type `abstract_type`
    pub fn is_subtype(&self, abstract_type: &str, maybe_subtype: &str) -> bool {
        self.types.get(abstract_type).is_some_and(|ty| match ty {
            ExtendedType::Interface(_) => self.types.get(maybe_subtype).is_some_and(|ty2| {
                match ty2 {
                    ExtendedType::Object(def) => &def.implements_interfaces,
                    ExtendedType::Interface(def) => &def.implements_interfaces,
                    ExtendedType::Scalar(_)
                    | ExtendedType::Union(_)
                    | ExtendedType::Enum(_)
                    | ExtendedType::InputObject(_) => return false,
                }
                .contains(abstract_type)
            }),
            ExtendedType::Union(def) => def.members.contains(maybe_subtype),
            ExtendedType::Scalar(_)
            | ExtendedType::Object(_)
            | ExtendedType::Enum(_)
            | ExtendedType::InputObject(_) => false,
        })
    }

    /// Returns the object types that can be the concrete type of a value of type `type_name`:
    /// the type itself for an object type, implementers for an interface, members for a union.
    pub fn possible_types<'a>(
        &'a self,
        type_name: &'a str,
    ) -> impl Iterator<Item = &'a ObjectType> + 'a {
        let is_object = self.get_object(type_name).is_some();
        self.types.values().filter_map(move |ty| match ty {
            ExtendedType::Object(def) => {
                let applies = if is_object {
                    def.name == type_name
                } else {
                    self.is_subtype(type_name, &def.name)
                };
                applies.then_some(def)
            }
            _ => None,
        })
    }

    /// Returns whether the type `ty` is defined as is an input type
    ///
    /// <https://spec.graphql.org/October2021/#sec-Input-and-Output-Types>
    pub fn is_input_type(&self, ty: &Type) -> bool {
        self.types
            .get(ty.inner_named_type())
            .is_some_and(ExtendedType::is_input_type)
    }

    /// Returns whether the type `ty` is defined as is an output type
    ///
    /// <https://spec.graphql.org/October2021/#sec-Input-and-Output-Types>
    pub fn is_output_type(&self, ty: &Type) -> bool {
        self.types
            .get(ty.inner_named_type())
            .is_some_and(ExtendedType::is_output_type)
    }
}

impl ExtendedType {
    pub fn name(&self) -> &Name {
        match self {
            Self::Scalar(ty) => &ty.name,
            Self::Object(ty) => &ty.name,
            Self::Interface(ty) => &ty.name,
            Self::Union(ty) => &ty.name,
            Self::Enum(ty) => &ty.name,
            Self::InputObject(ty) => &ty.name,
        }
    }

    pub fn location(&self) -> Option<GraphQLLocation> {
        match self {
            Self::Scalar(ty) => ty.location,
            Self::Object(ty) => ty.location,
            Self::Interface(ty) => ty.location,
            Self::Union(ty) => ty.location,
            Self::Enum(ty) => ty.location,
            Self::InputObject(ty) => ty.location,
        }
    }

    /// A word describing the kind of this type, for error messages
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "a scalar type",
            Self::Object(_) => "an object type",
            Self::Interface(_) => "an interface type",
            Self::Union(_) => "a union type",
            Self::Enum(_) => "an enum type",
            Self::InputObject(_) => "an input object type",
        }
    }

    pub fn is_built_in_scalar(&self) -> bool {
        matches!(self, Self::Scalar(ty) if is_built_in_scalar_name(&ty.name))
    }

    /// Interface or union
    pub fn is_abstract(&self) -> bool {
        matches!(self, Self::Interface(_) | Self::Union(_))
    }

    /// Object, interface, or union
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Object(_) | Self::Interface(_) | Self::Union(_))
    }

    /// Scalar or enum
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Scalar(_) | Self::Enum(_))
    }

    pub fn is_input_type(&self) -> bool {
        matches!(self, Self::Scalar(_) | Self::Enum(_) | Self::InputObject(_))
    }

    pub fn is_output_type(&self) -> bool {
        !matches!(self, Self::InputObject(_))
    }
}

pub(crate) fn is_built_in_scalar_name(name: &str) -> bool {
    BUILT_IN_SCALARS.iter().any(|(built_in, _)| *built_in == name)
}

impl FieldDefinition {
    pub fn argument_by_name(&self, name: &str) -> Option<&InputValueDefinition> {
        self.arguments.iter().find(|argument| argument.name == name)
    }

    /// The reason given by a `@deprecated` directive on this field, if any
    pub fn deprecation_reason(&self) -> Option<String> {
        deprecation_reason(&self.directives)
    }
}

impl EnumValueDefinition {
    /// The reason given by a `@deprecated` directive on this value, if any
    pub fn deprecation_reason(&self) -> Option<String> {
        deprecation_reason(&self.directives)
    }
}

fn deprecation_reason(directives: &DirectiveList) -> Option<String> {
    let directive = directives.get("deprecated")?;
    match directive.argument_by_name("reason") {
        Some(Value::String(reason)) => Some(reason.clone()),
        _ => Some("No longer supported".to_owned()),
    }
}

fn built_in_directives() -> Vec<DirectiveDefinition> {
    let if_argument = |description: &str| InputValueDefinition {
        description: Some(description.to_owned()),
        name: Name::new_unchecked("if"),
        ty: Type::NonNullNamed(Name::new_unchecked("Boolean")),
        default_value: None,
        directives: DirectiveList::default(),
        location: None,
    };
    vec![
        DirectiveDefinition {
            description: Some(
                "Directs the executor to skip this field or fragment when the `if` \
                 argument is true."
                    .to_owned(),
            ),
            name: Name::new_unchecked("skip"),
            arguments: vec![if_argument("Skipped when true.")],
            repeatable: false,
            locations: vec![
                DirectiveLocation::Field,
                DirectiveLocation::FragmentSpread,
                DirectiveLocation::InlineFragment,
            ],
        },
        DirectiveDefinition {
            description: Some(
                "Directs the executor to include this field or fragment only when the `if` \
                 argument is true."
                    .to_owned(),
            ),
            name: Name::new_unchecked("include"),
            arguments: vec![if_argument("Included when true.")],
            repeatable: false,
            locations: vec![
                DirectiveLocation::Field,
                DirectiveLocation::FragmentSpread,
                DirectiveLocation::InlineFragment,
            ],
        },
        DirectiveDefinition {
            description: Some(
                "Marks an element of a GraphQL schema as no longer supported.".to_owned(),
            ),
            name: Name::new_unchecked("deprecated"),
            arguments: vec![InputValueDefinition {
                description: None,
                name: Name::new_unchecked("reason"),
                ty: Type::Named(Name::new_unchecked("String")),
                default_value: Some(Value::String("No longer supported".to_owned())),
                directives: DirectiveList::default(),
                location: None,
            }],
            repeatable: false,
            locations: vec![
                DirectiveLocation::FieldDefinition,
                DirectiveLocation::ArgumentDefinition,
                DirectiveLocation::InputFieldDefinition,
                DirectiveLocation::EnumValue,
            ],
        },
        DirectiveDefinition {
            description: Some(
                "Exposes a URL that specifies the behavior of this scalar.".to_owned(),
            ),
            name: Name::new_unchecked("specifiedBy"),
            arguments: vec![InputValueDefinition {
                description: None,
                name: Name::new_unchecked("url"),
                ty: Type::NonNullNamed(Name::new_unchecked("String")),
                default_value: None,
                directives: DirectiveList::default(),
                location: None,
            }],
            repeatable: false,
            locations: vec![DirectiveLocation::Scalar],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_ins_are_per_schema() {
        let mut a = Schema::new();
        let b = Schema::new();
        if let Some(ExtendedType::Scalar(ty)) = a.types.get_mut("String") {
            ty.description = None;
        }
        assert!(b.get_scalar("String").unwrap().description.is_some());
        assert!(b.directive_definitions.contains_key("skip"));
        assert!(b.types.values().all(ExtendedType::is_built_in_scalar));
    }
}
