//! Conversions from `apollo-parser` CST nodes shared by schema and executable documents

use crate::ast;
use crate::parser::SourceFile;
use crate::Name;
use apollo_parser::cst;
use apollo_parser::cst::CstNode;
use apollo_parser::S;

/// Similar to `TryFrom`, but with an `Option` return type:
/// `None` means the parser could not produce that node,
/// in which case a syntax error was already reported.
pub(crate) trait Convert {
    type Target;
    fn convert(&self, source: &SourceFile) -> Option<Self::Target>;
}

impl<T: Convert> Convert for Option<T> {
    type Target = Option<T::Target>;

    fn convert(&self, source: &SourceFile) -> Option<Self::Target> {
        Some(if let Some(inner) = self {
            Some(inner.convert(source)?)
        } else {
            None
        })
    }
}

/// Convert and collect, silently skipping entries with conversion errors
/// as they have corresponding syntax errors
pub(crate) fn collect<C, T>(source: &SourceFile, iter: impl IntoIterator<Item = C>) -> Vec<T>
where
    C: Convert<Target = T>,
{
    iter.into_iter()
        .filter_map(|value| value.convert(source))
        .collect()
}

pub(crate) fn directives(source: &SourceFile, cst: Option<cst::Directives>) -> ast::DirectiveList {
    match cst {
        Some(list) => ast::DirectiveList(collect(source, list.directives())),
        None => ast::DirectiveList::default(),
    }
}

pub(crate) fn arguments(source: &SourceFile, cst: Option<cst::Arguments>) -> Vec<ast::Argument> {
    match cst {
        Some(list) => collect(source, list.arguments()),
        None => Vec::new(),
    }
}

impl Convert for cst::Name {
    type Target = Name;

    fn convert(&self, _source: &SourceFile) -> Option<Self::Target> {
        Some(Name::new_unchecked(self.text().as_str()))
    }
}

impl Convert for cst::Description {
    type Target = String;

    fn convert(&self, _source: &SourceFile) -> Option<Self::Target> {
        Some(String::from(self.string_value()?))
    }
}

impl Convert for cst::OperationType {
    type Target = ast::OperationType;

    fn convert(&self, _source: &SourceFile) -> Option<Self::Target> {
        let token = self.syntax().first_token()?;
        match token.kind() {
            S![query] => Some(ast::OperationType::Query),
            S![mutation] => Some(ast::OperationType::Mutation),
            S![subscription] => Some(ast::OperationType::Subscription),
            _ => None,
        }
    }
}

impl Convert for cst::Type {
    type Target = ast::Type;

    fn convert(&self, source: &SourceFile) -> Option<Self::Target> {
        use ast::Type as A;
        use cst::Type as C;
        match self {
            C::NamedType(name) => Some(A::Named(name.name()?.convert(source)?)),
            C::ListType(inner) => Some(A::List(Box::new(inner.ty()?.convert(source)?))),
            C::NonNullType(inner) => {
                if let Some(named) = inner.named_type() {
                    Some(A::NonNullNamed(named.name()?.convert(source)?))
                } else if let Some(list) = inner.list_type() {
                    Some(A::NonNullList(Box::new(list.ty()?.convert(source)?)))
                } else {
                    None
                }
            }
        }
    }
}

impl Convert for cst::Value {
    type Target = ast::Value;

    fn convert(&self, source: &SourceFile) -> Option<Self::Target> {
        use ast::Value as A;
        use cst::Value as C;

        Some(match self {
            C::Variable(v) => A::Variable(v.name()?.convert(source)?),
            C::StringValue(v) => A::String(String::from(v)),
            C::FloatValue(v) => A::Float(ast::FloatValue::new_parsed(
                v.syntax().first_token()?.text(),
            )),
            C::IntValue(v) => A::Int(ast::IntValue::new_parsed(v.syntax().first_token()?.text())),
            C::BooleanValue(v) => A::Boolean(bool::try_from(v).ok()?),
            C::NullValue(_) => A::Null,
            C::EnumValue(v) => A::Enum(v.name()?.convert(source)?),
            C::ListValue(v) => A::List(collect(source, v.values())),
            C::ObjectValue(v) => A::Object(collect(source, v.object_fields())),
        })
    }
}

impl Convert for cst::ObjectField {
    type Target = (Name, ast::Value);

    fn convert(&self, source: &SourceFile) -> Option<Self::Target> {
        Some((self.name()?.convert(source)?, self.value()?.convert(source)?))
    }
}

impl Convert for cst::Directive {
    type Target = ast::Directive;

    fn convert(&self, source: &SourceFile) -> Option<Self::Target> {
        Some(ast::Directive {
            name: self.name()?.convert(source)?,
            arguments: arguments(source, self.arguments()),
        })
    }
}

impl Convert for cst::Argument {
    type Target = ast::Argument;

    fn convert(&self, source: &SourceFile) -> Option<Self::Target> {
        Some(ast::Argument {
            name: self.name()?.convert(source)?,
            value: self.value()?.convert(source)?,
        })
    }
}
