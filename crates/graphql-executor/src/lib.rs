#![doc = include_str!("../README.md")]

pub mod ast;
pub mod config;
pub mod diagnostic;
pub mod executable;
pub mod execution;
mod from_cst;
mod name;
pub mod parser;
pub mod response;
pub mod schema;
pub mod validation;

pub use self::config::ExecutionConfig;
pub use self::executable::ExecutableDocument;
pub use self::execution::Execution;
pub use self::execution::FieldError;
pub use self::execution::ObjectValue;
pub use self::execution::RequestError;
pub use self::execution::ResolveInfo;
pub use self::execution::ResolvedValue;
pub use self::execution::Resolvers;
pub use self::name::InvalidNameError;
pub use self::name::Name;
pub use self::response::GraphQLError;
pub use self::response::JsonMap;
pub use self::response::JsonValue;
pub use self::response::Response;
pub use self::response::ResponseData;
pub use self::schema::Schema;
pub use self::validation::Validator;
