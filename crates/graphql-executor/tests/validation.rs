use crate::parse;
use graphql_executor::response::GraphQLError;
use graphql_executor::validation::ValidationContext;
use graphql_executor::validation::ValidationRule;
use graphql_executor::validation::Validator;
use graphql_executor::Execution;
use graphql_executor::ExecutionConfig;
use graphql_executor::JsonMap;
use graphql_executor::RequestError;
use graphql_executor::ResolvedValue;
use graphql_executor::Resolvers;
use pretty_assertions::assert_eq;

const SDL: &str = r#"
    type Query {
      pet: Pet
      name: String
      tags: [String]
    }

    interface Pet { name: String }
    type Dog implements Pet { name: String barks: Boolean }
    input Filter { name: String }
    scalar Url
"#;

fn messages(query: &str) -> Vec<String> {
    let (schema, document) = parse(SDL, query);
    Validator::new()
        .validate(&schema, &document, &JsonMap::new())
        .errors
        .into_iter()
        .map(|error| error.message)
        .collect()
}

#[test]
fn valid_document() {
    let errors = messages(
        r#"
        query {
          name
          pet { __typename name ...DogFields ... on Pet { name } }
        }

        fragment DogFields on Dog { barks }
        "#,
    );
    assert!(errors.is_empty(), "{errors:?}");
}

#[test]
fn unknown_fragments_and_cycles() {
    let errors = messages(
        r#"
        query {
          pet { ...Missing ...A }
        }

        fragment A on Pet { name ...B }
        fragment B on Pet { ... on Dog { ...A } }
        fragment C on Pet { ...C }
        "#,
    );
    assert_eq!(
        errors,
        [
            "cannot find fragment `Missing` in this document",
            "`A` fragment cannot reference itself, it spreads itself via `B`",
            "`B` fragment cannot reference itself, it spreads itself via `A`",
            "`C` fragment cannot reference itself",
        ]
    );
}

#[test]
fn fields_and_type_conditions() {
    let errors = messages(
        r#"
        query {
          nope
          pet { barks ... on Dog { barks wags } ... on Cat { meows } ... on Url { x } }
        }

        fragment F on Filter { name }
        "#,
    );
    assert_eq!(
        errors,
        [
            "type condition `Filter` is an input object type, \
             fragments can only apply to object, interface, or union types",
            "type condition `Cat` is not defined",
            "type condition `Url` is a scalar type, \
             fragments can only apply to object, interface, or union types",
            "cannot query field `nope` on type `Query`",
            "cannot query field `barks` on type `Pet`",
            "cannot query field `wags` on type `Dog`",
        ]
    );
}

#[test]
fn leaf_selections() {
    let errors = messages("{ name { length } pet }");
    assert_eq!(
        errors,
        [
            "field `name` of type `String` is a scalar type and must not have a selection set",
            "field `pet` of type `Pet` is an interface type and must have a selection set",
        ]
    );
}

#[test]
fn subscription_root_fields() {
    let sdl = r#"
        type Query { a: Int }
        type Subscription { a: Int b: Int }
    "#;
    let check = |query: &str, variables: JsonMap| {
        let (schema, document) = parse(sdl, query);
        Validator::new()
            .validate(&schema, &document, &variables)
            .errors
            .into_iter()
            .map(|error| error.message)
            .collect::<Vec<_>>()
    };
    let mut skip_b = JsonMap::new();
    skip_b.insert("skipB", true.into());

    let query = "subscription($skipB: Boolean!) { a b @skip(if: $skipB) }";
    assert!(check(query, skip_b).is_empty());
    assert_eq!(
        check(query, JsonMap::new()),
        ["anonymous subscription must select only one top level field, found 2"]
    );
    assert_eq!(
        check("subscription S { __typename }", JsonMap::new()),
        ["subscription `S` must not select an introspection top level field, found `__typename`"]
    );
    assert_eq!(
        check("subscription S { ...F } fragment F on Subscription { a alias: a }", JsonMap::new()),
        ["subscription `S` must select only one top level field, found 2"]
    );
}

/// Rejects operations without a name
struct NamedOperations;

impl ValidationRule for NamedOperations {
    fn name(&self) -> &'static str {
        "NamedOperations"
    }

    fn check(&self, ctx: &ValidationContext<'_>, errors: &mut Vec<GraphQLError>) {
        if let Some(operation) = &ctx.document.anonymous_operation {
            errors.push(GraphQLError::new(
                "operations must be named",
                operation.location,
            ))
        }
    }
}

#[tokio::test]
async fn custom_rules_and_disabled_validation() {
    let (schema, document) = parse(SDL, "{ name nope }");
    let resolvers = Resolvers::new().sync_field("Query", "name", |_| Ok(ResolvedValue::leaf("x")));

    let err = Execution::new(&schema, &document, &resolvers)
        .execute()
        .await
        .unwrap_err();
    let RequestError::Validation { errors } = err else {
        panic!("expected a validation error")
    };
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "cannot query field `nope` on type `Query`");

    let validator = Validator::empty().rule(NamedOperations);
    assert_eq!(
        validator.rule_names().collect::<Vec<_>>(),
        ["NamedOperations"]
    );
    let err = Execution::new(&schema, &document, &resolvers)
        .validator(&validator)
        .execute()
        .await
        .unwrap_err();
    assert_eq!(
        err.to_graphql_errors()[0].message,
        "operations must be named"
    );

    // Without validation, the unknown field is skipped
    let config = ExecutionConfig {
        validate: false,
        ..Default::default()
    };
    let response = Execution::new(&schema, &document, &resolvers)
        .config(config)
        .execute()
        .await
        .unwrap();
    assert_eq!(
        serde_json::to_string(&response).unwrap(),
        r#"{"data":{"name":"x"}}"#
    );
}
