use crate::error_paths;
use crate::parse;
use crate::to_json;
use graphql_executor::execution::coerce_variable_values;
use graphql_executor::Execution;
use graphql_executor::JsonMap;
use graphql_executor::RequestError;
use graphql_executor::ResolvedValue;
use graphql_executor::Resolvers;
use pretty_assertions::assert_eq;
use serde_json::json;
use serde_json_bytes::json as bjson;

const SDL: &str = r#"
    type Query {
      echo(input: EchoInput, ids: [ID!], color: Color = RED): String
      count(limit: Int!): Int
    }

    input EchoInput {
      text: String!
      repeat: Int = 1
      price: Float
    }

    enum Color { RED GREEN }
"#;

/// Resolves `echo` to its coerced arguments, as JSON text
fn resolvers() -> Resolvers {
    Resolvers::new()
        .sync_field("Query", "echo", |info| {
            Ok(ResolvedValue::leaf(
                serde_json::to_string(info.arguments()).unwrap(),
            ))
        })
        .sync_field("Query", "count", |info| {
            Ok(ResolvedValue::leaf(info.argument("limit").cloned().unwrap_or_default()))
        })
}

fn variables(value: serde_json_bytes::Value) -> JsonMap {
    value.as_object().unwrap().clone()
}

#[tokio::test]
async fn variables_and_defaults() {
    let (schema, document) = parse(
        SDL,
        "query($input: EchoInput, $ids: [ID!]) { echo(input: $input, ids: $ids) }",
    );
    let resolvers = resolvers();
    let variables = variables(bjson!({
        "input": { "text": "hi", "price": 3 },
        "ids": 42,
    }));
    let response = Execution::new(&schema, &document, &resolvers)
        .raw_variable_values(&variables)
        .execute()
        .await
        .unwrap();
    let echoed: serde_json::Value =
        serde_json::from_str(to_json(&response)["data"]["echo"].as_str().unwrap()).unwrap();
    // A single value is wrapped in a list, integer IDs become strings, Float accepts integers
    assert_eq!(
        echoed,
        json!({
            "input": { "text": "hi", "repeat": 1, "price": 3.0 },
            "ids": ["42"],
            "color": "RED",
        })
    );
}

#[tokio::test]
async fn variable_errors_are_request_errors() {
    let (schema, document) = parse(SDL, "query($input: EchoInput!) { echo(input: $input) }");
    let resolvers = resolvers();

    let err = Execution::new(&schema, &document, &resolvers)
        .execute()
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "missing value for non-null variable `$input` of type EchoInput!"
    );

    let values = variables(bjson!({ "input": { "repeat": 2 } }));
    let err = Execution::new(&schema, &document, &resolvers)
        .raw_variable_values(&values)
        .execute()
        .await
        .unwrap_err();
    assert!(matches!(err, RequestError::InputCoercion(_)));
    assert_eq!(
        err.to_string(),
        "variable `$input` of type EchoInput!: \
         missing value for non-null input object field EchoInput.text"
    );
    // Variable definitions have a location
    assert_eq!(
        to_json(&err.into())["errors"][0]["locations"],
        json!([{ "line": 1, "column": 7 }])
    );
}

#[tokio::test]
async fn argument_errors_are_field_errors() {
    let (schema, document) = parse(
        SDL,
        r#"query($limit: Int) { count(limit: $limit) echo(color: GREEN) }"#,
    );
    let resolvers = resolvers();
    let values = variables(bjson!({ "limit": null }));
    let response = Execution::new(&schema, &document, &resolvers)
        .raw_variable_values(&values)
        .execute()
        .await
        .unwrap();
    assert_eq!(
        to_json(&response)["data"],
        json!({ "count": null, "echo": r#"{"color":"GREEN"}"# })
    );
    assert_eq!(
        error_paths(&response),
        [(
            "null value for non-null argument limit of type Int!".to_owned(),
            "count".to_owned()
        )]
    );
}

#[tokio::test]
async fn pre_coerced_variables() {
    let (schema, document) = parse(SDL, "query($limit: Int!) { count(limit: $limit) }");
    let resolvers = resolvers();
    let operation = document.get_operation(None).unwrap();
    let raw = variables(bjson!({ "limit": 7 }));
    let coerced = coerce_variable_values(&schema, operation, &raw, true).unwrap();
    let response = Execution::new(&schema, &document, &resolvers)
        .coerced_variable_values(&coerced)
        .execute()
        .await
        .unwrap();
    assert_eq!(to_json(&response), json!({ "data": { "count": 7 } }));
}
