use crate::error_paths;
use crate::parse;
use crate::to_json;
use graphql_executor::ExecutionConfig;
use graphql_executor::Execution;
use graphql_executor::FieldError;
use graphql_executor::JsonMap;
use graphql_executor::ObjectValue;
use graphql_executor::ResolvedValue;
use graphql_executor::Resolvers;
use pretty_assertions::assert_eq;
use serde_json::json;
use serde_json_bytes::json as bjson;
use std::time::Duration;

const SDL: &str = r#"
    type Query {
      hello: String
      user(id: ID!): User
      users: [User!]!
      version: Int!
    }

    type User {
      id: ID!
      name: String
      friends: [User]
      joined: Date
    }

    scalar Date
"#;

fn users() -> JsonMap {
    let value = bjson!({
        "id": "1",
        "name": "Alice",
        "friends": [{ "id": "2", "name": "Bob", "friends": [] }],
    });
    value.as_object().unwrap().clone()
}

fn resolvers() -> Resolvers {
    Resolvers::new()
        .sync_field("Query", "hello", |_| Ok(ResolvedValue::leaf("world")))
        .sync_field("Query", "version", |_| Ok(ResolvedValue::leaf(3)))
        .sync_field("Query", "user", |info| {
            let id = info.argument("id").and_then(|id| id.as_str());
            Ok(match id {
                Some("1") => ResolvedValue::object(ObjectValue::json(users())),
                _ => ResolvedValue::null(),
            })
        })
        .sync_field("Query", "users", |_| {
            Ok(ResolvedValue::list([ResolvedValue::object(
                ObjectValue::json(users()),
            )]))
        })
}

#[tokio::test]
async fn data_in_document_order() {
    let (schema, document) = parse(
        SDL,
        r#"
        {
          version
          user(id: "1") { name id friends { name } }
          hello
          missing: user(id: "2") { id }
        }
        "#,
    );
    let resolvers = resolvers();
    let response = Execution::new(&schema, &document, &resolvers)
        .execute()
        .await
        .unwrap();
    let expected = json!({
        "data": {
            "version": 3,
            "user": { "name": "Alice", "id": "1", "friends": [{ "name": "Bob" }] },
            "hello": "world",
            "missing": null,
        }
    });
    assert_eq!(to_json(&response), expected);
    // Key order, not just content
    let keys: Vec<_> = response.data_object().unwrap().keys().map(|k| k.as_str()).collect();
    assert_eq!(keys, ["version", "user", "hello", "missing"]);
}

#[tokio::test]
async fn fragments_merge_into_one_key() {
    let (schema, document) = parse(
        SDL,
        r#"
        query {
          user(id: "1") {
            id
            ...UserFields
            ... on User { name friends { id } }
          }
        }

        fragment UserFields on User {
          id
          friends { name }
        }
        "#,
    );
    let resolvers = resolvers();
    let response = Execution::new(&schema, &document, &resolvers)
        .execute()
        .await
        .unwrap();
    let expected = json!({
        "data": {
            "user": {
                "id": "1",
                "friends": [{ "name": "Bob", "id": "2" }],
                "name": "Alice",
            }
        }
    });
    assert_eq!(to_json(&response), expected);
}

#[tokio::test]
async fn skip_and_include() {
    let (schema, document) = parse(
        SDL,
        r#"
        query($skipHello: Boolean!, $withUser: Boolean = false) {
          hello @skip(if: $skipHello)
          version @include(if: false)
          user(id: "1") @include(if: $withUser) { id }
          ... @skip(if: false) { alias: hello }
        }
        "#,
    );
    let resolvers = resolvers();
    let variables = bjson!({ "skipHello": true }).as_object().unwrap().clone();
    let response = Execution::new(&schema, &document, &resolvers)
        .raw_variable_values(&variables)
        .execute()
        .await
        .unwrap();
    assert_eq!(to_json(&response), json!({ "data": { "alias": "world" } }));
}

#[tokio::test]
async fn typename_and_default_resolver() {
    let (schema, document) = parse(SDL, r#"{ __typename users { __typename name } }"#);
    let resolvers = resolvers();
    let response = Execution::new(&schema, &document, &resolvers)
        .execute()
        .await
        .unwrap();
    let expected = json!({
        "data": {
            "__typename": "Query",
            "users": [{ "__typename": "User", "name": "Alice" }],
        }
    });
    assert_eq!(to_json(&response), expected);
}

#[tokio::test]
async fn sibling_errors_are_independent() {
    let (schema, document) = parse(SDL, "{ hello version }");
    let resolvers = Resolvers::new()
        .sync_field("Query", "hello", |_| Err(FieldError::new("hello failed")))
        .sync_field("Query", "version", |_| Ok(ResolvedValue::leaf(3)));
    let response = Execution::new(&schema, &document, &resolvers)
        .execute()
        .await
        .unwrap();
    let expected = json!({
        "errors": [{
            "message": "hello failed",
            "locations": [{ "line": 1, "column": 3 }],
            "path": ["hello"],
        }],
        "data": { "hello": null, "version": 3 },
    });
    assert_eq!(to_json(&response), expected);
}

#[tokio::test]
async fn field_error_extensions() {
    let (schema, document) = parse(SDL, "{ hello }");
    let resolvers = Resolvers::new().sync_field("Query", "hello", |_| {
        Err(FieldError::new("forbidden").with_extension("code", "FORBIDDEN"))
    });
    let response = Execution::new(&schema, &document, &resolvers)
        .execute()
        .await
        .unwrap();
    assert_eq!(
        to_json(&response)["errors"][0]["extensions"],
        json!({ "code": "FORBIDDEN" })
    );
}

#[tokio::test]
async fn errors_are_sorted_by_response_position() {
    let (schema, document) = parse(SDL, "{ hello version user(id: \"1\") { name } }");
    let resolvers = Resolvers::new()
        .field("Query", "hello", |_| {
            Box::pin(async {
                tokio::time::sleep(Duration::from_millis(30)).await;
                Err(FieldError::new("late"))
            })
        })
        .sync_field("Query", "version", |_| Ok(ResolvedValue::leaf("three")))
        .sync_field("Query", "user", |_| {
            Ok(ResolvedValue::object(ObjectValue::json(users())))
        })
        .sync_field("User", "name", |_| Err(FieldError::new("early")));
    let response = Execution::new(&schema, &document, &resolvers)
        .execute()
        .await
        .unwrap();
    assert_eq!(response.data, graphql_executor::ResponseData::Null);
    assert_eq!(
        error_paths(&response),
        [
            ("late".to_owned(), "hello".to_owned()),
            (
                "resolver returned \"three\", expected Int".to_owned(),
                "version".to_owned()
            ),
            ("early".to_owned(), "user.name".to_owned()),
        ]
    );
}

#[tokio::test]
async fn sibling_fields_run_concurrently() {
    let (schema, document) = parse(SDL, "{ hello version }");
    let barrier = std::sync::Arc::new(tokio::sync::Barrier::new(2));
    let hello_barrier = barrier.clone();
    let resolvers = Resolvers::new()
        .field("Query", "hello", move |_| {
            let barrier = hello_barrier.clone();
            Box::pin(async move {
                barrier.wait().await;
                Ok(ResolvedValue::leaf("world"))
            })
        })
        .field("Query", "version", move |_| {
            let barrier = barrier.clone();
            Box::pin(async move {
                barrier.wait().await;
                Ok(ResolvedValue::leaf(3))
            })
        });
    let execution = Execution::new(&schema, &document, &resolvers);
    // Each resolver waits for the other: this only completes if they are polled together
    let response = tokio::time::timeout(Duration::from_secs(5), execution.execute())
        .await
        .expect("fields were not resolved concurrently")
        .unwrap();
    assert_eq!(
        to_json(&response),
        json!({ "data": { "hello": "world", "version": 3 } })
    );
}

#[tokio::test]
async fn sequential_config_keeps_document_order() {
    let (schema, document) = parse(SDL, "{ hello version }");
    let log = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
    let hello_log = log.clone();
    let version_log = log.clone();
    let resolvers = Resolvers::new()
        .field("Query", "hello", move |_| {
            let log = hello_log.clone();
            Box::pin(async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                log.lock().unwrap().push("hello");
                Ok(ResolvedValue::leaf("world"))
            })
        })
        .sync_field("Query", "version", move |_| {
            version_log.lock().unwrap().push("version");
            Ok(ResolvedValue::leaf(3))
        });
    let config = ExecutionConfig {
        parallel: false,
        ..Default::default()
    };
    Execution::new(&schema, &document, &resolvers)
        .config(config)
        .execute()
        .await
        .unwrap();
    assert_eq!(*log.lock().unwrap(), ["hello", "version"]);
}

#[tokio::test]
async fn custom_scalar_serializer() {
    let (schema, document) = parse(SDL, r#"{ users { joined } }"#);
    let resolvers = Resolvers::new()
        .sync_field("Query", "users", |_| {
            Ok(ResolvedValue::leaf(bjson!([
                { "joined": "2021-10-01" },
                { "joined": 1633046400 },
            ])))
        })
        .scalar("Date", |value| {
            value
                .as_str()
                .map(|date| format!("{date}T00:00:00Z").into())
        });
    let response = Execution::new(&schema, &document, &resolvers)
        .execute()
        .await
        .unwrap();
    let expected = json!({
        "errors": [{
            "message": "Date cannot represent value 1633046400",
            "locations": [{ "line": 1, "column": 11 }],
            "path": ["users", 1, "joined"],
        }],
        "data": {
            "users": [
                { "joined": "2021-10-01T00:00:00Z" },
                { "joined": null },
            ]
        }
    });
    assert_eq!(to_json(&response), expected);
}

#[tokio::test]
async fn max_depth() {
    let (schema, document) = parse(SDL, r#"{ user(id: "1") { name friends { name } } }"#);
    let resolvers = resolvers();
    let config = ExecutionConfig::from_json(r#"{ "max_depth": 2 }"#).unwrap();
    let response = Execution::new(&schema, &document, &resolvers)
        .config(config)
        .execute()
        .await
        .unwrap();
    assert_eq!(
        error_paths(&response),
        [(
            "field `name` exceeds the maximum depth of 2".to_owned(),
            "user.friends.0.name".to_owned()
        )]
    );
    let mut data = to_json(&response);
    data.as_object_mut().unwrap().remove("errors");
    let expected = json!({
        "data": {
            "user": {
                "name": "Alice",
                "friends": [{ "name": null }],
            }
        }
    });
    assert_eq!(data, expected);
}

struct Viewer {
    name: &'static str,
}

#[tokio::test]
async fn context_data_and_path() {
    let (schema, document) = parse(SDL, r#"{ users { greeting: name } }"#);
    let resolvers = resolvers().sync_field("User", "name", |info| {
        let viewer = info
            .context_data::<Viewer>()
            .ok_or_else(|| FieldError::new("no viewer"))?;
        let path = serde_json::to_string(&info.path()).unwrap();
        Ok(ResolvedValue::leaf(format!("{} at {path}", viewer.name)))
    });
    let response = Execution::new(&schema, &document, &resolvers)
        .context_data(Viewer { name: "carol" })
        .execute()
        .await
        .unwrap();
    assert_eq!(
        to_json(&response),
        json!({ "data": { "users": [{ "greeting": "carol at [\"users\",0,\"greeting\"]" }] } })
    );
}

#[tokio::test]
async fn operation_selection() {
    let (schema, document) = parse(SDL, "query A { hello } query B { version }");
    let resolvers = resolvers();
    let execution = Execution::new(&schema, &document, &resolvers);
    let err = execution.execute().await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "the document contains multiple operations, an operation name is required"
    );
    let response = Execution::new(&schema, &document, &resolvers)
        .operation_name("B")
        .execute()
        .await
        .unwrap();
    assert_eq!(to_json(&response), json!({ "data": { "version": 3 } }));
}

#[tokio::test]
async fn request_error_response() {
    let (schema, document) = parse(SDL, "mutation { hello }");
    let resolvers = resolvers();
    let config = ExecutionConfig {
        validate: false,
        ..Default::default()
    };
    let err = Execution::new(&schema, &document, &resolvers)
        .config(config)
        .execute()
        .await
        .unwrap_err();
    let response = graphql_executor::Response::from(err);
    assert_eq!(
        to_json(&response),
        json!({
            "errors": [{
                "message": "the schema has no root operation type for mutation operations"
            }]
        })
    );
}
