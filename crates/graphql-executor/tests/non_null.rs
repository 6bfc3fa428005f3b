use crate::error_paths;
use crate::parse;
use crate::to_json;
use expect_test::expect;
use graphql_executor::Execution;
use graphql_executor::FieldError;
use graphql_executor::ObjectValue;
use graphql_executor::ResolvedValue;
use graphql_executor::Resolvers;
use pretty_assertions::assert_eq;
use serde_json::json;

const SDL: &str = r#"
    type Query {
      nonNull: String!
      nullable: String
      user: User
      requiredUser: User!
    }

    type User {
      id: ID!
      name: String!
      nickname: String
      best: User!
    }
"#;

fn user() -> ResolvedValue {
    ResolvedValue::object(ObjectValue::json(
        serde_json_bytes::json!({ "id": "1", "name": "Ada" })
            .as_object()
            .unwrap()
            .clone(),
    ))
}

#[tokio::test]
async fn throwing_non_null_root_field_nulls_data() {
    let (schema, document) = parse(SDL, "{ nonNull }");
    let resolvers =
        Resolvers::new().sync_field("Query", "nonNull", |_| Err(FieldError::new("boom")));
    let response = Execution::new(&schema, &document, &resolvers)
        .execute()
        .await
        .unwrap();
    let expected = expect![[r#"
        {
          "errors": [
            {
              "message": "boom",
              "locations": [
                {
                  "line": 1,
                  "column": 3
                }
              ],
              "path": [
                "nonNull"
              ]
            }
          ],
          "data": null
        }"#]];
    expected.assert_eq(&serde_json::to_string_pretty(&response).unwrap());
}

#[tokio::test]
async fn null_for_non_null_field() {
    let (schema, document) = parse(SDL, "{ nullable nonNull }");
    let resolvers = Resolvers::new()
        .sync_field("Query", "nullable", |_| Ok(ResolvedValue::leaf("here")))
        .sync_field("Query", "nonNull", |_| Ok(ResolvedValue::null()));
    let response = Execution::new(&schema, &document, &resolvers)
        .execute()
        .await
        .unwrap();
    assert_eq!(
        to_json(&response),
        json!({
            "errors": [{
                "message": "non-null type String! resolved to null",
                "locations": [{ "line": 1, "column": 12 }],
                "path": ["nonNull"],
            }],
            "data": null,
        })
    );
}

#[tokio::test]
async fn nearest_nullable_ancestor_absorbs_the_null() {
    let (schema, document) = parse(
        SDL,
        "{ nullable user { id nickname best { id name } } }",
    );
    let resolvers = Resolvers::new()
        .sync_field("Query", "nullable", |_| Ok(ResolvedValue::leaf("here")))
        .sync_field("Query", "user", |_| Ok(user()))
        .sync_field("User", "best", |_| Ok(user()))
        .sync_field("User", "name", |_| Err(FieldError::new("no name")));
    let response = Execution::new(&schema, &document, &resolvers)
        .execute()
        .await
        .unwrap();
    // `name` and `best` are non-null: the error bubbles up to `user`, recorded only once
    assert_eq!(
        to_json(&response)["data"],
        json!({ "nullable": "here", "user": null })
    );
    assert_eq!(
        error_paths(&response),
        [("no name".to_owned(), "user.best.name".to_owned())]
    );
}

#[tokio::test]
async fn non_null_chain_up_to_the_root() {
    let (schema, document) = parse(SDL, "{ nullable requiredUser { best { name } } }");
    let resolvers = Resolvers::new()
        .sync_field("Query", "nullable", |_| Ok(ResolvedValue::leaf("here")))
        .sync_field("Query", "requiredUser", |_| Ok(user()))
        .sync_field("User", "best", |_| Ok(user()))
        .sync_field("User", "name", |_| Ok(ResolvedValue::null()));
    let response = Execution::new(&schema, &document, &resolvers)
        .execute()
        .await
        .unwrap();
    assert_eq!(to_json(&response)["data"], json!(null));
    assert_eq!(
        error_paths(&response),
        [(
            "non-null type String! resolved to null".to_owned(),
            "requiredUser.best.name".to_owned()
        )]
    );
}

#[tokio::test]
async fn nullable_field_error_stays_local() {
    let (schema, document) = parse(SDL, "{ user { id nickname } }");
    let resolvers = Resolvers::new()
        .sync_field("Query", "user", |_| Ok(user()))
        .sync_field("User", "nickname", |_| {
            Err(std::io::Error::other("backend unavailable").into())
        });
    let response = Execution::new(&schema, &document, &resolvers)
        .execute()
        .await
        .unwrap();
    assert_eq!(
        to_json(&response)["data"],
        json!({ "user": { "id": "1", "nickname": null } })
    );
    assert_eq!(
        error_paths(&response),
        [("backend unavailable".to_owned(), "user.nickname".to_owned())]
    );
}

#[tokio::test]
async fn leaf_type_mismatch_is_a_field_error() {
    let (schema, document) = parse(SDL, "{ nullable user { id } }");
    let resolvers = Resolvers::new()
        .sync_field("Query", "nullable", |_| Ok(ResolvedValue::leaf(42)))
        .sync_field("Query", "user", |_| Ok(ResolvedValue::leaf("not an object")));
    let response = Execution::new(&schema, &document, &resolvers)
        .execute()
        .await
        .unwrap();
    assert_eq!(
        to_json(&response)["data"],
        json!({ "nullable": null, "user": null })
    );
    assert_eq!(
        error_paths(&response),
        [
            (
                "resolver returned 42, expected String".to_owned(),
                "nullable".to_owned()
            ),
            (
                "resolver returned a leaf value but expected an object for type User".to_owned(),
                "user".to_owned()
            ),
        ]
    );
}
