use crate::error_paths;
use crate::parse;
use crate::to_json;
use graphql_executor::Execution;
use graphql_executor::FieldError;
use graphql_executor::ResolvedValue;
use graphql_executor::Resolvers;
use pretty_assertions::assert_eq;
use serde_json::json;
use serde_json_bytes::json as bjson;

const SDL: &str = r#"
    type Query {
      list: [String]!
      strict: [String!]
      nested: [[Int!]]
      notAList: [Int]
      single: Int
    }
"#;

#[tokio::test]
async fn nullable_items() {
    let (schema, document) = parse(SDL, "{ list }");
    let resolvers = Resolvers::new().sync_field("Query", "list", |_| {
        Ok(ResolvedValue::leaf(bjson!(["a", null, "c"])))
    });
    let response = Execution::new(&schema, &document, &resolvers)
        .execute()
        .await
        .unwrap();
    assert_eq!(
        to_json(&response),
        json!({ "data": { "list": ["a", null, "c"] } })
    );
}

#[tokio::test]
async fn failing_item_only_nulls_its_slot() {
    let (schema, document) = parse(SDL, "{ list }");
    let resolvers = Resolvers::new().sync_field("Query", "list", |_| {
        Ok(ResolvedValue::List(vec![
            Ok(ResolvedValue::leaf("a")),
            Err(FieldError::new("item failed")),
            Ok(ResolvedValue::leaf("c")),
        ]))
    });
    let response = Execution::new(&schema, &document, &resolvers)
        .execute()
        .await
        .unwrap();
    assert_eq!(
        to_json(&response)["data"],
        json!({ "list": ["a", null, "c"] })
    );
    assert_eq!(
        error_paths(&response),
        [("item failed".to_owned(), "list.1".to_owned())]
    );
}

#[tokio::test]
async fn failing_non_null_item_nulls_the_list() {
    let (schema, document) = parse(SDL, "{ strict }");
    let resolvers = Resolvers::new().sync_field("Query", "strict", |_| {
        Ok(ResolvedValue::leaf(bjson!(["a", null, "c"])))
    });
    let response = Execution::new(&schema, &document, &resolvers)
        .execute()
        .await
        .unwrap();
    assert_eq!(to_json(&response)["data"], json!({ "strict": null }));
    assert_eq!(
        error_paths(&response),
        [(
            "non-null type String! resolved to null".to_owned(),
            "strict.1".to_owned()
        )]
    );
}

#[tokio::test]
async fn nested_lists() {
    let (schema, document) = parse(SDL, "{ nested }");
    let resolvers = Resolvers::new().sync_field("Query", "nested", |_| {
        Ok(ResolvedValue::leaf(bjson!([[1, 2], null, [3, "four"], []])))
    });
    let response = Execution::new(&schema, &document, &resolvers)
        .execute()
        .await
        .unwrap();
    assert_eq!(
        to_json(&response)["data"],
        json!({ "nested": [[1, 2], null, null, []] })
    );
    assert_eq!(
        error_paths(&response),
        [(
            "resolver returned \"four\", expected Int".to_owned(),
            "nested.2.1".to_owned()
        )]
    );
}

#[tokio::test]
async fn shape_mismatches() {
    let (schema, document) = parse(SDL, "{ notAList single }");
    let resolvers = Resolvers::new()
        .sync_field("Query", "notAList", |_| Ok(ResolvedValue::leaf(7)))
        .sync_field("Query", "single", |_| {
            Ok(ResolvedValue::list([ResolvedValue::leaf(7)]))
        });
    let response = Execution::new(&schema, &document, &resolvers)
        .execute()
        .await
        .unwrap();
    assert_eq!(
        to_json(&response)["data"],
        json!({ "notAList": null, "single": null })
    );
    assert_eq!(
        error_paths(&response),
        [
            (
                "list type [Int] resolved to a non-list value 7".to_owned(),
                "notAList".to_owned()
            ),
            (
                "non-list type Int resolved to a list".to_owned(),
                "single".to_owned()
            ),
        ]
    );
}
