use crate::error_paths;
use crate::parse;
use crate::to_json;
use graphql_executor::Execution;
use graphql_executor::FieldError;
use graphql_executor::ObjectValue;
use graphql_executor::ResolvedValue;
use graphql_executor::Resolvers;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

const SDL: &str = r#"
    type Query { log: [String!]! }

    type Mutation {
      append(entry: String!, delayMs: Int = 0): Entry
      appendRequired(entry: String!): Entry!
    }

    type Entry {
      entry: String!
      logLength: Int!
    }
"#;

#[derive(Default)]
struct Log(Mutex<Vec<String>>);

impl Log {
    fn push(&self, entry: impl Into<String>) -> usize {
        let mut entries = self.0.lock().unwrap();
        entries.push(entry.into());
        entries.len()
    }

    fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

struct Entry {
    entry: String,
}

fn resolvers(log: &Arc<Log>) -> Resolvers {
    let append_log = log.clone();
    let nested_log = log.clone();
    Resolvers::new()
        .field("Mutation", "append", move |info| {
            let log = append_log.clone();
            Box::pin(async move {
                let entry = info.argument("entry").and_then(|v| v.as_str()).unwrap_or_default();
                let delay = info.argument("delayMs").and_then(|v| v.as_u64()).unwrap_or(0);
                tokio::time::sleep(Duration::from_millis(delay)).await;
                log.push(entry);
                Ok(ResolvedValue::object(ObjectValue::new(Entry {
                    entry: entry.to_owned(),
                })))
            })
        })
        .sync_field("Mutation", "appendRequired", |_| {
            Err(FieldError::new("refused"))
        })
        .sync_field("Entry", "entry", |info| {
            let entry = info
                .parent_value()
                .downcast_ref::<Entry>()
                .ok_or_else(|| FieldError::new("expected an Entry"))?;
            Ok(ResolvedValue::leaf(entry.entry.as_str()))
        })
        .field("Entry", "logLength", move |info| {
            let log = nested_log.clone();
            let entry = info.parent_value().downcast_ref::<Entry>();
            Box::pin(async move {
                let entry = entry.ok_or_else(|| FieldError::new("expected an Entry"))?;
                tokio::time::sleep(Duration::from_millis(10)).await;
                let length = log.push(format!("{}.logLength", entry.entry));
                Ok(ResolvedValue::leaf(length as i32))
            })
        })
}

#[tokio::test]
async fn root_fields_run_in_document_order() {
    let (schema, document) = parse(
        SDL,
        r#"
        mutation {
          first: append(entry: "first", delayMs: 30) { entry logLength }
          second: append(entry: "second") { entry logLength }
          third: append(entry: "third", delayMs: 10) { entry }
        }
        "#,
    );
    let log = Arc::new(Log::default());
    let resolvers = resolvers(&log);
    let response = Execution::new(&schema, &document, &resolvers)
        .execute()
        .await
        .unwrap();
    assert_eq!(
        to_json(&response),
        json!({
            "data": {
                "first": { "entry": "first", "logLength": 2 },
                "second": { "entry": "second", "logLength": 4 },
                "third": { "entry": "third" },
            }
        })
    );
    assert_eq!(
        log.entries(),
        ["first", "first.logLength", "second", "second.logLength", "third"]
    );
}

#[tokio::test]
async fn null_at_the_root_stops_later_mutations() {
    let (schema, document) = parse(
        SDL,
        r#"
        mutation {
          a: append(entry: "a") { entry }
          appendRequired(entry: "b") { entry }
          c: append(entry: "c") { entry }
        }
        "#,
    );
    let log = Arc::new(Log::default());
    let resolvers = resolvers(&log);
    let response = Execution::new(&schema, &document, &resolvers)
        .execute()
        .await
        .unwrap();
    assert_eq!(to_json(&response)["data"], json!(null));
    assert_eq!(
        error_paths(&response),
        [("refused".to_owned(), "appendRequired".to_owned())]
    );
    assert_eq!(log.entries(), ["a"]);
}
