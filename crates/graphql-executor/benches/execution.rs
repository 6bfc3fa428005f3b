use criterion::*;
use graphql_executor::ExecutableDocument;
use graphql_executor::Execution;
use graphql_executor::JsonMap;
use graphql_executor::ObjectValue;
use graphql_executor::ResolvedValue;
use graphql_executor::Resolvers;
use graphql_executor::Schema;
use graphql_executor::Validator;

const SDL: &str = "
    type Query {
      items: [Item!]!
      value: Int
    }

    type Item {
      id: ID!
      name: String
      tags: [String!]
    }
";

fn bench_wide_json_list(c: &mut Criterion) {
    let schema = Schema::parse(SDL, "schema.graphql").unwrap();
    let document =
        ExecutableDocument::parse("{ items { id name tags } }", "query.graphql").unwrap();
    let items: Vec<_> = (0..1_000)
        .map(|i| serde_json_bytes::json!({ "id": i, "name": format!("item {i}"), "tags": ["a", "b"] }))
        .collect();
    let mut root = JsonMap::new();
    root.insert("items", serde_json_bytes::Value::Array(items));
    let resolvers = Resolvers::new();

    c.bench_function("wide_json_list", move |b| {
        b.iter(|| {
            let response = futures::executor::block_on(
                Execution::new(&schema, &document, &resolvers)
                    .root_value(ObjectValue::json(root.clone()))
                    .execute(),
            )
            .unwrap();
            black_box(response);
        });
    });
}

fn bench_many_async_fields(c: &mut Criterion) {
    let schema = Schema::parse(SDL, "schema.graphql").unwrap();
    let query = format!(
        "{{ {} }}",
        (0..1_000)
            .map(|i| format!("f{i}: value"))
            .collect::<Vec<_>>()
            .join(" ")
    );
    let document = ExecutableDocument::parse(query, "query.graphql").unwrap();
    let resolvers = Resolvers::new().field("Query", "value", |_| {
        Box::pin(async {
            futures::future::ready(()).await;
            Ok(ResolvedValue::leaf(42))
        })
    });

    c.bench_function("many_async_fields", move |b| {
        b.iter(|| {
            let response = futures::executor::block_on(
                Execution::new(&schema, &document, &resolvers).execute(),
            )
            .unwrap();
            black_box(response);
        });
    });
}

fn bench_validation(c: &mut Criterion) {
    let schema = Schema::parse(SDL, "schema.graphql").unwrap();
    let query = format!(
        "{{ {} }} fragment F on Item {{ id ...G }} fragment G on Item {{ name tags }}",
        "items { ...F } ".repeat(1_000)
    );
    let document = ExecutableDocument::parse(query, "query.graphql").unwrap();
    let validator = Validator::new();
    let variables = JsonMap::new();

    c.bench_function("default_validation_rules", move |b| {
        b.iter(|| {
            let result = validator.validate(&schema, &document, &variables);
            black_box(result);
        });
    });
}

criterion_group!(
    benches,
    bench_wide_json_list,
    bench_many_async_fields,
    bench_validation
);
criterion_main!(benches);
