//! This example shows resolvers backed by an async data source,
//! implementing [`Resolver`] on a type instead of registering closures

use futures::future::BoxFuture;
use graphql_executor::execution::ResolveInfo;
use graphql_executor::execution::Resolver;
use graphql_executor::Execution;
use graphql_executor::ExecutableDocument;
use graphql_executor::FieldError;
use graphql_executor::JsonMap;
use graphql_executor::ObjectValue;
use graphql_executor::ResolvedValue;
use graphql_executor::Resolvers;
use graphql_executor::Schema;
use std::collections::HashMap;
use std::sync::Arc;

const SDL: &str = "
  type Query {
    book(id: ID!): Book
    books: [Book!]!
  }

  type Book {
    id: ID!
    title: String!
    author: String
  }
";

struct Book {
    id: &'static str,
    title: &'static str,
    author: Option<&'static str>,
}

/// Stands in for a database client
#[derive(Default)]
struct Library {
    books: HashMap<&'static str, Arc<Book>>,
}

impl Library {
    fn new() -> Self {
        let mut library = Self::default();
        for book in [
            Book {
                id: "1",
                title: "The Left Hand of Darkness",
                author: Some("Ursula K. Le Guin"),
            },
            Book {
                id: "2",
                title: "Beowulf",
                author: None,
            },
        ] {
            library.books.insert(book.id, Arc::new(book));
        }
        library
    }

    async fn fetch(&self, id: &str) -> Option<Arc<Book>> {
        futures::future::ready(()).await;
        self.books.get(id).cloned()
    }

    async fn fetch_all(&self) -> Vec<Arc<Book>> {
        let mut books: Vec<_> = self.books.values().cloned().collect();
        books.sort_by_key(|book| book.id);
        books
    }
}

struct QueryResolver(Arc<Library>);

impl Resolver for QueryResolver {
    fn resolve<'a>(
        &'a self,
        info: &'a ResolveInfo<'a>,
    ) -> BoxFuture<'a, Result<ResolvedValue, FieldError>> {
        Box::pin(async move {
            match info.field_name() {
                "book" => {
                    let id = info
                        .argument("id")
                        .and_then(|id| id.as_str())
                        .ok_or_else(|| FieldError::new("expected an ID"))?;
                    let book = self.0.fetch(id).await;
                    Ok(ResolvedValue::nullable_object(book.map(ObjectValue::new)))
                }
                "books" => Ok(ResolvedValue::list(
                    self.0
                        .fetch_all()
                        .await
                        .into_iter()
                        .map(|book| ResolvedValue::object(ObjectValue::new(book))),
                )),
                other => Err(FieldError::new(format!("unexpected field `{other}`"))),
            }
        })
    }
}

fn book_field(info: &ResolveInfo<'_>) -> Result<ResolvedValue, FieldError> {
    let book = info
        .parent_value()
        .downcast_ref::<Arc<Book>>()
        .ok_or_else(|| FieldError::new("expected a Book"))?;
    Ok(match info.field_name() {
        "id" => ResolvedValue::leaf(book.id),
        "title" => ResolvedValue::leaf(book.title),
        _ => book.author.map_or(ResolvedValue::null(), ResolvedValue::leaf),
    })
}

fn resolvers() -> Resolvers {
    let library = Arc::new(Library::new());
    ["id", "title", "author"].into_iter().fold(
        Resolvers::new()
            .field_resolver("Query", "book", QueryResolver(library.clone()))
            .field_resolver("Query", "books", QueryResolver(library)),
        |resolvers, field| resolvers.sync_field("Book", field, book_field),
    )
}

async fn async_resolvers_example() -> String {
    let schema = Schema::parse(SDL, "schema.graphql").unwrap();
    let query = "
      query($id: ID!) {
        book(id: $id) { title }
        books { id title author }
      }
    ";
    let document = ExecutableDocument::parse(query, "query.graphql").unwrap();
    let mut variables = JsonMap::new();
    variables.insert("id", "1".into());

    let resolvers = resolvers();
    let response = Execution::new(&schema, &document, &resolvers)
        .raw_variable_values(&variables)
        .execute()
        .await
        .unwrap();
    serde_json::to_string_pretty(&response).unwrap()
}

#[cfg(not(test))]
fn main() {
    println!("{}", futures::executor::block_on(async_resolvers_example()))
}

#[test]
fn test_async_resolvers() {
    let expected = expect_test::expect![[r#"
        {
          "data": {
            "book": {
              "title": "The Left Hand of Darkness"
            },
            "books": [
              {
                "id": "1",
                "title": "The Left Hand of Darkness",
                "author": "Ursula K. Le Guin"
              },
              {
                "id": "2",
                "title": "Beowulf",
                "author": null
              }
            ]
          }
        }"#]];
    expected.assert_eq(&futures::executor::block_on(async_resolvers_example()));
}
