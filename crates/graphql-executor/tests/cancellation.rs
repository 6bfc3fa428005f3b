use crate::parse;
use graphql_executor::Execution;
use graphql_executor::RequestError;
use graphql_executor::ResolvedValue;
use graphql_executor::Resolvers;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const SDL: &str = r#"
    type Query {
      slow: String
      fast: String!
    }
"#;

#[tokio::test]
async fn cancelling_aborts_pending_resolvers() {
    let (schema, document) = parse(SDL, "{ fast slow }");
    let resolvers = Resolvers::new()
        .sync_field("Query", "fast", |_| Ok(ResolvedValue::leaf("done")))
        .field("Query", "slow", |_| {
            Box::pin(async {
                futures::future::pending::<()>().await;
                Ok(ResolvedValue::leaf("never"))
            })
        });
    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        canceller.cancel();
    });
    let result = tokio::time::timeout(
        Duration::from_secs(5),
        Execution::new(&schema, &document, &resolvers)
            .cancellation_token(token)
            .execute(),
    )
    .await
    .expect("cancellation was not observed");
    assert!(matches!(result, Err(RequestError::Cancelled)));
}

#[tokio::test]
async fn resolvers_can_observe_the_token() {
    let (schema, document) = parse(SDL, "{ slow }");
    let observed = Arc::new(AtomicUsize::new(0));
    let resolver_observed = observed.clone();
    let resolvers = Resolvers::new().field("Query", "slow", move |info| {
        let observed = resolver_observed.clone();
        Box::pin(async move {
            if info.cancellation_token().is_cancelled() {
                observed.fetch_add(1, Ordering::SeqCst);
            }
            Ok(ResolvedValue::leaf("ok"))
        })
    });
    let token = CancellationToken::new();
    token.cancel();
    let result = Execution::new(&schema, &document, &resolvers)
        .cancellation_token(token)
        .execute()
        .await;
    assert!(matches!(result, Err(RequestError::Cancelled)));
    // Fields are not resolved at all once the token is cancelled
    assert_eq!(observed.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn uncancelled_token_is_inert() {
    let (schema, document) = parse(SDL, "{ fast }");
    let resolvers =
        Resolvers::new().sync_field("Query", "fast", |_| Ok(ResolvedValue::leaf("done")));
    let token = CancellationToken::new();
    let response = Execution::new(&schema, &document, &resolvers)
        .cancellation_token(token.clone())
        .execute()
        .await
        .unwrap();
    assert!(response.errors.is_empty());
    assert!(!token.is_cancelled());
}
