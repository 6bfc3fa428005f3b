use crate::execution::collect_fields::collect_fields;
use crate::execution::engine::LinkedPathElement;
use crate::execution::input_coercion::coerce_argument_values;
use crate::execution::resolver::EventStream;
use crate::execution::resolver::FieldError;
use crate::execution::resolver::ObjectValue;
use crate::execution::resolver::ResolveInfo;
use crate::execution::PreparedRequest;
use crate::execution::RequestError;
use crate::response::GraphQLError;
use crate::response::JsonMap;
use crate::response::PathElement;
use crate::response::Response;
use crate::response::ResponseData;
use futures::stream::BoxStream;
use futures::StreamExt;
use std::sync::Arc;
use tracing::Instrument;

/// <https://spec.graphql.org/October2021/#Subscribe()>
pub(crate) async fn subscribe<'a>(
    request: PreparedRequest<'a>,
    root_value: ObjectValue,
) -> Result<BoxStream<'a, Response>, RequestError> {
    let source_stream = create_source_event_stream(&request, &root_value).await?;
    let request = Arc::new(request);
    let cancelled = request.cancellation_token.clone().cancelled_owned();
    Ok(source_stream
        .take_until(cancelled)
        .filter_map(move |event| {
            let request = Arc::clone(&request);
            async move { map_source_to_response_event(&request, event).await }
        })
        .boxed())
}

/// Call the subscriber of the single root field
///
/// <https://spec.graphql.org/October2021/#CreateSourceEventStream()>
async fn create_source_event_stream(
    request: &PreparedRequest<'_>,
    root_value: &ObjectValue,
) -> Result<EventStream, RequestError> {
    let operation = request.operation;
    let grouped_field_set = collect_fields(
        request.schema,
        request.document,
        &request.variable_values,
        request.root_type,
        &operation.selection_set.selections,
    );
    // Validation ensures there is exactly one
    let Some((&response_key, fields)) = grouped_field_set.first() else {
        return Err(RequestError::SubscriptionSource(GraphQLError::new(
            "a subscription operation must select a root field",
            operation.location,
        )));
    };
    let field = fields[0];
    let field_def = request
        .schema
        .type_field(&request.root_type.name, &field.name)
        .map_err(|err| {
            RequestError::SubscriptionSource(GraphQLError::new(err.to_string(), field.location))
        })?;
    let path_element = LinkedPathElement {
        element: PathElement::Field(response_key.clone()),
        ordinal: 0,
        next: None,
    };
    let path = Some(&path_element);
    let arguments = coerce_argument_values(
        request.schema,
        &request.variable_values,
        field_def,
        field,
    )
    .map_err(|err| {
        RequestError::SubscriptionSource(GraphQLError::field_error(
            err.message,
            path,
            err.location,
        ))
    })?;
    let Some(subscriber) = request.resolvers.get_subscriber(&field.name) else {
        return Err(RequestError::SubscriptionSource(GraphQLError::field_error(
            format!("no subscriber for subscription field `{}`", field.name),
            path,
            field.location,
        )));
    };
    let info = ResolveInfo {
        schema: request.schema,
        document: request.document,
        operation,
        parent_type: request.root_type,
        parent_value: root_value,
        field_definition: field_def,
        fields,
        arguments: &arguments,
        variable_values: &request.variable_values,
        path,
        cancellation_token: &request.cancellation_token,
        context_data: request.context_data.as_deref(),
    };
    subscriber.subscribe(&info).await.map_err(|error| {
        RequestError::SubscriptionSource(error.into_graphql_error(path, field.location))
    })
}

/// Execute the operation once for a source event.
/// Returns `None` if the subscription was cancelled meanwhile.
///
/// <https://spec.graphql.org/October2021/#MapSourceToResponseEvent()>
async fn map_source_to_response_event(
    request: &PreparedRequest<'_>,
    event: Result<ObjectValue, FieldError>,
) -> Option<Response> {
    let span = tracing::debug_span!(
        "graphql.subscription_event",
        operation.name = request.operation.name.as_ref().map(|name| name.as_str()),
        operation.kind = %request.operation.operation_type,
    );
    async move {
        let root_value = match event {
            Ok(root_value) => root_value,
            Err(error) => {
                return Some(Response {
                    errors: vec![error.into_graphql_error(None, None)],
                    data: ResponseData::Null,
                    extensions: JsonMap::new(),
                });
            }
        };
        let response = request.execute_root(&root_value).await;
        if request.cancellation_token.is_cancelled() {
            return None;
        }
        Some(response)
    }
    .instrument(span)
    .await
}
