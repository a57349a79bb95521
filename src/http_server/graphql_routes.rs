//! GraphQL HTTP Routes
//!
//! - `POST <path>`: JSON body `{query, operationName?, variables?}`
//! - `GET <path>?query=&operationName=&variables=`: queries only
//! - `GET <path>` from a browser without `query`: the GraphiQL page, when enabled

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::HeaderMap,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};

use super::graphiql::prefers_html;
use crate::api::{parse_body, ApiHandler, ApiResult, QueryParams};
use crate::executor::ExecutionResult;

#[derive(Clone)]
struct GraphQLState {
    handler: Arc<ApiHandler>,
    /// Rendered GraphiQL page; `None` when disabled
    graphiql: Option<Arc<str>>,
}

/// Create the GraphQL endpoint at `path`, serving `graphiql` to browsers
/// that ask for HTML without a query
pub fn graphql_routes(handler: Arc<ApiHandler>, path: &str, graphiql: Option<String>) -> Router {
    let state = GraphQLState {
        handler,
        graphiql: graphiql.map(Arc::from),
    };

    Router::new()
        .route(path, get(graphql_get).post(graphql_post))
        .with_state(state)
}

async fn graphql_post(
    State(state): State<GraphQLState>,
    body: Bytes,
) -> ApiResult<ExecutionResult> {
    let request = parse_body(&body)?;
    state.handler.execute_blocking(request).await
}

async fn graphql_get(
    State(state): State<GraphQLState>,
    headers: HeaderMap,
    Query(params): Query<QueryParams>,
) -> Response {
    if let Some(page) = &state.graphiql {
        if params.query.is_none() && prefers_html(&headers) {
            return Html(page.to_string()).into_response();
        }
    }

    execute_get(&state.handler, params).await.into_response()
}

async fn execute_get(handler: &ApiHandler, params: QueryParams) -> ApiResult<ExecutionResult> {
    let request = params.into_request()?;
    handler.ensure_read_only(&request)?;
    handler.execute_blocking(request).await
}
