//! API Handler for hobbygraph
//!
//! Owns the shared schema and store and runs requests through the executor.
//! Execution is synchronous; async callers go through the blocking pool.

use std::sync::Arc;

use tracing::{debug, info};

use crate::executor::{operation_type, ExecutionResult, OperationType, QueryExecutor, Request};
use crate::schema::Schema;
use crate::storage::Store;

use super::errors::{ApiError, ApiResult};
use super::request::parse_body;

/// Shared entry point for every ingress (HTTP, CLI)
#[derive(Clone)]
pub struct ApiHandler {
    schema: Arc<Schema>,
    store: Arc<dyn Store>,
}

impl ApiHandler {
    /// Create a new API handler
    pub fn new(schema: Schema, store: Arc<dyn Store>) -> Self {
        Self {
            schema: Arc::new(schema),
            store,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    /// Executes a decoded request
    pub fn execute(&self, request: &Request) -> ExecutionResult {
        let result = QueryExecutor::new(&self.schema, self.store.as_ref()).execute(request);
        debug!(
            errors = result.errors.len(),
            request_error = result.is_request_error(),
            "request executed"
        );
        result
    }

    /// Handles a raw JSON request body
    pub fn handle(&self, body: &[u8]) -> ExecutionResult {
        match parse_body(body) {
            Ok(request) => self.execute(&request),
            Err(e) => e.into(),
        }
    }

    /// Executes on the blocking pool
    pub async fn execute_blocking(&self, request: Request) -> ApiResult<ExecutionResult> {
        let handler = self.clone();
        tokio::task::spawn_blocking(move || handler.execute(&request))
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))
    }

    /// Rejects mutations arriving over a read-only transport
    pub fn ensure_read_only(&self, request: &Request) -> ApiResult<()> {
        match operation_type(request) {
            Some(OperationType::Mutation) => {
                info!("rejected mutation over GET");
                Err(ApiError::MethodNotAllowed("mutation".to_string()))
            }
            _ => Ok(()),
        }
    }
}
