//! # HTTP Server Module
//!
//! Thin ingress over the API layer.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/graphql` (configurable) - GraphQL over POST and GET, GraphiQL for
//!   browsers

pub mod config;
pub mod graphiql;
pub mod graphql_routes;
pub mod health_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use server::HttpServer;
