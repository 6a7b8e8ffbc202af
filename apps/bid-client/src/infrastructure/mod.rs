//! Infrastructure Layer - Adapters and external integrations.
//!
//! This layer contains the concrete implementations of the port interfaces
//! defined in the application layer.

/// Configuration loaded from the environment.
pub mod config;

/// HTTP adapter for the authoritative price-update endpoint.
pub mod http;

/// Prometheus metrics instrumentation.
pub mod metrics;

/// Price sink implementations.
pub mod sink;

/// Logging and OpenTelemetry tracing integration.
pub mod telemetry;

/// Live price feed connection.
pub mod websocket;
