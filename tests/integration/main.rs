//! Integration tests against a mock HTTP server

mod custom_transport;
mod endpoints;
mod error_handling;
mod mock_server;
mod streaming;
