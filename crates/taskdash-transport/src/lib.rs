#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]

//! HTTP transport for the task dashboard backend.
//!
//! Layout:
//! - `config.rs`: immutable client configuration
//! - `credentials.rs`: credential providers and the authorization interceptor
//! - `client.rs`: the shared HTTP client and response decoding
//! - `transport.rs`: the dashboard operation catalog
//! - `models.rs`: typed views over backend payloads
//! - `error.rs`: transport error taxonomy

pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod models;
pub mod transport;

pub use client::ApiClient;
pub use config::ClientConfig;
pub use credentials::{
    AuthInterceptor, CredentialProvider, DEFAULT_INIT_DATA_VAR, EnvInitData, NoCredentials,
    StaticCredentials,
};
pub use error::{ErrorKind, TransportError, TransportResult};
pub use models::{Project, Task};
pub use transport::{DashboardTransport, MindmapUpload, QuarterTasks};
