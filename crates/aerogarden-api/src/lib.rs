// aerogarden-api: Async Rust client for the AeroGarden cloud API

pub mod auth;
pub mod client;
pub mod devices;
pub mod error;
pub mod models;
pub mod session;
pub mod transport;

pub use auth::{Credentials, PASSWORD_PLACEHOLDER, redact_password};
pub use client::{Endpoint, GardenClient, Session};
pub use error::Error;
pub use models::{DeviceConfigUpdate, DeviceQuery, LoginResponse, RawGarden, UpdateResponse};
pub use transport::{
    CLIENT_USER_AGENT, DEFAULT_HOST, DEFAULT_TIMEOUT, FORM_CONTENT_TYPE, TlsMode, TransportConfig,
};
