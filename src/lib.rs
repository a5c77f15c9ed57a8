//! Core workflow for downloading National Rail open data feeds.
//!
//! The crate covers everything except presentation: persisted settings
//! ([`ConfigStore`]), the credential-for-token exchange and feed requests
//! ([`api::ApiClient`]), and the end-to-end download workflow
//! ([`Downloader`]). A shell on top of this crate is expected to render
//! [`AppError`] values and prompt the user when it sees
//! [`AppError::CredentialsMissing`].

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod utils;

pub use api::{ApiClient, ApiConfig};
pub use application::Downloader;
pub use config::{ConfigField, ConfigRecord, ConfigStore, FileStorage, MemoryStorage};
pub use domain::{AppError, Report};
