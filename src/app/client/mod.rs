//! HTTP client for the CBN listing and document origin
//!
//! The module is organized into specialized components:
//! - `config`: HTTP client configuration and building
//! - `http`: request profiles and the fetcher returning status, content type and body

pub mod config;
pub mod http;

pub use config::ClientConfig;
pub use http::{FetchResponse, HttpFetcher, RequestProfile};
