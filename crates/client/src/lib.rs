//! 3YOURMIND API client.
//!
//! A thin async client for the 3YOURMIND manufacturing-quoting REST API.
//! Endpoints are grouped into namespaces reached from
//! [`ThreeYourMindClient`]:
//!
//! - `common()` - colors, units, countries, currencies, materials
//! - `my_profile()` - preferences and addresses of the current user
//! - `organization_panel()` - user administration
//! - `user_panel()` - baskets, CAD uploads, quotes, orders, catalog
//!
//! # Example
//!
//! ```rust,ignore
//! use threeyd::{ClientConfig, ThreeYourMindClient};
//!
//! let config = ClientConfig::from_env("THREEYD")?;
//! let client = ThreeYourMindClient::new(&config)?;
//!
//! let basket = client.user_panel().create_basket().await?;
//! let line = client.user_panel().create_basket_line(basket.id).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod params;
#[cfg(any(test, feature = "test-util"))]
pub mod testing;
pub mod transport;
pub mod upload;

pub use client::ThreeYourMindClient;
pub use config::{AnalysisPolicy, ClientConfig, ConfigError};
pub use error::ApiError;
pub use threeyd_core;
pub use transport::{ReqwestTransport, Transport};
pub use upload::FileSource;
