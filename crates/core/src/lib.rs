//! 3YOURMIND core - shared types library.
//!
//! This crate provides the domain types used by every other crate in the
//! workspace:
//! - `threeyd` - the REST API client
//! - `threeyd-cli` - the catalog-import and user-migration tools
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O and no HTTP clients. Wire
//! names follow the platform's camelCase JSON.
//!
//! # Modules
//!
//! - [`types`] - Typed ids, the optional-unset [`Field`], and API payload types

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
