//! Core types for the 3YOURMIND client.
//!
//! This module provides type-safe wrappers for platform ids and the payloads
//! the client sends and receives.

pub mod basket;
pub mod field;
pub mod id;
pub mod page;
pub mod quote;
pub mod status;
pub mod user;

pub use basket::*;
pub use field::Field;
pub use id::*;
pub use page::Page;
pub use quote::*;
pub use status::*;
pub use user::*;
