//! 3YOURMIND tools library.
//!
//! The `threeyd` binary is a thin clap front end over this crate so the
//! orchestrators can be tested against a scripted transport:
//!
//! - [`import`] - CAD files and CSV rows into catalog items
//! - [`migrate`] - users, preferences and addresses from one platform to another
//! - [`report`] - JSON run reports shared by both tools

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod commands;
pub mod import;
pub mod logging;
pub mod migrate;
pub mod report;
