//! Endpoint namespaces.
//!
//! Each namespace borrows the client and groups the endpoints of one area of
//! the platform. Methods with optional arguments take [`Field`] values:
//! `Field::Unset` leaves the argument out of the request entirely,
//! `Field::Null` sends an explicit `null`.
//!
//! [`Field`]: threeyd_core::Field

mod common;
mod my_profile;
mod organization_panel;
pub mod user_panel;

pub use common::Common;
pub use my_profile::MyProfile;
pub use organization_panel::{OrganizationPanel, UserQuery};
pub use user_panel::UserPanel;
