//! Identity provider integration.
//!
//! Staff accounts live with an external identity provider. The service only
//! talks to it to re-authenticate a staff member and change their password.

pub mod client;

pub use client::{IdentityClient, IdentityError, SignInResponse};
