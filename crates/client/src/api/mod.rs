// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Typed wrappers over the backend's REST endpoints.
//!
//! Every call goes through [`AuthenticatedClient::request`], so session
//! refresh is invisible here. None of these special-case 401.
//!
//! [`AuthenticatedClient::request`]: crate::http::AuthenticatedClient::request

mod auth;
mod observations;
mod species;
mod users;

pub use auth::{AuthApi, Credentials, NewUser};
pub use observations::{ObservationsApi, DEFAULT_FEED_LIMIT};
pub use species::SpeciesApi;
pub use users::UsersApi;
