// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! One backend session for the lifetime of a command.
//!
//! The HTTP client and the push channel share a cookie jar, so logging in
//! once authenticates both.

use std::sync::Arc;

use natura_client::{
    AuthApi, AuthEvents, AuthenticatedClient, ChannelConfig, ClientConfig, CookieJar,
    ObservationsApi, RealtimeChannel, SpeciesApi, UsersApi,
};
use natura_core::{Observation, User};

use crate::error::{Error, Result};

/// Environment variable holding the login password.
pub const PASSWORD_ENV: &str = "NATURA_PASSWORD";

pub struct Session {
    config: ClientConfig,
    jar: Arc<CookieJar>,
    client: AuthenticatedClient,
    user: Option<User>,
}

impl Session {
    /// Build the client and log in as `username` when given.
    pub async fn open(config: ClientConfig, username: Option<&str>) -> Result<Self> {
        let jar = Arc::new(CookieJar::default());
        let events = Arc::new(AuthEvents::new());
        let client = AuthenticatedClient::new(&config, Arc::clone(&jar), events)?;

        let user = match username {
            Some(name) => {
                let password =
                    std::env::var(PASSWORD_ENV).map_err(|_| Error::MissingPassword(name.into()))?;
                Some(AuthApi::new(client.clone()).login(name, &password).await?)
            }
            None => None,
        };

        Ok(Session {
            config,
            jar,
            client,
            user,
        })
    }

    /// The user logged in by [`Session::open`], if any.
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn auth_events(&self) -> &Arc<AuthEvents> {
        self.client.auth_events()
    }

    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.client.clone())
    }

    pub fn observations(&self) -> ObservationsApi {
        ObservationsApi::new(self.client.clone())
    }

    pub fn species(&self) -> SpeciesApi {
        SpeciesApi::new(self.client.clone())
    }

    pub fn users(&self) -> UsersApi {
        UsersApi::new(self.client.clone())
    }

    /// A push channel for observation events, riding this session's cookies.
    pub fn observation_channel(&self) -> Result<RealtimeChannel<Observation>> {
        let config = ChannelConfig::from_client_config(&self.config)?;
        Ok(RealtimeChannel::with_cookies(config, Arc::clone(&self.jar)))
    }
}
