// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use natura_core::User;
use serde::{Deserialize, Serialize};

use crate::http::{
    AuthenticatedClient, ClientResult, HttpTransport, ReqwestTransport, RequestDescriptor,
};

const LOGIN_PATH: &str = "/auth/login";
const LOGOUT_PATH: &str = "/auth/logout";
const ME_PATH: &str = "/auth/me";
const SIGNUP_PATH: &str = "/users/simple";

/// Login request body.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Signup request body.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    user: User,
}

/// Session endpoints.
#[derive(Debug, Clone)]
pub struct AuthApi<T: HttpTransport = ReqwestTransport> {
    client: AuthenticatedClient<T>,
}

impl<T: HttpTransport + 'static> AuthApi<T> {
    pub fn new(client: AuthenticatedClient<T>) -> Self {
        AuthApi { client }
    }

    /// Log in; the server sets the session cookies.
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<User> {
        let request =
            RequestDescriptor::post(LOGIN_PATH).json(&Credentials { username, password })?;
        let response: LoginResponse = self.client.request_json(request).await?;
        tracing::info!(user = %response.user.username, "logged in");
        Ok(response.user)
    }

    pub async fn logout(&self) -> ClientResult<()> {
        self.client
            .request(RequestDescriptor::post(LOGOUT_PATH).json(&serde_json::json!({}))?)
            .await?;
        tracing::info!("logged out");
        Ok(())
    }

    /// The user the current session belongs to.
    pub async fn me(&self) -> ClientResult<User> {
        self.client
            .request_json(RequestDescriptor::get(ME_PATH))
            .await
    }

    /// Create an account, then log in with it.
    pub async fn signup(&self, username: &str, email: &str, password: &str) -> ClientResult<User> {
        let request = RequestDescriptor::post(SIGNUP_PATH).json(&NewUser {
            username,
            email,
            password,
        })?;
        self.client.request(request).await?;
        tracing::info!(user = %username, "account created");
        self.login(username, password).await
    }
}
