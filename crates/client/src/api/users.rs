// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use natura_core::{RecordId, User};

use crate::http::{
    AuthenticatedClient, ClientResult, HttpTransport, ReqwestTransport, RequestDescriptor,
};

/// Public user profiles.
#[derive(Debug, Clone)]
pub struct UsersApi<T: HttpTransport = ReqwestTransport> {
    client: AuthenticatedClient<T>,
}

impl<T: HttpTransport + 'static> UsersApi<T> {
    pub fn new(client: AuthenticatedClient<T>) -> Self {
        UsersApi { client }
    }

    pub async fn get(&self, id: RecordId) -> ClientResult<User> {
        self.client
            .request_json(RequestDescriptor::get(format!("/users/{}", id)))
            .await
    }
}
