// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use natura_core::{NewObservation, Observation, ObservationPatch, RecordId};

use crate::http::{
    AuthenticatedClient, ClientResult, HttpTransport, ReqwestTransport, RequestDescriptor,
};

/// Page size of the explore feed.
pub const DEFAULT_FEED_LIMIT: usize = 30;

/// Observation endpoints.
#[derive(Debug, Clone)]
pub struct ObservationsApi<T: HttpTransport = ReqwestTransport> {
    client: AuthenticatedClient<T>,
}

impl<T: HttpTransport + 'static> ObservationsApi<T> {
    pub fn new(client: AuthenticatedClient<T>) -> Self {
        ObservationsApi { client }
    }

    /// Most recent observations, newest first.
    pub async fn list(&self, limit: usize) -> ClientResult<Vec<Observation>> {
        let request = RequestDescriptor::get("/observations").query("limit", limit);
        self.client.request_json(request).await
    }

    pub async fn get(&self, id: RecordId) -> ClientResult<Observation> {
        self.client
            .request_json(RequestDescriptor::get(format!("/observations/{}", id)))
            .await
    }

    /// Every observation posted by one user.
    pub async fn list_for_user(&self, user_id: RecordId) -> ClientResult<Vec<Observation>> {
        let path = format!("/observations/GetAllFromUser/{}", user_id);
        self.client.request_json(RequestDescriptor::get(path)).await
    }

    /// Post an observation without an image.
    pub async fn create(&self, observation: &NewObservation) -> ClientResult<Observation> {
        observation.validate()?;
        let request = RequestDescriptor::post("/observations/simple").json(observation)?;
        self.client.request_json(request).await
    }

    /// Apply a partial update. An empty patch only re-reads the record.
    pub async fn update(
        &self,
        id: RecordId,
        patch: &ObservationPatch,
    ) -> ClientResult<Observation> {
        patch.validate()?;
        if patch.is_empty() {
            return self.get(id).await;
        }
        let request = RequestDescriptor::patch(format!("/observations/{}", id)).json(patch)?;
        self.client.request_json(request).await
    }

    pub async fn delete(&self, id: RecordId) -> ClientResult<()> {
        self.client
            .request(RequestDescriptor::delete(format!("/observations/{}", id)))
            .await?;
        Ok(())
    }
}
