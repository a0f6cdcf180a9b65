// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use natura_core::{RecordId, Species};

use crate::http::{
    AuthenticatedClient, ClientResult, HttpTransport, ReqwestTransport, RequestDescriptor,
};

/// Taxonomy ranks the catalogue can be browsed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rank {
    Class,
    Order,
    Family,
}

impl Rank {
    fn segment(self) -> &'static str {
        match self {
            Rank::Class => "class",
            Rank::Order => "order",
            Rank::Family => "family",
        }
    }
}

/// Species catalogue endpoints.
#[derive(Debug, Clone)]
pub struct SpeciesApi<T: HttpTransport = ReqwestTransport> {
    client: AuthenticatedClient<T>,
}

impl<T: HttpTransport + 'static> SpeciesApi<T> {
    pub fn new(client: AuthenticatedClient<T>) -> Self {
        SpeciesApi { client }
    }

    /// Most observed species.
    pub async fn popular(&self, limit: usize) -> ClientResult<Vec<Species>> {
        let request = RequestDescriptor::get("/api/species/popular").query("limit", limit);
        self.client.request_json(request).await
    }

    /// Search the local catalogue by name.
    pub async fn search(&self, query: &str, limit: usize) -> ClientResult<Vec<Species>> {
        let request = RequestDescriptor::get("/api/species/search")
            .query("q", query)
            .query("limit", limit);
        self.client.request_json(request).await
    }

    /// Search that may import unknown species from the upstream taxonomy.
    pub async fn find(&self, query: &str, limit: usize) -> ClientResult<Vec<Species>> {
        let request = RequestDescriptor::get("/api/species/find")
            .query("q", query)
            .query("limit", limit);
        self.client.request_json(request).await
    }

    pub async fn get(&self, id: RecordId) -> ClientResult<Species> {
        self.client
            .request_json(RequestDescriptor::get(format!("/api/species/{}", id)))
            .await
    }

    /// Import one taxon from the upstream taxonomy.
    pub async fn import(&self, taxon_id: i64) -> ClientResult<Species> {
        let path = format!("/api/species/import/{}", taxon_id);
        self.client.request_json(RequestDescriptor::post(path)).await
    }

    pub async fn by_class(&self, name: &str, limit: usize) -> ClientResult<Vec<Species>> {
        self.by_rank(Rank::Class, name, limit).await
    }

    pub async fn by_order(&self, name: &str, limit: usize) -> ClientResult<Vec<Species>> {
        self.by_rank(Rank::Order, name, limit).await
    }

    pub async fn by_family(&self, name: &str, limit: usize) -> ClientResult<Vec<Species>> {
        self.by_rank(Rank::Family, name, limit).await
    }

    async fn by_rank(&self, rank: Rank, name: &str, limit: usize) -> ClientResult<Vec<Species>> {
        let path = format!("/api/species/{}/{}", rank.segment(), urlencoding::encode(name));
        let request = RequestDescriptor::get(path).query("limit", limit);
        self.client.request_json(request).await
    }
}
