//! Owner lookups backed by the services that own each business object.
//!
//! Every business type is served by its own HTTP endpoint answering
//! `GET {base_url}/{biz_id}` with `{"owner_id": <uid>}`.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use remarks_core::audience::{OwnerLookup, OwnerLookupError};
use remarks_core::comment::Biz;

/// Body returned by an owner endpoint.
#[derive(Debug, Deserialize)]
struct OwnerResponse {
    owner_id: i64,
}

/// Owner lookup over HTTP.
#[derive(Debug, Clone)]
pub struct HttpOwnerLookup {
    client: reqwest::Client,
    biz: Biz,
    base_url: String,
}

impl HttpOwnerLookup {
    /// Creates a lookup for one business type.
    ///
    /// The client's own timeout bounds every lookup.
    pub fn new(client: reqwest::Client, biz: Biz, base_url: impl Into<String>) -> Self {
        Self {
            client,
            biz,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Build the URL for one object.
    fn url(&self, biz_id: i64) -> String {
        format!("{}/{}", self.base_url, biz_id)
    }
}

#[async_trait]
impl OwnerLookup for HttpOwnerLookup {
    async fn owner_of(&self, biz_id: i64) -> Result<i64, OwnerLookupError> {
        let response = self
            .client
            .get(self.url(biz_id))
            .send()
            .await
            .map_err(|e| OwnerLookupError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(OwnerLookupError::NotFound {
                biz: self.biz,
                biz_id,
            });
        }
        if !status.is_success() {
            return Err(OwnerLookupError::Unavailable(format!(
                "{} owner service returned {status}",
                self.biz
            )));
        }

        let body: OwnerResponse = response
            .json()
            .await
            .map_err(|e| OwnerLookupError::InvalidResponse(e.to_string()))?;

        tracing::trace!(biz = %self.biz, biz_id, owner_id = body.owner_id, "Owner resolved");
        Ok(body.owner_id)
    }
}

#[cfg(test)]
pub use testing::StaticOwnerLookup;

#[cfg(test)]
mod testing {
    use std::collections::HashMap;

    use super::*;

    /// Owner lookup answering from a fixed table.
    #[derive(Debug, Clone)]
    pub struct StaticOwnerLookup {
        biz: Biz,
        owners: HashMap<i64, i64>,
    }

    impl StaticOwnerLookup {
        pub fn new(biz: Biz) -> Self {
            Self {
                biz,
                owners: HashMap::new(),
            }
        }

        pub fn with_owner(mut self, biz_id: i64, owner_id: i64) -> Self {
            self.owners.insert(biz_id, owner_id);
            self
        }
    }

    #[async_trait]
    impl OwnerLookup for StaticOwnerLookup {
        async fn owner_of(&self, biz_id: i64) -> Result<i64, OwnerLookupError> {
            self.owners
                .get(&biz_id)
                .copied()
                .ok_or(OwnerLookupError::NotFound {
                    biz: self.biz,
                    biz_id,
                })
        }
    }
}
