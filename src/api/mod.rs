//! Remote user service client.
//!
//! The directory lives behind a plain REST resource: `GET /users` returns
//! the full collection, `DELETE /users/{id}` drops one entry. Everything
//! else the UI offers (add, edit) never reaches the wire — see the store.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{ApiError, Result};

/// Nested postal fields of a user record.
///
/// The service sends more address members (street, suite, geo); only the
/// two the UI shows are kept.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub city: String,
    pub zipcode: String,
}

/// One directory entry, as served by `GET /users`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: Address,
}

/// Seam to the remote directory, so the store can run against a fake.
pub trait UserService: Send + Sync {
    /// Read the full remote collection.
    fn fetch_users(&self) -> Result<Vec<User>>;

    /// Ask the service to drop one entry. The response body is ignored;
    /// only transport failure is an error.
    fn delete_user(&self, id: u64) -> Result<()>;
}

/// `UserService` over HTTP via reqwest's blocking client.
pub struct HttpUserService {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpUserService {
    /// Build a client for the service rooted at `base_url`.
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl UserService for HttpUserService {
    fn fetch_users(&self) -> Result<Vec<User>> {
        tracing::debug!(base = %self.base_url, "fetching user collection");
        let resp = self.client.get(self.url("/users")).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }
        resp.json::<Vec<User>>().map_err(ApiError::Decode)
    }

    fn delete_user(&self, id: u64) -> Result<()> {
        // Any settled response counts: the caller removes the entry on
        // settle, not on confirmed success.
        let resp = self.client.delete(self.url(&format!("/users/{id}"))).send()?;
        tracing::debug!(id, status = %resp.status(), "delete settled");
        Ok(())
    }
}
