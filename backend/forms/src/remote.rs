//! # Remote Endpoint
//!
//! HTTP client for the user API. Failure envelopes (400/401/404) are decoded
//! like success ones; only bodies that are not an envelope at all become
//! [`TransportError::Malformed`].
use models::{
    Envelope, HOME_ROUTE, LOGIN_PATH, LoginRequest, SIGNUP_PATH, SignupRequest, UserRecord,
};
use reqwest::Client;
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::{
    error::TransportError,
    pages::{login::LoginValues, signup::SignupValues},
    pipeline::Remote,
};

#[derive(Debug, Clone)]
pub struct UserApi {
    client: Client,
    base_url: String,
}

impl UserApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn create_user(
        &self,
        request: &SignupRequest,
    ) -> Result<Envelope<UserRecord>, TransportError> {
        self.post(SIGNUP_PATH, request).await
    }

    pub async fn authenticate_user(
        &self,
        request: &LoginRequest,
    ) -> Result<Envelope<UserRecord>, TransportError> {
        self.post(LOGIN_PATH, request).await
    }

    async fn post<B, D>(&self, path: &str, body: &B) -> Result<Envelope<D>, TransportError>
    where
        B: Serialize,
        D: DeserializeOwned,
    {
        let url = format!("{}{path}", self.base_url);
        let response = self.client.post(&url).json(body).send().await?;

        let status = response.status();
        debug!("POST {url} -> {status}");

        let bytes = response.bytes().await?;

        serde_json::from_slice(&bytes).map_err(|source| TransportError::Malformed {
            status: status.as_u16(),
            source,
        })
    }
}

impl Remote<SignupValues> for UserApi {
    type Data = UserRecord;

    fn success_route(&self) -> &'static str {
        HOME_ROUTE
    }

    async fn send(&self, values: &SignupValues) -> Result<Envelope<UserRecord>, TransportError> {
        self.create_user(&SignupRequest::from(values)).await
    }
}

impl Remote<LoginValues> for UserApi {
    type Data = UserRecord;

    fn success_route(&self) -> &'static str {
        HOME_ROUTE
    }

    async fn send(&self, values: &LoginValues) -> Result<Envelope<UserRecord>, TransportError> {
        self.authenticate_user(&LoginRequest::from(values)).await
    }
}
