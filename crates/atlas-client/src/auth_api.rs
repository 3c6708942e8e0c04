//! Client for the authentication and users service.

use std::time::Instant;

use atlas_common::{
    AtlasError, AtlasResult, AuthResponse, LoginRequest, OtpRequest, RegisterRequest, User,
};
use metrics::{counter, histogram};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::config::{parse_base, ClientConfig};
use crate::http::{build_client, read_json, transport_error};

/// Answer to a registration: an OTP has been sent to the address.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct RegisterResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Backend client. Requests carry the bearer token once one is set.
#[derive(Debug, Clone)]
pub struct AuthApi {
    client: Client,
    base: String,
    token: Option<String>,
}

impl AuthApi {
    pub fn new(config: &ClientConfig) -> AtlasResult<Self> {
        let base = parse_base("backend_url", &config.backend_url)?;
        Ok(Self {
            client: build_client(config.timeout)?,
            base: base.as_str().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: &LoginRequest) -> AtlasResult<AuthResponse> {
        request.validate()?;
        let auth: AuthResponse = self
            .send("login", self.request(Method::POST, "auth/login").json(request))
            .await?;
        info!(user_id = auth.user.id, "Logged in");
        Ok(auth)
    }

    /// Create an account. The password confirmation is checked locally only.
    #[instrument(skip(self, request, confirm_password), fields(email = %request.email))]
    pub async fn register(
        &self,
        request: &RegisterRequest,
        confirm_password: &str,
    ) -> AtlasResult<RegisterResponse> {
        request.validate(confirm_password)?;
        self.send("register", self.request(Method::POST, "auth/register").json(request))
            .await
    }

    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn verify_otp(&self, request: &OtpRequest) -> AtlasResult<AuthResponse> {
        request.validate()?;
        self.send("verify_otp", self.request(Method::POST, "auth/verify-otp").json(request))
            .await
    }

    /// The user owning the current token.
    ///
    /// A token the backend rejects comes back as [`AtlasError::SessionExpired`].
    #[instrument(skip(self))]
    pub async fn me(&self) -> AtlasResult<User> {
        if self.token.is_none() {
            return Err(AtlasError::Unauthorized);
        }
        self.send("me", self.request(Method::GET, "auth/me"))
            .await
            .map_err(|e| if e.is_auth_failure() { AtlasError::SessionExpired } else { e })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base, path);
        let builder = self.client.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        builder: RequestBuilder,
    ) -> AtlasResult<T> {
        counter!("atlas_backend_requests_total", "endpoint" => endpoint).increment(1);
        let start = Instant::now();

        let result = match builder.send().await {
            Ok(response) => read_json(response).await,
            Err(e) => Err(transport_error(e)),
        };

        histogram!("atlas_backend_request_duration_ms", "endpoint" => endpoint)
            .record(start.elapsed().as_secs_f64() * 1000.0);
        if let Err(e) = &result {
            counter!("atlas_backend_request_errors_total", "endpoint" => endpoint).increment(1);
            warn!(endpoint, status = e.http_status_code(), error = %e, "Backend request failed");
        }
        result
    }
}
