use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Failures of the external auth authority path.
///
/// `ProviderFailure` is deliberately detail-free: upstream status codes,
/// network errors and bodies are logged server-side only.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("account already exists")]
    AccountExists,
    #[error("auth provider failure")]
    ProviderFailure,
}

/// Rights granted to every newly registered account.
const DEFAULT_USER_RIGHTS: &[&str] = &["user"];

#[derive(Debug, Deserialize)]
struct JwtResponse {
    jwt: String,
}

#[derive(Debug, Serialize)]
struct CreateUserPayload<'a> {
    #[serde(rename = "userEmail")]
    user_email: &'a str,
    #[serde(rename = "userPassword")]
    user_password: &'a str,
    #[serde(rename = "userFirstName")]
    user_first_name: &'a str,
    #[serde(rename = "userLastName")]
    user_last_name: &'a str,
    #[serde(rename = "userRights")]
    user_rights: &'a [&'a str],
    dashboards: [&'a str; 0],
    subscriptions: [&'a str; 0],
}

/// Descriptor of a freshly registered account, as reported by the authority.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUserDescriptor {
    #[serde(rename = "userID")]
    pub user_id: String,
}

/// Client for the external auth authority.
///
/// The authority owns credentials and token signing; this client only
/// translates its wire behavior into the `AuthError` taxonomy:
/// - 401 on login          -> `InvalidCredentials`
/// - 409 on create-user    -> `AccountExists`
/// - everything else non-2xx, network or parse failure -> `ProviderFailure`
#[derive(Clone)]
pub struct AuthProviderClient {
    http: reqwest::Client,
    login_url: Url,
    create_user_url: Url,
    refresh_url: Url,
    service_jwt: String,
}

impl std::fmt::Debug for AuthProviderClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print the service credential
        f.debug_struct("AuthProviderClient")
            .field("login_url", &self.login_url)
            .field("create_user_url", &self.create_user_url)
            .field("refresh_url", &self.refresh_url)
            .finish()
    }
}

impl AuthProviderClient {
    pub fn new(
        http: reqwest::Client,
        login_url: Url,
        create_user_url: Url,
        refresh_url: Url,
        service_jwt: String,
    ) -> Self {
        Self {
            http,
            login_url,
            create_user_url,
            refresh_url,
            service_jwt,
        }
    }

    /// Attempt a credential login; returns the signed token on success.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let form = [("userEmail", email), ("userPassword", password)];

        let resp = self
            .http
            .post(self.login_url.clone())
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "failed to call auth-service login");
                AuthError::ProviderFailure
            })?;

        match resp.status() {
            StatusCode::UNAUTHORIZED => {
                tracing::info!("supplied user credentials failed authentication");
                Err(AuthError::InvalidCredentials)
            }
            status if status.is_success() => {
                let body: JwtResponse = resp.json().await.map_err(|e| {
                    tracing::error!(error = %e, "auth-service login returned an unreadable body");
                    AuthError::ProviderFailure
                })?;
                Ok(body.jwt)
            }
            status => {
                tracing::error!(%status, "auth-service login failed");
                Err(AuthError::ProviderFailure)
            }
        }
    }

    /// Exchange a still-valid token for a fresh one.
    ///
    /// The current token is forwarded in the `jwt` header; the gate has
    /// already validated it on the way in.
    pub async fn refresh(&self, token: &str) -> Result<String, AuthError> {
        let resp = self
            .http
            .post(self.refresh_url.clone())
            .header("jwt", token)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "failed to call auth-service refresh");
                AuthError::ProviderFailure
            })?;

        match resp.status() {
            StatusCode::UNAUTHORIZED => {
                tracing::info!("auth-service declined to refresh the supplied token");
                Err(AuthError::InvalidCredentials)
            }
            status if status.is_success() => {
                let body: JwtResponse = resp.json().await.map_err(|e| {
                    tracing::error!(error = %e, "auth-service refresh returned an unreadable body");
                    AuthError::ProviderFailure
                })?;
                Ok(body.jwt)
            }
            status => {
                tracing::error!(%status, "auth-service refresh failed");
                Err(AuthError::ProviderFailure)
            }
        }
    }

    /// Register a new account with the fixed default-rights payload and
    /// empty dashboard/subscription lists.
    pub async fn create_user(
        &self,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<NewUserDescriptor, AuthError> {
        let payload = CreateUserPayload {
            user_email: email,
            user_password: password,
            user_first_name: first_name,
            user_last_name: last_name,
            user_rights: DEFAULT_USER_RIGHTS,
            dashboards: [],
            subscriptions: [],
        };

        let resp = self
            .http
            .post(self.create_user_url.clone())
            .header("jwt", &self.service_jwt)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "failed to call auth-service create-user");
                AuthError::ProviderFailure
            })?;

        match resp.status() {
            StatusCode::CONFLICT => {
                tracing::info!("auth-service reported a duplicate account");
                Err(AuthError::AccountExists)
            }
            status if status.is_success() => {
                let body: NewUserDescriptor = resp.json().await.map_err(|e| {
                    tracing::error!(error = %e, "auth-service create-user returned an unreadable body");
                    AuthError::ProviderFailure
                })?;
                Ok(body)
            }
            status => {
                tracing::error!(%status, "auth-service create-user failed");
                Err(AuthError::ProviderFailure)
            }
        }
    }
}
