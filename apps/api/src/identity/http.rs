//! Identity provider backed by an Identity-Toolkit-style REST API.
//!
//! All account operations of the service go through this client. Tokens it
//! returns are opaque to the rest of the crate.

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use crate::identity::{Account, AuthSession, IdentityError, IdentityProvider};

const REDIRECT_URI: &str = "http://localhost";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    id_token: String,
    local_id: String,
    #[serde(default)]
    email: String,
    display_name: Option<String>,
}

impl TokenResponse {
    fn into_session(self) -> AuthSession {
        AuthSession {
            token: self.id_token,
            account: Account {
                uid: self.local_id,
                email: self.email,
                display_name: self.display_name.filter(|n| !n.is_empty()),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
    #[serde(default)]
    email: String,
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

/// Maps the provider's error codes onto `IdentityError`.
/// Codes may carry a suffix such as `"WEAK_PASSWORD : Password should be..."`.
fn classify_error(status: u16, message: &str) -> IdentityError {
    let code = message.split(" : ").next().unwrap_or(message).trim();
    match code {
        "EMAIL_EXISTS" => IdentityError::EmailExists,
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS"
        | "USER_DISABLED" | "INVALID_OOB_CODE" | "EXPIRED_OOB_CODE" => {
            IdentityError::InvalidCredentials
        }
        "INVALID_ID_TOKEN" | "TOKEN_EXPIRED" | "USER_NOT_FOUND" => IdentityError::InvalidToken,
        _ => IdentityError::Api {
            status,
            message: message.to_string(),
        },
    }
}

#[derive(Clone)]
pub struct HttpIdentityProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpIdentityProvider {
    pub fn new(base_url: &str, api_key: String) -> Result<Self, IdentityError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/v1/accounts:{}", self.base_url, method)
    }

    /// Calls `accounts:{method}` once. Failures are returned to the caller as-is.
    async fn call<B: Serialize, R: DeserializeOwned>(&self, method: &str, body: &B) -> Result<R, IdentityError> {
        debug!("Identity call accounts:{method}");
        let response = self
            .client
            .post(self.endpoint(method))
            .query(&[("key", &self.api_key)])
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<R>().await?);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ProviderError>(&text)
            .map(|e| e.error.message)
            .unwrap_or(text);
        warn!("Identity call accounts:{method} failed ({status}): {message}");
        Err(classify_error(status.as_u16(), &message))
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn sign_up(&self, email: &str, password: &str, display_name: &str) -> Result<AuthSession, IdentityError> {
        let created: TokenResponse = self
            .call(
                "signUp",
                &json!({ "email": email, "password": password, "returnSecureToken": true }),
            )
            .await?;

        let _: serde_json::Value = self
            .call(
                "update",
                &json!({ "idToken": created.id_token, "displayName": display_name }),
            )
            .await?;

        let mut session = created.into_session();
        session.account.display_name = Some(display_name.to_string());
        Ok(session)
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession, IdentityError> {
        let response: TokenResponse = self
            .call(
                "signInWithPassword",
                &json!({ "email": email, "password": password, "returnSecureToken": true }),
            )
            .await?;
        Ok(response.into_session())
    }

    async fn send_sign_in_link(&self, email: &str, continue_url: &str) -> Result<(), IdentityError> {
        let _: serde_json::Value = self
            .call(
                "sendOobCode",
                &json!({ "requestType": "EMAIL_SIGNIN", "email": email, "continueUrl": continue_url }),
            )
            .await?;
        Ok(())
    }

    async fn complete_link_sign_in(&self, email: &str, code: &str) -> Result<AuthSession, IdentityError> {
        let response: TokenResponse = self
            .call("signInWithEmailLink", &json!({ "email": email, "oobCode": code }))
            .await?;
        Ok(response.into_session())
    }

    async fn sign_in_federated(&self, provider_id: &str, id_token: &str) -> Result<AuthSession, IdentityError> {
        let post_body = format!("id_token={id_token}&providerId={provider_id}");
        let response: TokenResponse = self
            .call(
                "signInWithIdp",
                &json!({
                    "postBody": post_body,
                    "requestUri": REDIRECT_URI,
                    "returnSecureToken": true,
                    "returnIdpCredential": true
                }),
            )
            .await?;
        Ok(response.into_session())
    }

    async fn sign_out(&self, token: &str) -> Result<(), IdentityError> {
        // Id tokens are stateless; the client discards the token. Checking it
        // here still rejects sign-out with a bogus token.
        self.lookup(token).await?;
        Ok(())
    }

    async fn lookup(&self, token: &str) -> Result<Account, IdentityError> {
        let response: LookupResponse = self.call("lookup", &json!({ "idToken": token })).await?;
        response
            .users
            .into_iter()
            .next()
            .map(|u| Account {
                uid: u.local_id,
                email: u.email,
                display_name: u.display_name.filter(|n| !n.is_empty()),
            })
            .ok_or(IdentityError::InvalidToken)
    }
}
