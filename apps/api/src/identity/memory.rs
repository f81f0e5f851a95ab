use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::identity::{Account, AuthSession, IdentityError, IdentityProvider};

struct Credential {
    account: Account,
    password: Option<String>,
}

/// Provider fake for tests. Tokens are `token-{uid}` and link codes are `code-{email}`.
#[derive(Default)]
pub struct InMemoryIdentityProvider {
    accounts: RwLock<HashMap<String, Credential>>,
    links_sent: RwLock<Vec<(String, String)>>,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an account directly and returns its bearer token.
    pub async fn register(&self, uid: &str, email: &str) -> String {
        self.accounts.write().await.insert(
            email.to_string(),
            Credential {
                account: Account {
                    uid: uid.to_string(),
                    email: email.to_string(),
                    display_name: None,
                },
                password: None,
            },
        );
        token_for(uid)
    }

    pub async fn links_sent(&self) -> Vec<(String, String)> {
        self.links_sent.read().await.clone()
    }

    async fn session_for_email(&self, email: &str, uid: impl FnOnce() -> String) -> AuthSession {
        let mut accounts = self.accounts.write().await;
        let credential = accounts.entry(email.to_string()).or_insert_with(|| Credential {
            account: Account {
                uid: uid(),
                email: email.to_string(),
                display_name: None,
            },
            password: None,
        });
        session(&credential.account)
    }
}

fn token_for(uid: &str) -> String {
    format!("token-{uid}")
}

fn session(account: &Account) -> AuthSession {
    AuthSession {
        token: token_for(&account.uid),
        account: account.clone(),
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn sign_up(&self, email: &str, password: &str, display_name: &str) -> Result<AuthSession, IdentityError> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(email) {
            return Err(IdentityError::EmailExists);
        }
        let account = Account {
            uid: format!("uid-{}", accounts.len() + 1),
            email: email.to_string(),
            display_name: Some(display_name.to_string()),
        };
        let created = session(&account);
        accounts.insert(
            email.to_string(),
            Credential {
                account,
                password: Some(password.to_string()),
            },
        );
        Ok(created)
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession, IdentityError> {
        let accounts = self.accounts.read().await;
        match accounts.get(email) {
            Some(c) if c.password.as_deref() == Some(password) => Ok(session(&c.account)),
            _ => Err(IdentityError::InvalidCredentials),
        }
    }

    async fn send_sign_in_link(&self, email: &str, continue_url: &str) -> Result<(), IdentityError> {
        self.links_sent
            .write()
            .await
            .push((email.to_string(), continue_url.to_string()));
        Ok(())
    }

    async fn complete_link_sign_in(&self, email: &str, code: &str) -> Result<AuthSession, IdentityError> {
        if code != format!("code-{email}") {
            return Err(IdentityError::InvalidCredentials);
        }
        Ok(self.session_for_email(email, || format!("link-{email}")).await)
    }

    async fn sign_in_federated(&self, provider_id: &str, id_token: &str) -> Result<AuthSession, IdentityError> {
        // The fake treats the id token as the federated email address.
        let email = id_token.to_string();
        Ok(self
            .session_for_email(&email, || format!("{provider_id}-{id_token}"))
            .await)
    }

    async fn sign_out(&self, token: &str) -> Result<(), IdentityError> {
        self.lookup(token).await.map(|_| ())
    }

    async fn lookup(&self, token: &str) -> Result<Account, IdentityError> {
        self.accounts
            .read()
            .await
            .values()
            .find(|c| token_for(&c.account.uid) == token)
            .map(|c| c.account.clone())
            .ok_or(IdentityError::InvalidToken)
    }
}
