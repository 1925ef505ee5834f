//! Login, signed session tokens and per-request role resolution.
//!
//! A token is `username.hex(hmac_sha256(secret, username))`. The role is
//! looked up in the user directory on every request, so only the username is
//! trusted from the token.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::AppState;
use crate::error::ApiError;

pub const SESSION_COOKIE: &str = "edgecare_session";
const PASSWORD_MAC_KEY: &[u8] = b"edgecare-password-check";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Coach,
    Player,
}

#[derive(Debug)]
pub struct UserRecord {
    pub username: String,
    password: SecretString,
    pub role: Role,
}

impl UserRecord {
    pub fn new(username: &str, password: &str, role: Role) -> Self {
        Self {
            username: username.to_string(),
            password: SecretString::new(password.into()),
            role,
        }
    }

    /// Both sides are reduced to fixed-size MACs and compared in constant
    /// time, so neither content nor length leaks through timing.
    fn password_matches(&self, candidate: &str) -> bool {
        let keyed = || Hmac::<Sha256>::new_from_slice(PASSWORD_MAC_KEY).ok();
        let (Some(mut stored), Some(mut offered)) = (keyed(), keyed()) else {
            return false;
        };
        stored.update(self.password.expose_secret().as_bytes());
        offered.update(candidate.as_bytes());
        offered
            .verify_slice(&stored.finalize().into_bytes())
            .is_ok()
    }
}

#[derive(Debug, Default)]
pub struct UserDirectory {
    users: Vec<UserRecord>,
}

impl UserDirectory {
    pub fn new(users: Vec<UserRecord>) -> Self {
        Self { users }
    }

    pub fn authenticate(&self, username: &str, password: &str) -> Option<&UserRecord> {
        self.users
            .iter()
            .find(|u| u.username == username && u.password_matches(password))
    }

    pub fn role_of(&self, username: &str) -> Option<Role> {
        self.users
            .iter()
            .find(|u| u.username == username)
            .map(|u| u.role)
    }
}

#[derive(Clone)]
pub struct SessionSigner {
    mac: Hmac<Sha256>,
}

impl SessionSigner {
    pub fn new(key: &SecretString) -> Result<Self, ApiError> {
        let mac = Hmac::<Sha256>::new_from_slice(key.expose_secret().as_bytes())
            .map_err(|e| ApiError::Internal(e.to_string()))?;
        Ok(Self { mac })
    }

    /// Per-process key for deployments without a configured secret.
    pub fn random() -> Result<Self, ApiError> {
        let key = format!(
            "{}{}",
            uuid::Uuid::new_v4().simple(),
            uuid::Uuid::new_v4().simple()
        );
        Self::new(&SecretString::new(key.into_boxed_str()))
    }

    pub fn sign(&self, username: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(username.as_bytes());
        format!("{username}.{}", hex::encode(mac.finalize().into_bytes()))
    }

    /// Username carried by a genuine token.
    pub fn verify(&self, token: &str) -> Option<String> {
        let (username, sig) = token.rsplit_once('.')?;
        let sig = hex::decode(sig).ok()?;
        let mut mac = self.mac.clone();
        mac.update(username.as_bytes());
        mac.verify_slice(&sig).ok()?;
        Some(username.to_string())
    }
}

/// The user behind the request. Players log under their own username.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrentUser {
    pub username: String,
    pub role: Role,
}

impl CurrentUser {
    pub fn require(&self, role: Role, message: &str) -> Result<(), ApiError> {
        if self.role == role {
            Ok(())
        } else {
            Err(ApiError::Forbidden(message.to_string()))
        }
    }
}

fn token_from(parts: &Parts) -> Option<&str> {
    if let Some(bearer) = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    {
        return Some(bearer.trim());
    }
    parts
        .headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .find_map(|c| c.trim().strip_prefix(SESSION_COOKIE)?.strip_prefix('='))
}

impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let unauthorized = || ApiError::Unauthorized("Login required.".to_string());
        let token = token_from(parts).ok_or_else(unauthorized)?;
        let username = state.sessions.verify(token).ok_or_else(unauthorized)?;
        let role = state.users.role_of(&username).ok_or_else(unauthorized)?;
        Ok(CurrentUser { username, role })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> SessionSigner {
        SessionSigner::new(&SecretString::new("test-secret".into())).unwrap()
    }

    #[test]
    fn signed_token_round_trips() {
        let s = signer();
        let token = s.sign("player1");
        assert!(token.starts_with("player1."));
        assert_eq!(s.verify(&token).as_deref(), Some("player1"));
    }

    #[test]
    fn tampered_or_foreign_tokens_are_rejected() {
        let s = signer();
        let token = s.sign("player1");
        let forged = token.replacen("player1", "coach1", 1);
        assert_eq!(s.verify(&forged), None);
        assert_eq!(s.verify("player1"), None);
        assert_eq!(s.verify("player1.zz"), None);
        assert_eq!(SessionSigner::random().unwrap().verify(&token), None);
    }

    #[test]
    fn directory_checks_passwords() {
        let dir = UserDirectory::new(vec![UserRecord::new("ana", "pw", Role::Player)]);
        assert!(dir.authenticate("ana", "pw").is_some());
        assert!(dir.authenticate("ana", "nope").is_none());
        assert_eq!(dir.role_of("ana"), Some(Role::Player));
        assert_eq!(dir.role_of("ghost"), None);
    }

    #[test]
    fn password_check_rejects_prefixes_and_extensions() {
        let user = UserRecord::new("ana", "secret-pw", Role::Player);
        assert!(user.password_matches("secret-pw"));
        assert!(!user.password_matches("secret"));
        assert!(!user.password_matches("secret-pw2"));
        assert!(!user.password_matches(""));
        assert!(UserRecord::new("ben", "", Role::Coach).password_matches(""));
    }
}
