use std::net::SocketAddr;
use std::time::Duration;

use edgecare_core::LogError;
use edgecare_core::config::Config;
use secrecy::SecretString;

use crate::session::{Role, UserRecord};

pub const DEFAULT_MAX_BODY: usize = 64 * 1024;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEMO_USERS: &str = "coach1:coachpass:coach,player1:playerpass:player";

#[derive(Debug)]
pub struct ServerConfig {
    pub address: SocketAddr,
    /// `None` means a random per-process secret; sessions die on restart.
    pub session_secret: Option<SecretString>,
    pub users: Vec<UserRecord>,
    pub max_body_size: usize,
    pub request_timeout: Duration,
    pub core: Config,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, LogError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    pub fn from_env_with<F>(mut get: F) -> Result<Self, LogError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let address = match get("ADDRESS") {
            Some(raw) => raw
                .parse()
                .map_err(|_| LogError::Config(format!("ADDRESS is not a socket address: {raw:?}")))?,
            None => SocketAddr::from(([127, 0, 0, 1], 3000)),
        };
        let session_secret = get("EDGECARE_SESSION_SECRET")
            .filter(|s| !s.is_empty())
            .map(|s| SecretString::new(s.into_boxed_str()));
        let users = parse_users(&get("EDGECARE_USERS").unwrap_or_else(|| DEMO_USERS.to_string()))?;
        let max_body_size = get("MAX_HTTP_BODY_SIZE")
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_BODY);
        let request_timeout = get("EDGECARE_REQUEST_TIMEOUT_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);
        let core = Config::from_env_with(&mut get)?;

        Ok(Self {
            address,
            session_secret,
            users,
            max_body_size,
            request_timeout,
            core,
        })
    }
}

/// Parses `user:password:role` records separated by commas.
pub fn parse_users(raw: &str) -> Result<Vec<UserRecord>, LogError> {
    raw.split(',')
        .map(str::trim)
        .filter(|rec| !rec.is_empty())
        .map(|rec| {
            let mut parts = rec.splitn(3, ':');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(user), Some(pass), Some(role)) if !user.is_empty() => {
                    let role = match role {
                        "coach" => Role::Coach,
                        "player" => Role::Player,
                        other => {
                            return Err(LogError::Config(format!(
                                "unknown role {other:?} for user {user}"
                            )));
                        }
                    };
                    Ok(UserRecord::new(user, pass, role))
                }
                _ => Err(LogError::Config(format!(
                    "EDGECARE_USERS entry must be user:password:role, got {rec:?}"
                ))),
            }
        })
        .collect()
}
