use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use base64::{Engine, engine::general_purpose::STANDARD_NO_PAD};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::info;

use super::validate::{ValidationError, validate_login, validate_registration};

const ACCOUNT_FILE: &str = "account.toml";
const SESSION_FILE: &str = "session.toml";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("no registered account; create one with `teaser register`")]
    NoAccount,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("could not determine a data directory")]
    NoDataDir,
    #[error("{}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("{}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("could not serialize: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// The registered account as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub full_name: String,
    pub email: String,
    salt: String,
    password_hash: String,
}

impl Account {
    fn new(full_name: &str, email: &str, password: &str) -> Self {
        let mut salt = [0u8; 16];
        rand::rng().fill(&mut salt);
        let salt = STANDARD_NO_PAD.encode(salt);
        let password_hash = hash_password(&salt, password);
        Self {
            full_name: full_name.trim().to_string(),
            email: email.trim().to_string(),
            salt,
            password_hash,
        }
    }

    fn verify(&self, password: &str) -> bool {
        let computed = hash_password(&self.salt, password);
        constant_time_eq(computed.as_bytes(), self.password_hash.as_bytes())
    }
}

/// Byte equality whose running time does not depend on where the inputs differ.
pub(super) fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[derive(Debug, Serialize, Deserialize)]
struct Session {
    email: String,
    signed_in_at: DateTime<Utc>,
}

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    STANDARD_NO_PAD.encode(hasher.finalize())
}

/// Account and session files rooted at one directory.
pub struct SessionStore {
    root: PathBuf,
}

impl SessionStore {
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `$XDG_DATA_HOME/teaser` (or the platform equivalent).
    pub fn open_default() -> Result<Self, SessionError> {
        dirs::data_local_dir()
            .map(|d| Self::at(d.join("teaser")))
            .ok_or(SessionError::NoDataDir)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create (or replace) the account and sign it in.
    pub fn register(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
        confirm: &str,
    ) -> Result<Account, SessionError> {
        validate_registration(full_name, email, password, confirm)?;

        let account = Account::new(full_name, email, password);
        self.write_toml(ACCOUNT_FILE, &account)?;
        self.start_session(&account.email)?;
        info!("session: registered {}", account.email);
        Ok(account)
    }

    pub fn login(&self, email: &str, password: &str) -> Result<(), SessionError> {
        validate_login(email, password)?;

        let account = self.account()?.ok_or(SessionError::NoAccount)?;
        if account.email != email.trim() || !account.verify(password) {
            return Err(SessionError::InvalidCredentials);
        }
        self.start_session(&account.email)?;
        info!("session: signed in {}", account.email);
        Ok(())
    }

    /// Returns whether someone was signed in.
    pub fn logout(&self) -> Result<bool, SessionError> {
        let path = self.root.join(SESSION_FILE);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(SessionError::Io { path, source }),
        }
    }

    /// The signed-in email, as long as it still matches the stored account.
    pub fn current_user(&self) -> Result<Option<String>, SessionError> {
        let Some(session) = self.read_toml::<Session>(SESSION_FILE)? else {
            return Ok(None);
        };
        let account = self.account()?;
        Ok(account
            .filter(|a| a.email == session.email)
            .map(|a| a.email))
    }

    pub fn account(&self) -> Result<Option<Account>, SessionError> {
        self.read_toml(ACCOUNT_FILE)
    }

    fn start_session(&self, email: &str) -> Result<(), SessionError> {
        let session = Session {
            email: email.to_string(),
            signed_in_at: Utc::now(),
        };
        self.write_toml(SESSION_FILE, &session)
    }

    fn read_toml<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, SessionError> {
        let path = self.root.join(name);
        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(SessionError::Io { path, source }),
        };
        toml::from_str(&content)
            .map(Some)
            .map_err(|source| SessionError::Parse { path, source })
    }

    fn write_toml<T: Serialize>(&self, name: &str, value: &T) -> Result<(), SessionError> {
        fs::create_dir_all(&self.root).map_err(|source| SessionError::Io {
            path: self.root.clone(),
            source,
        })?;
        let path = self.root.join(name);
        let content = toml::to_string_pretty(value)?;
        fs::write(&path, content).map_err(|source| SessionError::Io { path, source })
    }
}
