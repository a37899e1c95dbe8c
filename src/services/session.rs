//! User accounts and the on-disk session
//!
//! Accounts live in `users.json` next to the record collections; passwords
//! are stored as a salted FNV-1a digest. This keeps plaintext off disk but
//! makes no cryptographic claim; the tool is single-machine.

use crate::services::store::{StoreError, ERR_IO};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// The username is already registered.
pub const ERR_USERNAME_TAKEN: i32 = 202;
/// Unknown username or wrong password.
pub const ERR_INVALID_LOGIN: i32 = 101;
/// Empty username or password.
pub const ERR_EMPTY_CREDENTIALS: i32 = 200;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserRecord {
    username: String,
    salt: String,
    digest: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionRecord {
    username: String,
    started_at: DateTime<Utc>,
}

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for &b in bytes {
        hash ^= u64::from(b);
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

fn digest(salt: &str, password: &str) -> String {
    format!("{:016x}", fnv1a(format!("{salt}:{password}").as_bytes()))
}

pub struct SessionManager {
    root: PathBuf,
}

impl SessionManager {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn users_path(&self) -> PathBuf {
        self.root.join("users.json")
    }

    fn session_path(&self) -> PathBuf {
        self.root.join("session.json")
    }

    fn load_users(&self) -> Result<Vec<UserRecord>, StoreError> {
        let path = self.users_path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&path)
            .map_err(|e| StoreError { code: ERR_IO, message: format!("reading users.json: {e}") })?;
        serde_json::from_str(&contents)
            .map_err(|e| StoreError { code: ERR_IO, message: format!("users.json is malformed: {e}") })
    }

    fn save_users(&self, users: &[UserRecord]) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root)
            .map_err(|e| StoreError { code: ERR_IO, message: format!("creating data directory: {e}") })?;
        let contents = serde_json::to_string_pretty(users)
            .map_err(|e| StoreError { code: ERR_IO, message: format!("encoding users.json: {e}") })?;
        fs::write(self.users_path(), contents)
            .map_err(|e| StoreError { code: ERR_IO, message: format!("writing users.json: {e}") })
    }

    /// Create an account. Does not log the user in.
    pub fn register(&self, username: &str, password: &str) -> Result<(), StoreError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(StoreError {
                code: ERR_EMPTY_CREDENTIALS,
                message: "username and password are required".to_string(),
            });
        }
        let mut users = self.load_users()?;
        if users.iter().any(|u| u.username == username) {
            return Err(StoreError {
                code: ERR_USERNAME_TAKEN,
                message: format!("username '{username}' is taken"),
            });
        }
        let salt = format!("{:016x}", fnv1a(format!("{username}:{}", Utc::now().timestamp_nanos_opt().unwrap_or_default()).as_bytes()));
        users.push(UserRecord {
            username: username.to_string(),
            digest: digest(&salt, password),
            salt,
            created_at: Utc::now(),
        });
        self.save_users(&users)
    }

    /// Verify credentials and start an on-disk session.
    pub fn login(&self, username: &str, password: &str) -> Result<String, StoreError> {
        let users = self.load_users()?;
        let valid = users
            .iter()
            .find(|u| u.username == username)
            .map(|u| u.digest == digest(&u.salt, password))
            .unwrap_or(false);
        if !valid {
            return Err(StoreError {
                code: ERR_INVALID_LOGIN,
                message: "invalid username or password".to_string(),
            });
        }
        let session = SessionRecord { username: username.to_string(), started_at: Utc::now() };
        let contents = serde_json::to_string_pretty(&session)
            .map_err(|e| StoreError { code: ERR_IO, message: format!("encoding session: {e}") })?;
        fs::write(self.session_path(), contents)
            .map_err(|e| StoreError { code: ERR_IO, message: format!("writing session: {e}") })?;
        Ok(session.username)
    }

    /// Username of the persisted session, if one exists.
    pub fn current(&self) -> Option<String> {
        let contents = fs::read_to_string(self.session_path()).ok()?;
        let session: SessionRecord = serde_json::from_str(&contents).ok()?;
        Some(session.username)
    }

    pub fn logout(&self) {
        let _ = fs::remove_file(self.session_path());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_manager(tag: &str) -> SessionManager {
        let root = std::env::temp_dir().join(format!("anno-session-test-{}-{tag}", std::process::id()));
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(&root).unwrap();
        SessionManager::new(root)
    }

    #[test]
    fn test_register_then_login_round_trip() {
        let sessions = temp_manager("roundtrip");
        sessions.register("alice", "hunter2").unwrap();
        assert_eq!(sessions.login("alice", "hunter2").unwrap(), "alice");
        assert_eq!(sessions.current(), Some("alice".to_string()));
    }

    #[test]
    fn test_wrong_password_is_rejected() {
        let sessions = temp_manager("wrongpw");
        sessions.register("alice", "hunter2").unwrap();
        let err = sessions.login("alice", "letmein").unwrap_err();
        assert_eq!(err.code, ERR_INVALID_LOGIN);
        assert_eq!(sessions.current(), None);
    }

    #[test]
    fn test_unknown_user_is_rejected_like_wrong_password() {
        let sessions = temp_manager("unknown");
        let err = sessions.login("nobody", "x").unwrap_err();
        assert_eq!(err.code, ERR_INVALID_LOGIN);
    }

    #[test]
    fn test_duplicate_username_is_rejected() {
        let sessions = temp_manager("dup");
        sessions.register("alice", "a").unwrap();
        let err = sessions.register("alice", "b").unwrap_err();
        assert_eq!(err.code, ERR_USERNAME_TAKEN);
    }

    #[test]
    fn test_empty_credentials_are_rejected() {
        let sessions = temp_manager("empty");
        assert_eq!(sessions.register("", "pw").unwrap_err().code, ERR_EMPTY_CREDENTIALS);
        assert_eq!(sessions.register("bob", "").unwrap_err().code, ERR_EMPTY_CREDENTIALS);
    }

    #[test]
    fn test_logout_clears_the_session() {
        let sessions = temp_manager("logout");
        sessions.register("alice", "pw").unwrap();
        sessions.login("alice", "pw").unwrap();
        sessions.logout();
        assert_eq!(sessions.current(), None);
    }
}
