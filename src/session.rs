//! Demo sign-in and the persisted session.
//!
//! There is no real authentication: one hard-coded account is accepted and the
//! tokens it returns are only checked for shape by the post store.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;

pub const DEMO_EMAIL: &str = "admin@example.com";
pub const DEMO_PASSWORD: &str = "password123";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

pub fn mock_login(email: &str, password: &str) -> Result<Credentials, Error> {
    if email != DEMO_EMAIL || password != DEMO_PASSWORD {
        log::warn!("Rejected login for {email}");
        return Err(Error::InvalidCredentials);
    }
    let stamp = chrono::Utc::now().timestamp_millis();
    Ok(Credentials {
        access_token: format!("mock-access-token-{stamp}"),
        refresh_token: format!("mock-refresh-token-{stamp}"),
        user: User {
            id: 1,
            name: "John Developer".to_string(),
            email: DEMO_EMAIL.to_string(),
            avatar: Some("/developer-avatar.png".to_string()),
        },
    })
}

/// Who is signed in, if anyone. Built once at startup and passed by reference.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Session {
    credentials: Option<Credentials>,
}

impl Session {
    pub fn new(credentials: Credentials) -> Self {
        Session {
            credentials: Some(credentials),
        }
    }

    /// Read the session file. A missing file is an empty session.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let data = match std::fs::read(path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Session::default()),
            Err(e) => return Err(Error::Io(e)),
        };
        let credentials: Credentials = serde_json::from_slice(&data)?;
        Ok(Session {
            credentials: Some(credentials),
        })
    }

    /// Write the session file; an empty session removes it.
    pub fn store(&self, path: &Path) -> Result<(), Error> {
        match &self.credentials {
            Some(credentials) => {
                std::fs::write(path, serde_json::to_vec_pretty(credentials)?)?;
                Ok(())
            }
            None => Session::clear(path).map(|_| ()),
        }
    }

    /// Forget the stored session and return the empty one.
    pub fn clear(path: &Path) -> Result<Self, Error> {
        match std::fs::remove_file(path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(Error::Io(e)),
        }
        Ok(Session::default())
    }

    pub fn is_present(&self) -> bool {
        self.credentials
            .as_ref()
            .is_some_and(|c| !c.access_token.is_empty())
    }

    pub fn user(&self) -> Option<&User> {
        self.credentials.as_ref().map(|c| &c.user)
    }

    /// Value for an `Authorization` header.
    pub fn authorization(&self) -> Option<String> {
        self.credentials
            .as_ref()
            .filter(|c| !c.access_token.is_empty())
            .map(|c| format!("Bearer {}", c.access_token))
    }
}
