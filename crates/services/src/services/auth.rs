use std::{
    fs,
    io::{self, ErrorKind},
    path::PathBuf,
    sync::{Arc, Mutex},
    time::Duration,
};

use models::auth::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::{debug, info};

use super::api_client::{ApiClient, ApiError};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("token store error: {0}")]
    Store(#[from] io::Error),
    #[error("not logged in, run `aquaconsole login` first")]
    NotAuthenticated,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("server returned an empty token")]
    EmptyToken,
}

/// Where the session token lives between invocations.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> io::Result<Option<SecretString>>;
    fn save(&self, token: &SecretString) -> io::Result<()>;
    fn clear(&self) -> io::Result<()>;
}

/// Token kept in a single file inside the config directory.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> io::Result<Option<SecretString>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => {
                let token = raw.trim();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(SecretString::from(token.to_string())))
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn save(&self, token: &SecretString) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token.expose_secret())?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    fn slot(&self) -> io::Result<std::sync::MutexGuard<'_, Option<String>>> {
        self.token
            .lock()
            .map_err(|_| io::Error::other("token store lock poisoned"))
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> io::Result<Option<SecretString>> {
        Ok(self.slot()?.clone().map(SecretString::from))
    }

    fn save(&self, token: &SecretString) -> io::Result<()> {
        *self.slot()? = Some(token.expose_secret().to_string());
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        *self.slot()? = None;
        Ok(())
    }
}

/// Login, registration and the route guard for every other command.
#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
    store: Arc<dyn TokenStore>,
}

impl AuthService {
    pub fn new(client: ApiClient, store: Arc<dyn TokenStore>) -> Self {
        Self { client, store }
    }

    pub async fn login(&self, email: &str, password: &SecretString) -> Result<(), AuthError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.expose_secret().to_string(),
        };
        let res: LoginResponse = match self.client.post("/api/auth/login", &body).await {
            Err(ApiError::Unauthorized(_)) => return Err(AuthError::InvalidCredentials),
            other => other?,
        };
        if res.token.trim().is_empty() {
            return Err(AuthError::EmptyToken);
        }
        self.store.save(&SecretString::from(res.token))?;
        info!(email, "Logged in");
        Ok(())
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &SecretString,
    ) -> Result<RegisterResponse, AuthError> {
        let body = RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.expose_secret().to_string(),
        };
        let res = self.client.post("/api/auth/register", &body).await?;
        info!(email, "Registered account");
        Ok(res)
    }

    pub fn logout(&self) -> Result<(), AuthError> {
        self.store.clear()?;
        debug!("Cleared stored session token");
        Ok(())
    }

    pub fn is_logged_in(&self) -> Result<bool, AuthError> {
        Ok(self.store.load()?.is_some())
    }

    /// Client carrying the stored token, or `NotAuthenticated` when there is
    /// no session.
    pub fn session(&self) -> Result<ApiClient, AuthError> {
        let token = self.store.load()?.ok_or(AuthError::NotAuthenticated)?;
        Ok(self.client.clone().with_token(token))
    }
}

/// Build an unauthenticated client plus auth service from connection
/// settings.
pub fn connect(
    base_url: &str,
    timeout: Duration,
    store: Arc<dyn TokenStore>,
) -> Result<AuthService, AuthError> {
    let client = ApiClient::new(base_url, timeout)?;
    Ok(AuthService::new(client, store))
}
