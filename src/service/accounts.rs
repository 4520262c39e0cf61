use crate::db::{AccountStorage, Profile};
use crate::error::ApiError;
use crate::service::password::{hash_password_blocking, verify_password_blocking};
use crate::service::validation::validate_registration;
use chrono::Utc;
use tracing::{error, info, warn};

/// Account operations over an injected storage handle.
#[derive(Clone)]
pub struct AccountService {
    storage: AccountStorage,
}

impl AccountService {
    pub fn new(storage: AccountStorage) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &AccountStorage {
        &self.storage
    }

    /// Create the credential and profile atomically and return the new profile.
    pub async fn register(
        &self,
        email: &str,
        name: &str,
        password: &str,
    ) -> Result<Profile, ApiError> {
        validate_registration(email, name, password)?;

        let hash = hash_password_blocking(password.to_string()).await?;
        let profile = self
            .storage
            .create_account(email, name, &hash, Utc::now())
            .await
            .inspect_err(|e| warn!(error = %e, "registration failed"))?;

        info!(id = profile.id, "registered new account");
        Ok(profile)
    }

    /// Unknown email and wrong password both yield `WrongCredentials`.
    /// Every other failure after that point is `UnableToGetUser`; all are 400s.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Profile, ApiError> {
        if email.is_empty() || password.is_empty() {
            return Err(ApiError::IncorrectForm);
        }

        let login = self.storage.find_login(email).await.map_err(|e| {
            error!(error = %e, "credential lookup failed");
            ApiError::WrongCredentials
        })?;
        let Some(login) = login else {
            warn!("sign-in rejected");
            return Err(ApiError::WrongCredentials);
        };

        let matches = verify_password_blocking(password.to_string(), login.hash)
            .await
            .map_err(|e| {
                error!(error = %e, "stored credential could not be verified");
                ApiError::WrongCredentials
            })?;
        if !matches {
            warn!("sign-in rejected");
            return Err(ApiError::WrongCredentials);
        }

        let profile = match self.storage.find_profile_by_email(&login.email).await {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                error!("credential has no matching profile");
                return Err(ApiError::UnableToGetUser);
            }
            Err(e) => {
                error!(error = %e, "profile lookup failed");
                return Err(ApiError::UnableToGetUser);
            }
        };
        info!(id = profile.id, "signed in");
        Ok(profile)
    }

    pub async fn profile(&self, id: i64) -> Result<Profile, ApiError> {
        self.storage
            .find_profile_by_id(id)
            .await?
            .ok_or(ApiError::UserNotFound)
    }

    /// Bump the profile's entry count by one and return the new value.
    pub async fn increment_entries(&self, id: i64) -> Result<i64, ApiError> {
        self.storage
            .increment_entries(id)
            .await?
            .ok_or(ApiError::UserNotFound)
    }
}
