use chrono::Utc;
use tracing::{debug, error};
use uuid::Uuid;

use crate::error::{Result, ServiceError};
use crate::storage::{CredentialRepository, ProfileRepository, RepositoryError};

use super::types::{Credential, Profile, Role, SignupRequest};
use super::validation::{validate_email, validate_password};

/// Function producing the stored hash of a raw password. Hashing itself is
/// an external capability; the service only decides what gets persisted.
type PasswordHasher = Box<dyn Fn(&str) -> String + Send + Sync>;

/// Orchestrates signup across the credential and profile tables.
///
/// Credential insertion and the email uniqueness claim commit in one atomic
/// transaction; the profile row is a separate write, paired with a
/// compensating credential delete when it fails. That second step is the
/// one consistency window this flow knowingly accepts.
pub struct OnboardingService<C, P> {
    credentials: C,
    profiles: P,
    hash_password: PasswordHasher,
}

impl<C, P> OnboardingService<C, P>
where
    C: CredentialRepository,
    P: ProfileRepository,
{
    pub fn new(
        credentials: C,
        profiles: P,
        hash_password: impl Fn(&str) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            credentials,
            profiles,
            hash_password: Box::new(hash_password),
        }
    }

    /// Registers a new user with the given role.
    ///
    /// Validation failures and duplicate emails surface as
    /// [`ServiceError::Validation`] before or instead of any write; a signup
    /// losing the uniqueness race at commit time gets the same validation
    /// error as one caught by the fast-path read.
    pub async fn signup(&self, request: &SignupRequest, role: Role) -> Result<Profile> {
        if request.first_name.is_empty()
            || request.last_name.is_empty()
            || request.email.is_empty()
            || request.password.is_empty()
        {
            return Err(ServiceError::Validation(
                "missing required fields".to_string(),
            ));
        }

        if !validate_email(&request.email) {
            return Err(ServiceError::Validation(
                "invalid email address".to_string(),
            ));
        }

        // Fast path for a friendly error; the conditional claim below is
        // what actually guarantees uniqueness under races.
        if self.credentials.get_credential_by_email(&request.email).await?.is_some() {
            return Err(ServiceError::Validation(
                "email address already exists".to_string(),
            ));
        }

        if !validate_password(&request.password) {
            return Err(ServiceError::Validation(
                "password must contain at least 8 characters of which at least one digit, \
                 one lowercase letter, one uppercase letter and one special character"
                    .to_string(),
            ));
        }

        let user_id = Uuid::new_v4();
        let credential = Credential {
            user_id,
            email: request.email.clone(),
            password_hash: (self.hash_password)(&request.password),
        };

        match self.credentials.insert_credential(&credential).await {
            Ok(()) => {}
            Err(
                RepositoryError::UniqueConflict { .. } | RepositoryError::AlreadyExists { .. },
            ) => {
                // A concurrent signup won the race between our fast-path
                // read and the transaction commit.
                return Err(ServiceError::Validation(
                    "email address already exists".to_string(),
                ));
            }
            Err(err) => return Err(err.into()),
        }

        let profile = Profile {
            user_id,
            first_name: request.first_name.clone(),
            last_name: request.last_name.clone(),
            role,
            created_at: Utc::now(),
        };

        if let Err(err) = self.profiles.insert_profile(&profile).await {
            debug!(%user_id, "profile insert failed, rolling back credential insert");
            if let Err(rollback) = self.credentials.delete_credential(user_id).await {
                error!(
                    %user_id,
                    error = %rollback,
                    "failed to delete credential while compensating for a profile insert failure"
                );
            }
            return Err(err.into());
        }

        Ok(profile)
    }

    /// Gets a user's profile.
    pub async fn find_profile(&self, user_id: Uuid) -> Result<Option<Profile>> {
        Ok(self.profiles.get_profile(user_id).await?)
    }
}
