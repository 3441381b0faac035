use std::sync::Arc;

use chrono::Utc;
use query_core::{
    parse_filters, FieldRegistry, OperatorRegistry, QueryOptions, QueryParams, SortSpecification,
};
use tracing::{debug, error, info, instrument};

use crate::contract::model::{NewUser, User, UserPatch};
use crate::domain::error::DomainError;
use crate::domain::repo::{RepoError, UsersRepository};

/// Domain service with business rules for user management.
/// Depends only on the repository port, not on infra types.
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn UsersRepository>,
    fields: FieldRegistry,
    operators: OperatorRegistry,
    config: ServiceConfig,
}

/// Configuration for the domain service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub min_username_length: usize,
    pub max_username_length: usize,
    pub max_name_length: usize,
    pub max_filter_atoms: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            min_username_length: 3,
            max_username_length: 64,
            max_name_length: 100,
            max_filter_atoms: 64,
        }
    }
}

impl Service {
    pub fn new(repo: Arc<dyn UsersRepository>, fields: FieldRegistry, config: ServiceConfig) -> Self {
        Self {
            repo,
            fields,
            operators: OperatorRegistry::standard(),
            config,
        }
    }

    #[instrument(name = "users.service.get_user", skip(self), fields(user_id = id))]
    pub async fn get_user(&self, id: i64) -> Result<User, DomainError> {
        debug!("Getting user by id");

        let user = self
            .repo
            .find_by_id(id)
            .await
            .map_err(|e| database_error("find_by_id", e))?
            .ok_or_else(|| DomainError::user_not_found(id))?;
        debug!("Successfully retrieved user");
        Ok(user)
    }

    #[instrument(name = "users.service.get_user_by_username", skip(self))]
    pub async fn get_user_by_username(&self, username: &str) -> Result<User, DomainError> {
        debug!("Getting user by username");

        self.repo
            .find_by_username(username)
            .await
            .map_err(|e| database_error("find_by_username", e))?
            .ok_or_else(|| DomainError::username_not_found(username))
    }

    #[instrument(
        name = "users.service.list_users",
        skip(self, params),
        fields(sort = %sort.field, order = %sort.order.as_str())
    )]
    pub async fn list_users(
        &self,
        params: &QueryParams,
        sort: SortSpecification,
    ) -> Result<Vec<User>, DomainError> {
        let filters = parse_filters(params, &self.fields, &self.operators);
        filters
            .ensure_within(self.config.max_filter_atoms)
            .map_err(|e| DomainError::invalid_query(e.to_string()))?;
        debug!(atoms = filters.atom_count(), "Parsed user filters");

        let users = self
            .repo
            .find_with_options(&QueryOptions::new(sort, filters))
            .await
            .map_err(|e| match e {
                RepoError::Query(e) => DomainError::invalid_query(e.to_string()),
                RepoError::Db(e) => database_error("find_with_options", e),
            })?;

        debug!(count = users.len(), "Listed users");
        Ok(users)
    }

    #[instrument(
        name = "users.service.create_user",
        skip(self, new_user),
        fields(username = %new_user.username, email = %new_user.email)
    )]
    pub async fn create_user(&self, new_user: NewUser) -> Result<User, DomainError> {
        info!("Creating new user");

        self.validate_new_user(&new_user)?;

        if self
            .repo
            .find_by_username(&new_user.username)
            .await
            .map_err(|e| database_error("find_by_username", e))?
            .is_some()
        {
            return Err(DomainError::username_taken(new_user.username));
        }
        self.ensure_email_free(&new_user.email).await?;

        let user = self
            .repo
            .create(new_user, Utc::now())
            .await
            .map_err(|e| database_error("create", e))?;

        info!(user_id = user.id, "Successfully created user");
        Ok(user)
    }

    /// Users may only change their own record; anything else reads as missing.
    #[instrument(name = "users.service.update_user", skip(self, patch), fields(user_id = id))]
    pub async fn update_user(
        &self,
        caller: i64,
        id: i64,
        patch: UserPatch,
    ) -> Result<User, DomainError> {
        info!("Updating user");

        if caller != id {
            debug!("Caller is not the target user");
            return Err(DomainError::user_not_found(id));
        }

        self.validate_user_patch(&patch)?;

        let mut current = self
            .repo
            .find_by_id(id)
            .await
            .map_err(|e| database_error("find_by_id", e))?
            .ok_or_else(|| DomainError::user_not_found(id))?;

        if let Some(ref new_email) = patch.email {
            if new_email != &current.email {
                self.ensure_email_free(new_email).await?;
            }
        }

        if let Some(email) = patch.email {
            current.email = email;
        }
        if let Some(given_name) = patch.given_name {
            current.given_name = given_name;
        }
        if let Some(family_name) = patch.family_name {
            current.family_name = family_name;
        }
        current.updated_at = Utc::now();

        let updated = self
            .repo
            .update(&current, caller)
            .await
            .map_err(|e| database_error("update", e))?;
        if !updated {
            return Err(DomainError::user_not_found(id));
        }

        info!("Successfully updated user");
        Ok(current)
    }

    #[instrument(name = "users.service.delete_user", skip(self), fields(user_id = id))]
    pub async fn delete_user(&self, caller: i64, id: i64) -> Result<(), DomainError> {
        info!("Deleting user");

        let deleted = self
            .repo
            .delete(id, caller)
            .await
            .map_err(|e| database_error("delete", e))?;

        if !deleted {
            return Err(DomainError::user_not_found(id));
        }

        info!("Successfully deleted user");
        Ok(())
    }

    async fn ensure_email_free(&self, email: &str) -> Result<(), DomainError> {
        let taken = self
            .repo
            .find_by_email(email)
            .await
            .map_err(|e| database_error("find_by_email", e))?
            .is_some();
        if taken {
            return Err(DomainError::email_already_exists(email));
        }
        Ok(())
    }

    fn validate_new_user(&self, new_user: &NewUser) -> Result<(), DomainError> {
        self.validate_username(&new_user.username)?;
        Self::validate_email(&new_user.email)?;
        self.validate_name("given_name", &new_user.given_name)?;
        self.validate_name("family_name", &new_user.family_name)?;
        Ok(())
    }

    fn validate_user_patch(&self, patch: &UserPatch) -> Result<(), DomainError> {
        if let Some(ref email) = patch.email {
            Self::validate_email(email)?;
        }
        if let Some(ref given_name) = patch.given_name {
            self.validate_name("given_name", given_name)?;
        }
        if let Some(ref family_name) = patch.family_name {
            self.validate_name("family_name", family_name)?;
        }
        Ok(())
    }

    fn validate_username(&self, username: &str) -> Result<(), DomainError> {
        let len = username.chars().count();
        if len < self.config.min_username_length || len > self.config.max_username_length {
            return Err(DomainError::validation(
                "username",
                format!(
                    "length must be between {} and {}",
                    self.config.min_username_length, self.config.max_username_length
                ),
            ));
        }
        if !username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        {
            return Err(DomainError::validation(
                "username",
                "only letters, digits, '_', '-' and '.' are allowed",
            ));
        }
        Ok(())
    }

    fn validate_name(&self, field: &str, value: &str) -> Result<(), DomainError> {
        let len = value.chars().count();
        if len > self.config.max_name_length {
            return Err(DomainError::validation(
                field,
                format!(
                    "too long: {} characters (max: {})",
                    len, self.config.max_name_length
                ),
            ));
        }
        Ok(())
    }

    fn validate_email(email: &str) -> Result<(), DomainError> {
        let valid = match email.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.contains('@')
                    && domain.contains('.')
                    && !domain.starts_with('.')
                    && !domain.ends_with('.')
                    && !email.chars().any(char::is_whitespace)
            }
            None => false,
        };
        if !valid {
            return Err(DomainError::invalid_email(email));
        }
        Ok(())
    }
}

fn database_error(op: &str, e: anyhow::Error) -> DomainError {
    error!(operation = op, error = ?e, "users repository failure");
    DomainError::database(e.to_string())
}
