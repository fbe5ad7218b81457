//! User Application Service
//!
//! The single source of truth for "does user X exist". Orchestrates the
//! record store through the repository port; contains no transport logic.

use platform_types::{
    AppError, CreateUserRequest, NewUser, RepoError, UpdateUserRequest, UserId,
    UserRepository, UserResponse, validate_email, validate_username,
};

use crate::password::hash_password;

/// Application service for user operations.
///
/// Generic over `R: UserRepository` - the adapter is injected at compile time.
///
/// Uniqueness of username and email is checked here with a lookup before the
/// insert. The check and the insert are separate store operations, so two
/// concurrent creates with the same email can both succeed.
pub struct UserService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> UserService<R> {
    /// Creates a new user service with the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Returns a reference to the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Creates a new user.
    pub async fn create_user(&self, req: CreateUserRequest) -> Result<UserResponse, AppError> {
        validate_username(&req.username)?;
        validate_email(&req.email)?;
        if req.password.is_empty() {
            return Err(AppError::BadRequest("Password cannot be empty".into()));
        }

        if self.repo.find_user_by_email(&req.email).await?.is_some() {
            return Err(AppError::Duplicate(
                "user with this email already exists".into(),
            ));
        }
        if self
            .repo
            .find_user_by_username(&req.username)
            .await?
            .is_some()
        {
            return Err(AppError::Duplicate(
                "user with this username already exists".into(),
            ));
        }

        let password_hash = hash_password(req.password)
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        let user = NewUser::new(req.username, req.email, password_hash)?;
        let user = self.repo.create_user(user).await?;

        tracing::info!(user_id = %user.id, "User created");
        Ok(user.into())
    }

    /// Gets a user by ID.
    pub async fn get_user(&self, id: UserId) -> Result<UserResponse, AppError> {
        self.repo
            .get_user(id)
            .await?
            .map(UserResponse::from)
            .ok_or_else(|| user_not_found(id))
    }

    /// Gets a user by exact (case-sensitive) email.
    pub async fn get_user_by_email(&self, email: &str) -> Result<UserResponse, AppError> {
        self.repo
            .find_user_by_email(email)
            .await?
            .map(UserResponse::from)
            .ok_or_else(|| AppError::NotFound("user not found".into()))
    }

    /// Lists all users.
    pub async fn list_users(&self) -> Result<Vec<UserResponse>, AppError> {
        let users = self.repo.list_users().await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    /// Applies a partial update. Only present, non-empty fields overwrite.
    ///
    /// Uniqueness is not re-checked, so an update can introduce a duplicate
    /// email or username.
    pub async fn update_user(
        &self,
        id: UserId,
        req: UpdateUserRequest,
    ) -> Result<UserResponse, AppError> {
        let mut user = self
            .repo
            .get_user(id)
            .await?
            .ok_or_else(|| user_not_found(id))?;

        if let Some(username) = req.username.filter(|u| !u.is_empty()) {
            user.username = username;
        }
        if let Some(email) = req.email.filter(|e| !e.is_empty()) {
            user.email = email;
        }

        let user = self
            .repo
            .update_user(user)
            .await
            .map_err(|e| not_found_or(e, id))?;

        tracing::info!(user_id = %id, "User updated");
        Ok(user.into())
    }

    /// Soft deletes a user.
    ///
    /// Existence is checked first, then the delete is issued: two round trips
    /// with no transaction around them.
    pub async fn delete_user(&self, id: UserId) -> Result<(), AppError> {
        if self.repo.get_user(id).await?.is_none() {
            return Err(user_not_found(id));
        }

        self.repo
            .soft_delete_user(id)
            .await
            .map_err(|e| not_found_or(e, id))?;

        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }
}

fn user_not_found(id: UserId) -> AppError {
    AppError::NotFound(format!("User {} not found", id))
}

fn not_found_or(err: RepoError, id: UserId) -> AppError {
    match err {
        RepoError::NotFound => user_not_found(id),
        e => e.into(),
    }
}
