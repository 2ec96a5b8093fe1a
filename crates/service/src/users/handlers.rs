use tracing::{info, instrument};

use models::user::{validate_email, validate_name, validate_phone};

use super::commands::{CreateUserCommand, DeleteUserCommand, GetUserQuery, ListUsersQuery, UpdateUserCommand};
use crate::domain::User;
use crate::errors::ServiceError;
use crate::repository::UserRepository;

/// Trim, validate and canonicalise user fields. Emails are stored lower-cased.
fn validated_user(first_name: &str, last_name: &str, email: &str, phone_number: &str) -> Result<User, ServiceError> {
    let (first_name, last_name, phone_number) = (first_name.trim(), last_name.trim(), phone_number.trim());
    let email = email.trim().to_lowercase();
    validate_name("first_name", first_name)?;
    validate_name("last_name", last_name)?;
    validate_email(&email)?;
    validate_phone(phone_number)?;
    Ok(User::new(first_name, last_name, email, phone_number))
}

/// Validates and persists a new user, returning its id.
///
/// # Examples
/// ```
/// use service::domain::User;
/// use service::repository::memory::InMemoryRepository;
/// use service::users::{CreateUserCommand, CreateUserHandler};
/// let repo = InMemoryRepository::<User>::new();
/// let cmd = CreateUserCommand {
///     first_name: "Amina".into(),
///     last_name: "Yusuf".into(),
///     email: "Amina@Example.com".into(),
///     phone_number: "+249912345678".into(),
/// };
/// let id = tokio_test::block_on(CreateUserHandler::new(&repo).handle(cmd)).unwrap();
/// assert!(id > 0);
/// ```
pub struct CreateUserHandler<'r, R: ?Sized> {
    repo: &'r R,
}

impl<'r, R: UserRepository + ?Sized> CreateUserHandler<'r, R> {
    pub fn new(repo: &'r R) -> Self {
        Self { repo }
    }

    #[instrument(skip(self, cmd), fields(email = %cmd.email))]
    pub async fn handle(&self, cmd: CreateUserCommand) -> Result<i32, ServiceError> {
        let user = validated_user(&cmd.first_name, &cmd.last_name, &cmd.email, &cmd.phone_number)?;
        if self.repo.find_by_email(user.email()).await?.is_some() {
            return Err(ServiceError::Conflict(format!("email {} already registered", user.email())));
        }
        let stored = self.repo.add(user).await?;
        info!(user_id = stored.id(), "user_created");
        Ok(stored.id())
    }
}

pub struct UpdateUserHandler<'r, R: ?Sized> {
    repo: &'r R,
}

impl<'r, R: UserRepository + ?Sized> UpdateUserHandler<'r, R> {
    pub fn new(repo: &'r R) -> Self {
        Self { repo }
    }

    #[instrument(skip(self, cmd), fields(user_id = cmd.id))]
    pub async fn handle(&self, cmd: UpdateUserCommand) -> Result<User, ServiceError> {
        let fields = validated_user(&cmd.first_name, &cmd.last_name, &cmd.email, &cmd.phone_number)?;
        let mut user = self.repo.get_by_id(cmd.id).await?;
        if let Some(other) = self.repo.find_by_email(fields.email()).await? {
            if other.id() != user.id() {
                return Err(ServiceError::Conflict(format!("email {} already registered", fields.email())));
            }
        }
        user.set_first_name(fields.first_name());
        user.set_last_name(fields.last_name());
        user.set_email(fields.email());
        user.set_phone_number(fields.phone_number());
        let updated = self.repo.update(user).await?;
        info!("user_updated");
        Ok(updated)
    }
}

pub struct DeleteUserHandler<'r, R: ?Sized> {
    repo: &'r R,
}

impl<'r, R: UserRepository + ?Sized> DeleteUserHandler<'r, R> {
    pub fn new(repo: &'r R) -> Self {
        Self { repo }
    }

    #[instrument(skip(self))]
    pub async fn handle(&self, cmd: DeleteUserCommand) -> Result<(), ServiceError> {
        self.repo.delete(cmd.id).await?;
        info!(user_id = cmd.id, "user_deleted");
        Ok(())
    }
}

pub struct GetUserHandler<'r, R: ?Sized> {
    repo: &'r R,
}

impl<'r, R: UserRepository + ?Sized> GetUserHandler<'r, R> {
    pub fn new(repo: &'r R) -> Self {
        Self { repo }
    }

    pub async fn handle(&self, query: GetUserQuery) -> Result<User, ServiceError> {
        self.repo.get_by_id(query.id).await
    }
}

pub struct ListUsersHandler<'r, R: ?Sized> {
    repo: &'r R,
}

impl<'r, R: UserRepository + ?Sized> ListUsersHandler<'r, R> {
    pub fn new(repo: &'r R) -> Self {
        Self { repo }
    }

    pub async fn handle(&self, query: ListUsersQuery) -> Result<Vec<User>, ServiceError> {
        self.repo.get_page(query.pagination).await
    }
}
