//! Request dispatch. Each command type has exactly one [`Handler`] impl on
//! [`Mediator`], so routing is resolved at compile time.

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use tracing::{debug, instrument};

use common::metrics::record_command;

use crate::domain::User;
use crate::errors::ServiceError;
use crate::repo::SeaOrmRepository;
use crate::unit_of_work::UnitOfWork;
use crate::users::{
    CreateUserCommand, CreateUserHandler, DeleteUserCommand, DeleteUserHandler, GetUserHandler, GetUserQuery,
    ListUsersHandler, ListUsersQuery, UpdateUserCommand, UpdateUserHandler,
};

/// A request the mediator knows how to route.
pub trait Command: Send + 'static {
    type Output: Send;
    /// Label used for logs and the commands counter.
    const NAME: &'static str;
}

#[async_trait]
pub trait Handler<C: Command>: Send + Sync {
    async fn handle(&self, cmd: C) -> Result<C::Output, ServiceError>;
}

/// Writes run inside a [`UnitOfWork`]; reads go straight to the pool.
#[derive(Clone)]
pub struct Mediator {
    db: DatabaseConnection,
}

impl Mediator {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    #[instrument(skip_all, fields(command = C::NAME))]
    pub async fn send<C>(&self, cmd: C) -> Result<C::Output, ServiceError>
    where
        C: Command,
        Self: Handler<C>,
    {
        let result = Handler::<C>::handle(self, cmd).await;
        record_command(C::NAME, result.is_ok());
        if let Err(e) = &result {
            debug!(error = %e, "command failed");
        }
        result
    }

    fn users(&self) -> SeaOrmRepository<'_, DatabaseConnection, User> {
        SeaOrmRepository::new(&self.db)
    }
}

#[async_trait]
impl Handler<CreateUserCommand> for Mediator {
    async fn handle(&self, cmd: CreateUserCommand) -> Result<i32, ServiceError> {
        let uow = UnitOfWork::begin(&self.db).await?;
        let users = uow.users();
        let result = CreateUserHandler::new(&users).handle(cmd).await;
        uow.finish(result).await
    }
}

#[async_trait]
impl Handler<UpdateUserCommand> for Mediator {
    async fn handle(&self, cmd: UpdateUserCommand) -> Result<User, ServiceError> {
        let uow = UnitOfWork::begin(&self.db).await?;
        let users = uow.users();
        let result = UpdateUserHandler::new(&users).handle(cmd).await;
        uow.finish(result).await
    }
}

#[async_trait]
impl Handler<DeleteUserCommand> for Mediator {
    async fn handle(&self, cmd: DeleteUserCommand) -> Result<(), ServiceError> {
        let uow = UnitOfWork::begin(&self.db).await?;
        let users = uow.users();
        let result = DeleteUserHandler::new(&users).handle(cmd).await;
        uow.finish(result).await
    }
}

#[async_trait]
impl Handler<GetUserQuery> for Mediator {
    async fn handle(&self, query: GetUserQuery) -> Result<User, ServiceError> {
        GetUserHandler::new(&self.users()).handle(query).await
    }
}

#[async_trait]
impl Handler<ListUsersQuery> for Mediator {
    async fn handle(&self, query: ListUsersQuery) -> Result<Vec<User>, ServiceError> {
        ListUsersHandler::new(&self.users()).handle(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::Pagination;
    use crate::test_support::get_db;

    fn cmd(email: &str) -> CreateUserCommand {
        CreateUserCommand {
            first_name: "Amina".into(),
            last_name: "Yusuf".into(),
            email: email.into(),
            phone_number: "0912345678".into(),
        }
    }

    #[tokio::test]
    async fn create_then_query_through_the_mediator() -> anyhow::Result<()> {
        let mediator = Mediator::new(get_db().await?);
        let id = mediator.send(cmd("amina@example.com")).await?;
        assert!(id > 0);

        let user = mediator.send(GetUserQuery { id }).await?;
        assert_eq!(user.email(), "amina@example.com");

        let listed = mediator.send(ListUsersQuery { pagination: Pagination::default() }).await?;
        assert_eq!(listed, vec![user]);
        Ok(())
    }

    #[tokio::test]
    async fn failed_commands_do_not_persist() -> anyhow::Result<()> {
        let mediator = Mediator::new(get_db().await?);
        mediator.send(cmd("taken@example.com")).await?;
        let err = mediator.send(cmd("taken@example.com")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        let listed = mediator.send(ListUsersQuery::default()).await?;
        assert_eq!(listed.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn update_and_delete_round_trip() -> anyhow::Result<()> {
        let mediator = Mediator::new(get_db().await?);
        let id = mediator.send(cmd("a@example.com")).await?;
        let mut fields = cmd("a@example.com");
        fields.phone_number = "+249 100 200 300".into();
        let updated = mediator.send(UpdateUserCommand::new(id, fields)).await?;
        assert_eq!(updated.phone_number(), "+249 100 200 300");

        mediator.send(DeleteUserCommand { id }).await?;
        let err = mediator.send(GetUserQuery { id }).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        let err = mediator.send(DeleteUserCommand { id }).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        Ok(())
    }
}
