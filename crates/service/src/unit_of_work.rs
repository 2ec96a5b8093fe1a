//! Groups repository writes into one database transaction.

use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use tracing::{debug, warn};

use crate::domain::{Entity, User};
use crate::errors::ServiceError;
use crate::repo::SeaOrmRepository;

/// Repositories handed out by a unit of work share its transaction. Nothing
/// is visible to other connections until [`UnitOfWork::commit`]; dropping the
/// unit without committing rolls back.
pub struct UnitOfWork {
    txn: DatabaseTransaction,
}

impl UnitOfWork {
    pub async fn begin(db: &DatabaseConnection) -> Result<Self, ServiceError> {
        let txn = db.begin().await.map_err(|e| ServiceError::Db(e.to_string()))?;
        debug!("unit of work started");
        Ok(Self { txn })
    }

    pub fn repository<T: Entity>(&self) -> SeaOrmRepository<'_, DatabaseTransaction, T> {
        SeaOrmRepository::new(&self.txn)
    }

    pub fn users(&self) -> SeaOrmRepository<'_, DatabaseTransaction, User> {
        self.repository()
    }

    /// Raw transaction for helpers in `models` that take a `ConnectionTrait`.
    pub fn connection(&self) -> &DatabaseTransaction {
        &self.txn
    }

    pub async fn commit(self) -> Result<(), ServiceError> {
        self.txn.commit().await.map_err(|e| ServiceError::Db(e.to_string()))?;
        debug!("unit of work committed");
        Ok(())
    }

    pub async fn rollback(self) -> Result<(), ServiceError> {
        self.txn.rollback().await.map_err(|e| ServiceError::Db(e.to_string()))
    }

    /// Commit on `Ok`, roll back on `Err`; the handler's error wins over a
    /// rollback failure.
    pub async fn finish<T>(self, result: Result<T, ServiceError>) -> Result<T, ServiceError> {
        match result {
            Ok(value) => {
                self.commit().await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback) = self.rollback().await {
                    warn!(error = %rollback, "rollback failed");
                }
                Err(err)
            }
        }
    }
}
