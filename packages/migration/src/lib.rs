pub use sea_orm_migration::prelude::*;
pub use sea_orm_migration::sea_orm;
pub use sea_orm_migration::sea_orm::DatabaseConnection;

mod m20260901_000001_users; // keep filename + module name in sync

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20260901_000001_users::Migration)]
    }
}

#[derive(Debug, Clone, Copy)]
pub enum MigrationCommand {
    Up,
    Down,
    Fresh,
    Status,
}

/// Run `command` against an already-open connection.
pub async fn migrate(db: &DatabaseConnection, command: MigrationCommand) -> Result<(), DbErr> {
    let defined = Migrator::migrations().len();
    let applied_before = count_applied_migrations(db).await?;
    tracing::info!("▶ cmd={command:?} defined={defined} applied={applied_before}");

    let result = match command {
        MigrationCommand::Up => Migrator::up(db, None).await,
        MigrationCommand::Down => Migrator::down(db, None).await,
        MigrationCommand::Fresh => Migrator::fresh(db).await,
        MigrationCommand::Status => Migrator::status(db).await,
    };

    match result {
        Ok(()) => {
            if !matches!(command, MigrationCommand::Status) {
                let applied_after = count_applied_migrations(db).await?;
                tracing::info!("▶ AFTER: applied={applied_after}");
            }
            tracing::info!("✅ {command:?} OK");
            Ok(())
        }
        Err(e) => {
            tracing::error!("❌ {command:?} failed: {e}");
            Err(e)
        }
    }
}

/// Number of applied migrations; 0 if the migration table doesn't exist yet.
pub async fn count_applied_migrations(db: &DatabaseConnection) -> Result<usize, DbErr> {
    match Migrator::get_applied_migrations(db).await {
        Ok(migrations) => Ok(migrations.len()),
        Err(DbErr::Exec(_)) => Ok(0),
        Err(e) => Err(e),
    }
}
