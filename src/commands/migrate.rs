//! Migrate command - apply, revert or rebuild the account schema.

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{Database, MigrationState, SchemaChange};

/// Schema change behind a mutating action, `None` for `status`.
fn schema_change(action: MigrateAction) -> Option<SchemaChange> {
    match action {
        MigrateAction::Up => Some(SchemaChange::Apply),
        MigrateAction::Down => Some(SchemaChange::RevertLast),
        MigrateAction::Fresh => Some(SchemaChange::Rebuild),
        MigrateAction::Status => None,
    }
}

fn status_line(state: &MigrationState) -> String {
    let label = if state.applied { "applied" } else { "pending" };
    format!("{:<8} {}", label, state.name)
}

/// Execute the migrate command
pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    let db = Database::open_unmigrated(&config.database_url).await?;

    let Some(change) = schema_change(args.action) else {
        for state in db.migration_states().await? {
            println!("{}", status_line(&state));
        }
        return Ok(());
    };

    if change == SchemaChange::Rebuild {
        tracing::warn!("dropping every table before re-applying migrations");
    }
    db.change_schema(change).await?;
    tracing::info!(?change, "schema change complete");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actions_map_to_schema_changes() {
        assert_eq!(schema_change(MigrateAction::Up), Some(SchemaChange::Apply));
        assert_eq!(schema_change(MigrateAction::Down), Some(SchemaChange::RevertLast));
        assert_eq!(schema_change(MigrateAction::Fresh), Some(SchemaChange::Rebuild));
        assert_eq!(schema_change(MigrateAction::Status), None);
    }

    #[test]
    fn test_status_line() {
        let state = MigrationState {
            name: "m20240101_000001_create_accounts_table".to_string(),
            applied: false,
        };
        assert_eq!(
            status_line(&state),
            "pending  m20240101_000001_create_accounts_table"
        );
    }
}
