//! Opening the ledger and its storage

use std::path::PathBuf;
use std::time::Duration;

use platelot_domain::repository::LedgerRepository;
use platelot_domain::Ledger;
use platelot_store::SqliteLedgerRepository;
use platelot_types::Result;

use crate::config::Config;

/// Open the configured SQLite ledger, seeding the slot pool on first use
pub fn open_ledger(config: &Config) -> Result<Ledger<SqliteLedgerRepository>> {
    let db_path = config.database_path()?;
    open_ledger_at(db_path, config.slot_count, config.busy_timeout())
}

/// Open a SQLite ledger at a custom path
pub fn open_ledger_at(
    db_path: PathBuf,
    slot_count: u32,
    busy_timeout: Duration,
) -> Result<Ledger<SqliteLedgerRepository>> {
    let repo = SqliteLedgerRepository::open_with_timeout(db_path, busy_timeout)?;
    repo.seed_slots(slot_count)?;
    Ok(Ledger::new(repo))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_ledger_uses_config_path_and_slot_count() {
        let dir = tempdir().unwrap();
        let config = Config {
            database_path: Some(dir.path().join("lot.db")),
            slot_count: 6,
            ..Default::default()
        };

        let ledger = open_ledger(&config).unwrap();
        assert_eq!(ledger.slots().unwrap().len(), 6);
        assert!(dir.path().join("lot.db").exists());

        // Pool is never resized afterwards
        let bigger = Config {
            slot_count: 40,
            ..config
        };
        assert_eq!(open_ledger(&bigger).unwrap().slots().unwrap().len(), 6);
    }
}
