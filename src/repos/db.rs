/*
 * Responsibility
 * - transient in-memory data context (lives as long as the process)
 * - Clone is cheap (Arc inside); many requests read it concurrently
 */
use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::repos::user_repo::UserRow;

#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub(crate) users: BTreeMap<i64, UserRow>,
    pub(crate) last_user_id: i64,
}

#[derive(Clone, Debug, Default)]
pub struct Db {
    tables: Arc<RwLock<Tables>>,
}

impl Db {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read()
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write()
    }
}
