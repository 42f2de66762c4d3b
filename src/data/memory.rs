use crate::{
    data::{Record, Roster, student::Student, teacher::Teacher},
    error::{DuplicateEmailSnafu, StoreResult, UnavailableSnafu},
};
use async_trait::async_trait;
use snafu::ensure;
use std::{
    collections::BTreeMap,
    sync::atomic::{AtomicBool, Ordering},
};
use tokio::sync::RwLock;

/// An in-process stand-in for the database, used to run the API without Postgres.
/// It keeps the same rules: generated ids, unique email per table (inactive rows
/// included), soft deletes.
#[derive(Debug, Default)]
pub struct MemoryRoster {
    students: Collection<Student>,
    teachers: Collection<Teacher>,
}

#[derive(Debug)]
struct Collection<R> {
    table: RwLock<Table<R>>,
    unavailable: AtomicBool,
}

impl<R> Default for Collection<R> {
    fn default() -> Self {
        Self {
            table: RwLock::new(Table::default()),
            unavailable: AtomicBool::new(false),
        }
    }
}

impl<R> Collection<R> {
    fn ensure_available(&self) -> StoreResult<()> {
        ensure!(!self.unavailable.load(Ordering::SeqCst), UnavailableSnafu);
        Ok(())
    }
}

#[derive(Debug)]
struct Table<R> {
    rows: BTreeMap<i64, R>,
    last_id: i64,
}

impl<R> Default for Table<R> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<R: Record> Table<R> {
    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.rows
            .values()
            .any(|row| row.email() == email && Some(row.id()) != except)
    }
}

impl MemoryRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every operation on both tables fails as if the database were
    /// unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.set_unavailable_for::<Student>(unavailable);
        self.set_unavailable_for::<Teacher>(unavailable);
    }

    /// Like [`Self::set_unavailable`], for one table only.
    #[allow(private_bounds)]
    pub fn set_unavailable_for<R: Record>(&self, unavailable: bool)
    where
        Self: HasCollection<R>,
    {
        HasCollection::<R>::collection(self)
            .unavailable
            .store(unavailable, Ordering::SeqCst);
    }

    /// The table for `R`, if it is currently reachable.
    fn available<R: Record>(&self) -> StoreResult<&RwLock<Table<R>>>
    where
        Self: HasCollection<R>,
    {
        let collection = HasCollection::<R>::collection(self);
        collection.ensure_available()?;
        Ok(&collection.table)
    }
}

trait HasCollection<R> {
    fn collection(&self) -> &Collection<R>;
}

impl HasCollection<Student> for MemoryRoster {
    fn collection(&self) -> &Collection<Student> {
        &self.students
    }
}

impl HasCollection<Teacher> for MemoryRoster {
    fn collection(&self) -> &Collection<Teacher> {
        &self.teachers
    }
}

#[async_trait]
#[allow(private_bounds)]
impl<R: Record> Roster<R> for MemoryRoster
where
    Self: HasCollection<R>,
{
    async fn list_active(&self) -> StoreResult<Vec<R>> {
        let table = self.available::<R>()?.read().await;

        Ok(table
            .rows
            .values()
            .rev()
            .filter(|row| row.is_active())
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, id: i64) -> StoreResult<Option<R>> {
        Ok(self.available::<R>()?.read().await.rows.get(&id).cloned())
    }

    async fn insert(&self, draft: R::Draft) -> StoreResult<i64> {
        let mut table = self.available::<R>()?.write().await;

        let candidate = R::from_draft(table.last_id + 1, draft, true);
        ensure!(
            !table.email_taken(candidate.email(), None),
            DuplicateEmailSnafu {
                email: candidate.email()
            }
        );

        table.last_id = candidate.id();
        table.rows.insert(candidate.id(), candidate);
        Ok(table.last_id)
    }

    async fn replace(&self, id: i64, draft: R::Draft, active: Option<bool>) -> StoreResult<()> {
        let mut table = self.available::<R>()?.write().await;

        let Some(current_active) = table.rows.get(&id).map(R::is_active) else {
            return Ok(());
        };

        let replacement = R::from_draft(id, draft, active.unwrap_or(current_active));
        ensure!(
            !table.email_taken(replacement.email(), Some(id)),
            DuplicateEmailSnafu {
                email: replacement.email()
            }
        );

        table.rows.insert(id, replacement);
        Ok(())
    }

    async fn deactivate(&self, id: i64) -> StoreResult<()> {
        if let Some(row) = self.available::<R>()?.write().await.rows.get_mut(&id) {
            row.set_active(false);
        }
        Ok(())
    }
}
