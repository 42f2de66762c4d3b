use sqlx::{Pool, Postgres};

/// The production backend. Each entity module implements [`super::Roster`] for it with
/// its own SQL.
#[derive(Clone, Debug)]
pub struct PgRoster {
    pool: Pool<Postgres>,
}

impl PgRoster {
    pub const fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub const fn pool(&self) -> &Pool<Postgres> {
        &self.pool
    }
}
