//! Pool Postgres (diesel) construido desde `DbConfig`.
use diesel::connection::SimpleConnection;
use diesel::r2d2::ConnectionManager;
use diesel::PgConnection;
use log::debug;

use crate::config::DbConfig;
use crate::error::PersistenceError;
use crate::pool::ConnectionPool;

/// Alias de tipo para el pool de conexiones Postgres.
pub type PgPool = ConnectionPool<ConnectionManager<PgConnection>>;

pub fn postgres_pool(cfg: &DbConfig) -> Result<PgPool, PersistenceError> {
    let manager = ConnectionManager::<PgConnection>::new(cfg.connection_url());
    ConnectionPool::new(manager, cfg)
}

/// Sonda trivial de validez (`SELECT 1`) sobre una conexión del pool.
pub fn ping(pool: &PgPool) -> Result<(), PersistenceError> {
    let mut conn = pool.acquire_connection()?;
    conn.batch_execute("SELECT 1;")?;
    debug!("database ping succeeded");
    Ok(())
}
