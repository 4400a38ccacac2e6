//! Pool de conexiones sobre r2d2.
//!
//! Reemplaza al singleton de pool: se construye explícitamente a partir de
//! un `DbConfig` y se inyecta a quien necesite conexiones.
//!
//! Notas operativas:
//! - El pool se construye sin abrir conexiones por adelantado
//!   (`build_unchecked`); la primera conexión se establece al primer
//!   checkout.
//! - `acquire_connection` reintenta hasta `acquire_retries` veces; cada
//!   intento espera a lo sumo `connection_timeout`.
use log::{info, warn};
use r2d2::{ManageConnection, Pool, PooledConnection};

use crate::config::DbConfig;
use crate::error::PersistenceError;

/// Proveedor abstracto de conexiones.
///
/// Permite inyectar el pool real o un doble en pruebas sin acoplar a r2d2.
/// Debe devolver una conexión válida o `PersistenceError::TransientIo`.
pub trait ConnectionProvider: Send + Sync + 'static {
    type Connection;

    fn connection(&self) -> Result<Self::Connection, PersistenceError>;
}

/// Conexiones totales e inactivas en un instante dado.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolState {
    pub connections: u32,
    pub idle_connections: u32,
}

pub struct ConnectionPool<M: ManageConnection> {
    pool: Pool<M>,
    acquire_retries: u32,
}

impl<M: ManageConnection> ConnectionPool<M> {
    pub fn new(manager: M, cfg: &DbConfig) -> Result<Self, PersistenceError> {
        if cfg.max_connections == 0 {
            return Err(PersistenceError::InvalidConfiguration("max_connections must be greater than zero".into()));
        }
        if cfg.min_connections > cfg.max_connections {
            return Err(PersistenceError::InvalidConfiguration(format!("min_connections ({}) > max_connections ({})",
                                                                      cfg.min_connections, cfg.max_connections)));
        }
        let pool = Pool::builder().min_idle(Some(cfg.min_connections))
                                  .max_size(cfg.max_connections)
                                  .connection_timeout(cfg.connection_timeout)
                                  .build_unchecked(manager);
        info!("connection pool created for {} (min={}, max={})",
              cfg.redacted_url(),
              cfg.min_connections,
              cfg.max_connections);
        Ok(Self { pool,
                  acquire_retries: cfg.acquire_retries.max(1) })
    }

    /// Obtiene una conexión; tras agotar los reintentos devuelve
    /// `TransientIo` con el último error.
    pub fn acquire_connection(&self) -> Result<PooledConnection<M>, PersistenceError> {
        let mut last = None;
        for attempt in 1..=self.acquire_retries {
            match self.pool.get() {
                Ok(conn) => return Ok(conn),
                Err(e) => {
                    warn!("connection attempt {attempt}/{} failed: {e}", self.acquire_retries);
                    last = Some(e);
                }
            }
        }
        let detail = last.map(|e| e.to_string()).unwrap_or_default();
        Err(PersistenceError::TransientIo(format!("unable to acquire a connection after {} attempt(s): {detail}",
                                                  self.acquire_retries)))
    }

    pub fn state(&self) -> PoolState {
        let state = self.pool.state();
        PoolState { connections: state.connections,
                    idle_connections: state.idle_connections }
    }

    pub fn max_size(&self) -> u32 {
        self.pool.max_size()
    }

    /// Libera el pool; las conexiones inactivas se cierran al soltarlo.
    pub fn shutdown(self) {
        let state = self.state();
        info!("shutting down connection pool ({} connection(s), {} idle)",
              state.connections,
              state.idle_connections);
        drop(self.pool);
    }
}

impl<M: ManageConnection> ConnectionProvider for ConnectionPool<M> {
    type Connection = PooledConnection<M>;

    fn connection(&self) -> Result<Self::Connection, PersistenceError> {
        self.acquire_connection()
    }
}

impl<M: ManageConnection> std::fmt::Debug for ConnectionPool<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionPool")
         .field("state", &self.state())
         .field("max_size", &self.max_size())
         .field("acquire_retries", &self.acquire_retries)
         .finish()
    }
}
