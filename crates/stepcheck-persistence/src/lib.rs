//! stepcheck-persistence
//!
//! Servicio de pool de conexiones para steps que consultan una base de
//! datos. El pool es genérico sobre `r2d2::ManageConnection`; el feature
//! `postgres` agrega el gestor de diesel para Postgres.
//!
//! Módulos:
//! - `config`: `DbConfig` desde propiedades o desde `.env`/entorno.
//! - `pool`: `ConnectionPool` con reintentos y `ConnectionProvider`.
//! - `pg` (feature `postgres`): `postgres_pool` y `ping`.

pub mod config;
pub mod error;
#[cfg(feature = "postgres")]
pub mod pg;
pub mod pool;

pub use config::{init_dotenv, DbConfig};
pub use error::PersistenceError;
pub use pool::{ConnectionPool, ConnectionProvider, PoolState};
