/*!
 * SQLite persistence for voiced dialogue lines.
 *
 * - `connection`: Shared connection with async-safe access
 * - `schema`: Versioned table definitions
 * - `models`: Row types
 * - `repository`: Typed queries
 */

pub mod connection;
pub mod models;
pub mod repository;
pub mod schema;

pub use connection::DatabaseConnection;
pub use models::DialogRecord;
pub use repository::Repository;
