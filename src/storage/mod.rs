pub mod export;
pub mod sqlite;

pub use export::export_json;
pub use sqlite::SqliteStorage;
