pub mod db;
pub mod migrations;

pub use db::Database;
