pub mod db;
pub mod error;
pub mod user_repo;

pub use db::Db;
