#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod row;
pub mod sqlite;

pub use sqlite::SQLite;

#[cfg(test)]
mod tests;
