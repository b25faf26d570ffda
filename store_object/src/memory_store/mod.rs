//! In-memory store
//!
//! A `MemoryDatabase` holds committed rows for every registered entity type and
//! `MemorySession` is the unit of work over it. Deleting enforces the model's delete
//! behaviours the way a relational database enforces foreign keys.

pub mod database;
pub mod evaluate;
pub mod session;

#[cfg(test)]
mod tests;

pub use database::MemoryDatabase;
pub use session::MemorySession;
