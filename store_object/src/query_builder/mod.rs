//! Query builder utilities
//!
//! This module provides filter trees and their SQL rendering.

pub mod builder;
pub mod filter;
pub mod sql_generation;


pub use builder::QueryBuilder;
pub use filter::{QueryCondition, QueryFilter, QueryOperator};
pub use sql_generation::SqlGenerator;
