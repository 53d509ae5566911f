//! Core business logic for the SYSCOHADA ledger.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `balance` - Account tree, leaf aggregation and equilibrium checks
//! - `reports` - Trial balance and general ledger
//! - `closure` - Period closure checklist and step execution
//! - `budget` - Budget tracking and variance analysis
//! - `tiers` - Clients and suppliers
//! - `tasks` - Accounting task board
//! - `query` - Cache-keyed balance queries
//! - `store` - In-process entity store

pub mod balance;
pub mod budget;
pub mod closure;
pub mod query;
pub mod reports;
pub mod store;
pub mod tasks;
pub mod tiers;
