//! # Repository Module
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  HTTP handler / Storage impl                                            │
//! │       │                                                                 │
//! │       │  db.discounts().increment_usage(id)                             │
//! │       ▼                                                                 │
//! │  DiscountRepository                                                     │
//! │  ├── find_by_code(&self, code)                                          │
//! │  ├── create(&self, new_code)                                            │
//! │  ├── set_active(&self, id, active)                                      │
//! │  └── increment_usage(&self, id)     ◄── conditional UPDATE              │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each repository owns a clone of the pool. Rows are read into private
//! `*Row` structs (`sqlx::FromRow`) and converted into dokan-core types, so
//! storage layout never leaks past this module.
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - current prices
//! - [`DiscountRepository`](discount::DiscountRepository) - codes, product
//!   restrictions, usage counter
//! - [`OrderRepository`](order::OrderRepository) - orders, items, status

pub mod discount;
pub mod order;
pub mod product;
