//! # dokan-db: Database Layer for Dokan
//!
//! SQLite storage via sqlx, plus the [`dokan_checkout::Storage`]
//! implementation the order pipeline runs against.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Dokan Data Flow                                  │
//! │                                                                         │
//! │  storefront-api handler                                                 │
//! │       │                                                                 │
//! │       ├── checkout pipeline ──► Arc<dyn Storage> ──┐                    │
//! │       │                                            │                    │
//! │       └── admin routes ──────► db.orders() ────────┤                    │
//! │                                                    ▼                    │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                     dokan-db (THIS CRATE)                       │    │
//! │  │                                                                 │    │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐   │    │
//! │  │   │   Database    │    │  Repositories  │    │  Migrations  │   │    │
//! │  │   │   (pool.rs)   │◄───│ ProductRepo    │    │  (embedded)  │   │    │
//! │  │   │  SqlitePool   │    │ DiscountRepo   │    │ 001_init.sql │   │    │
//! │  │   │               │    │ OrderRepo      │    │              │   │    │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘   │    │
//! │  │                                                                 │    │
//! │  │   storage.rs: impl Storage for Database                         │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Product, discount code and order repositories
//! - [`storage`] - `Storage` port implementation
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dokan_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("dokan.db")).await?;
//! let order = db.orders().get_by_order_number("ORD-…").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod storage;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::discount::DiscountRepository;
pub use repository::order::OrderRepository;
pub use repository::product::ProductRepository;
