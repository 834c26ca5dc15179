//! # copypoint-db: Database Layer for Copypoint POS
//!
//! SQLite persistence and the transactional sale engine for Copypoint
//! POS.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      copypoint-db Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Callers (UI / tests)                         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌──────────────┐  ┌───────────▼──────────┐  ┌──────────────────────┐  │
//! │  │ PriceResolver│  │      SaleEngine      │  │     ConfigStore      │  │
//! │  │ matrix quote │  │  atomic cart commit  │  │  cached margins      │  │
//! │  └──────┬───────┘  └───────────┬──────────┘  └──────────┬───────────┘  │
//! │         │                      │                        │              │
//! │  ┌──────▼──────────────────────▼────────────────────────▼───────────┐  │
//! │  │                       Repository Layer                           │  │
//! │  │   products │ price_matrix │ sales │ customers │ config           │  │
//! │  └─────────────────────────────┬────────────────────────────────────┘  │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            SQLite (WAL mode, foreign keys ON)                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Decisions
//!
//! - **SQLite with WAL**: single-file local storage for a one-register
//!   shop; WAL keeps reads cheap while a sale commits
//! - **Integer cents**: monetary columns are INTEGER, mapped through
//!   [`copypoint_core::Money`]
//! - **Transaction boundary in the engine**: repositories run single
//!   statements; only [`SaleEngine`] opens transactions
//! - **Embedded migrations**: schema ships inside the binary

pub mod config_store;
pub mod engine;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod pricing;
pub mod repository;

pub use config_store::ConfigStore;
pub use engine::SaleEngine;
pub use error::{DbError, DbResult, ServiceError, ServiceResult};
pub use pool::{Database, DbConfig};
pub use pricing::PriceResolver;
pub use repository::{
    ConfigRepository, CustomerRepository, PriceMatrixRepository, ProductRepository,
    SaleRepository,
};
