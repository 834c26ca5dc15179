//! # Repository Layer
//!
//! Data access repositories for each table.
//!
//! Repositories hold a pool clone and run single-statement operations
//! against it. Multi-statement transactional work (the sale commit)
//! lives in the engine, which passes an open transaction's connection
//! into the `*_tx` methods here.
//!
//! Rows are mapped field by field with `Row::try_get`, so a schema
//! mismatch surfaces as a decode error naming the column instead of a
//! silently shifted value.

pub mod config;
pub mod customer;
pub mod price_matrix;
pub mod product;
pub mod sale;

pub use config::ConfigRepository;
pub use customer::CustomerRepository;
pub use price_matrix::PriceMatrixRepository;
pub use product::ProductRepository;
pub use sale::SaleRepository;
