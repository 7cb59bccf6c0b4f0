//! # caja-core: Pure Business Logic for the Caja Back Office
//!
//! This crate holds every calculation the sale engine performs, as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Caja Architecture                                │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    caja-cli / HTTP handlers                     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            caja-sales (SaleService, ProductService)             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ caja-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   money   │  │   words   │  │permission │  │calculator │  │   │
//! │  │   │  round2   │  │  DOLARES  │  │  grants   │  │ line math │  │   │
//! │  │   │  round4   │  │  CENTAVOS │  │  gate     │  │ totals    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    caja-db (Database Layer)                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (CatalogProduct, Sale, SaleLine, etc.)
//! - [`money`] - Fixed-precision rounding helpers
//! - [`words`] - Amount-to-words formatter for printed receipts
//! - [`permission`] - Grant membership and the product-update gate
//! - [`calculator`] - Per-line figures and the sale totals fold
//! - [`validation`] - Request validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use caja_core::words::amount_to_words;
//! use rust_decimal::Decimal;
//!
//! let text = amount_to_words(Decimal::new(2000, 2)).unwrap();
//! assert_eq!(text, "VEINTE DOLARES CON CERO CENTAVOS 00/100");
//! ```

pub mod calculator;
pub mod error;
pub mod money;
pub mod permission;
pub mod types;
pub mod validation;
pub mod words;

pub use error::{CoreError, PermissionError, ValidationError};
pub use types::*;

/// Maximum number of lines accepted in a single sale request.
pub const MAX_SALE_LINES: usize = 500;

/// Maximum length of free-text customer notes on a sale.
pub const MAX_NOTES_LENGTH: usize = 500;
