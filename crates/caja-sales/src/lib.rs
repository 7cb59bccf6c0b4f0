//! # caja-sales: Sale Orchestration for the Caja Back Office
//!
//! Multi-step operations that combine the pure calculator with storage.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                caja-cli (generate-sale, update-product)                 │
//! └──────────────────────────────────┬──────────────────────────────────────┘
//!                                    │
//! ┌──────────────────────────────────▼──────────────────────────────────────┐
//! │                     ★ caja-sales (THIS CRATE) ★                         │
//! │                                                                         │
//! │   SaleService<S: SaleStore>              ProductService                 │
//! │     validate → refs → catalog →            validate → gate → write      │
//! │     compute → header → lines → fetch                                    │
//! └───────────────┬──────────────────────────────────┬──────────────────────┘
//!                 │                                  │
//!        ┌────────▼────────┐                ┌────────▼────────┐
//!        │    caja-core    │                │     caja-db     │
//!        └─────────────────┘                └─────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`sale`] - Sale generation
//! - [`product`] - Permission-checked product update
//! - [`store`] - Storage trait consumed by sale generation
//! - [`error`] - Error kinds and their status codes

pub mod error;
pub mod product;
pub mod sale;
pub mod store;

pub use error::{ErrorCode, ProductUpdateError, SaleError, SaleResult};
pub use product::ProductService;
pub use sale::SaleService;
pub use store::SaleStore;
