//! # Card Optimizer Engine
//!
//! Merchant-aware credit card ranking engine with:
//! - Smart Search: merchant-specific reward rules override base card rates
//! - Generic conjunctive filter search as the fallback strategy
//! - SQLite-backed read-only catalog, seeded once and versioned
//! - Async/await architecture behind a swappable store trait
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use card_optimizer_engine::{CardEngine, SearchFilters};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let engine = CardEngine::new("cards.db").await?;
//!
//!     let outcome = engine.search(&SearchFilters::with_query("Zomato")).await?;
//!     for card in outcome.into_results() {
//!         println!("{}", card.display());
//!     }
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod engine;
pub mod error;
pub mod query;
pub mod ranking;
pub mod store;

// Re-export primary types
pub use crate::core::{CardCategory, CardOffer, MerchantRule, RankedCard, RewardType, SearchOutcome};
pub use engine::{CardEngine, SearchFilters};
pub use error::{CardEngineError, Result};
pub use query::NormalizedQuery;
pub use store::{CardStore, CatalogStats, MemoryStore, SqliteStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
