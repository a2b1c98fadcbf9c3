pub mod memory;
pub mod seed;
pub mod sqlite;

use async_trait::async_trait;
use crate::core::{CardOffer, MerchantRule};
use crate::engine::SearchFilters;
use crate::error::Result;
use crate::query::NormalizedQuery;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Result cap for category recommendations
pub(crate) const BEST_FOR_LIMIT: usize = 10;

/// Read-only access to the card catalog and merchant rule table.
///
/// The engine never mutates either collection; how a store indexes or
/// executes these lookups is its own concern, the ordering and matching
/// semantics are part of the contract.
#[async_trait]
pub trait CardStore: Send + Sync {
    /// Catalog cards satisfying every supplied filter conjunctively,
    /// ordered by reward_rate descending, then annual_fee ascending.
    async fn search_cards(&self, filters: &SearchFilters) -> Result<Vec<CardOffer>>;

    /// Merchant rules whose merchant name contains the query as a
    /// case-insensitive substring, each joined with its card, ordered by
    /// yield descending, then annual_fee ascending.
    async fn merchant_matches(&self, query: &NormalizedQuery) -> Result<Vec<MerchantMatch>>;

    /// Cards whose best_for tags contain the query, excluding the given
    /// ids, ordered by reward_rate descending, then annual_fee ascending.
    async fn cards_tagged(
        &self,
        query: &NormalizedQuery,
        exclude_ids: &[i64],
    ) -> Result<Vec<CardOffer>>;

    /// Distinct categories present in the catalog, sorted
    async fn categories(&self) -> Result<Vec<String>>;

    /// Top cards for a spend category: category match or best_for mention,
    /// ordered by reward_rate descending, then annual_fee ascending
    async fn best_for_category(&self, category: &str) -> Result<Vec<CardOffer>>;

    /// Catalog statistics
    async fn stats(&self) -> Result<CatalogStats>;
}

/// A merchant rule joined with the card it applies to
#[derive(Debug, Clone)]
pub struct MerchantMatch {
    pub rule: MerchantRule,
    pub card: CardOffer,
}

impl MerchantMatch {
    pub fn new(rule: MerchantRule, card: CardOffer) -> Self {
        Self { rule, card }
    }
}

/// Catalog statistics
#[derive(Debug, Clone)]
pub struct CatalogStats {
    pub total_cards: u64,
    pub total_rules: u64,
    pub schema_version: i64,
}
