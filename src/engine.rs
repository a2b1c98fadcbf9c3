use crate::core::{CardCategory, CardOffer, RewardType, SearchOutcome};
use crate::error::Result;
use crate::query::NormalizedQuery;
use crate::ranking;
use crate::store::{CardStore, CatalogStats, MemoryStore, SqliteStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Main card search orchestrator.
///
/// Each `search` call is an independent computation over the store's
/// current snapshot; the engine keeps no state between calls, so rapid
/// successive requests can safely run concurrently or be discarded by
/// the caller when superseded.
pub struct CardEngine {
    store: Arc<dyn CardStore>,
}

/// Structured filters accompanying a ranking request.
///
/// All filters combine conjunctively. Free-text numeric input must be
/// sanitized by the caller; the `*_text` helpers treat unparseable input
/// as an absent filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchFilters {
    pub query: Option<String>,
    pub category: Option<CardCategory>,
    pub reward_type: Option<RewardType>,
    pub max_annual_fee: Option<i64>,
    pub min_reward_rate: Option<f64>,
}

impl SearchFilters {
    /// Filters carrying only a free-text query
    pub fn with_query(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Self::default()
        }
    }

    /// Normalized form of the text query ("" when no query was supplied)
    pub fn normalized_query(&self) -> NormalizedQuery {
        NormalizedQuery::new(self.query.as_deref().unwrap_or(""))
    }

    /// Set the max-fee filter from raw text input; unparseable → absent
    pub fn with_max_fee_text(mut self, raw: &str) -> Self {
        self.max_annual_fee = raw.trim().parse::<i64>().ok();
        self
    }

    /// Set the min-rate filter from raw text input; unparseable → absent
    pub fn with_min_rate_text(mut self, raw: &str) -> Self {
        self.min_reward_rate = raw.trim().parse::<f64>().ok();
        self
    }
}

impl CardEngine {
    /// Create a new engine over the default SQLite store, seeding the
    /// catalog on first run
    pub async fn new(db_path: impl AsRef<str>) -> Result<Self> {
        let store = Arc::new(SqliteStore::open(db_path.as_ref()).await?);
        Ok(Self { store })
    }

    /// Create an engine over the seeded in-memory catalog, with no
    /// persistence at all
    pub fn in_memory() -> Self {
        Self {
            store: Arc::new(MemoryStore::seeded()),
        }
    }

    /// Create an engine over any store implementation
    pub fn with_store(store: Arc<dyn CardStore>) -> Self {
        Self { store }
    }

    /// Merchant-first search.
    ///
    /// A non-empty query is first matched against the merchant rule
    /// table; when one or more rules apply, their cards are ranked by
    /// effective yield with the maximum flagged best choice, followed by
    /// cards that merely mention the query in their best_for tags. Only
    /// when no rule matches does the engine fall back to a generic
    /// conjunctive filter search over the catalog.
    pub async fn search(&self, filters: &SearchFilters) -> Result<SearchOutcome> {
        let query = filters.normalized_query();

        if !query.is_empty() {
            let matches = self.store.merchant_matches(&query).await?;
            if !matches.is_empty() {
                tracing::debug!(
                    "{} merchant rules matched for '{}'",
                    matches.len(),
                    query.as_str()
                );

                let matched_ids: Vec<i64> = matches.iter().map(|m| m.card.id).collect();
                let mut results = ranking::rank_merchant_matches(matches);

                let tagged = self.store.cards_tagged(&query, &matched_ids).await?;
                results.extend(ranking::rank_generic(tagged));

                return Ok(SearchOutcome::MerchantMatch(results));
            }
        }

        tracing::debug!("no merchant rule matched '{}', generic search", query.as_str());
        let cards = self.store.search_cards(filters).await?;
        Ok(SearchOutcome::GenericMatch(ranking::rank_generic(cards)))
    }

    /// Distinct categories present in the catalog (for filter chips)
    pub async fn categories(&self) -> Result<Vec<String>> {
        self.store.categories().await
    }

    /// Best cards for a spend category, ranked by reward rate then fee
    pub async fn best_for_category(&self, category: &str) -> Result<Vec<CardOffer>> {
        self.store.best_for_category(category).await
    }

    /// Catalog statistics
    pub async fn stats(&self) -> Result<CatalogStats> {
        self.store.stats().await
    }
}
