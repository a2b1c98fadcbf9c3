use async_trait::async_trait;
use chrono::Utc;
use std::cmp::Ordering;

use crate::core::{CardOffer, MerchantRule};
use crate::engine::SearchFilters;
use crate::error::Result;
use crate::query::NormalizedQuery;
use crate::ranking::sort_by_rate_then_fee;
use crate::store::seed::{SEED_CARDS, SEED_RULES};
use crate::store::{CardStore, CatalogStats, MerchantMatch, BEST_FOR_LIMIT};

/// Plain in-memory catalog store.
///
/// The portfolio is a fixed dataset, so immutable value collections
/// loaded at process start are the primary representation;
/// [`SqliteStore`](crate::store::SqliteStore) offers the same contract
/// with on-disk persistence.
pub struct MemoryStore {
    cards: Vec<CardOffer>,
    rules: Vec<MerchantRule>,
}

impl MemoryStore {
    /// Build a store over arbitrary collections. Rules referencing a
    /// card id absent from `cards` never match.
    pub fn new(cards: Vec<CardOffer>, rules: Vec<MerchantRule>) -> Self {
        Self { cards, rules }
    }

    /// Build from the fixed seed portfolio
    pub fn seeded() -> Self {
        let created_at = Utc::now();

        let cards: Vec<CardOffer> = SEED_CARDS
            .iter()
            .enumerate()
            .map(|(i, seed)| CardOffer {
                id: i as i64 + 1,
                name: seed.name.to_string(),
                issuer: seed.issuer.to_string(),
                category: seed.category,
                reward_type: seed.reward_type,
                reward_rate: seed.reward_rate,
                annual_fee: seed.annual_fee,
                signup_bonus: seed.signup_bonus.to_string(),
                best_for: seed.best_for.to_string(),
                created_at,
            })
            .collect();

        let rules: Vec<MerchantRule> = SEED_RULES
            .iter()
            .enumerate()
            .filter_map(|(i, seed)| {
                let card = cards.iter().find(|c| c.name == seed.card_name);
                match card {
                    Some(card) => Some(MerchantRule {
                        id: i as i64 + 1,
                        merchant: seed.merchant.to_string(),
                        card_id: card.id,
                        reward_value: seed.reward_value,
                        reward_unit: seed.reward_unit.to_string(),
                        notes: seed.notes.map(str::to_string),
                        effective_rate: seed.effective_rate,
                        created_at,
                    }),
                    None => {
                        tracing::warn!(
                            "seed rule for '{}' references unknown card '{}', skipping",
                            seed.merchant,
                            seed.card_name
                        );
                        None
                    }
                }
            })
            .collect();

        Self { cards, rules }
    }
}

#[async_trait]
impl CardStore for MemoryStore {
    async fn search_cards(&self, filters: &SearchFilters) -> Result<Vec<CardOffer>> {
        let query = filters.normalized_query();

        let mut cards: Vec<CardOffer> = self
            .cards
            .iter()
            .filter(|c| {
                (query.is_empty()
                    || query.matches(&c.name)
                    || query.matches(&c.issuer)
                    || query.matches(&c.best_for)
                    || query.matches(&c.signup_bonus))
                    && filters.category.map_or(true, |cat| c.category == cat)
                    && filters.reward_type.map_or(true, |rt| c.reward_type == rt)
                    && filters.max_annual_fee.map_or(true, |max| c.annual_fee <= max)
                    && filters.min_reward_rate.map_or(true, |min| c.reward_rate >= min)
            })
            .cloned()
            .collect();

        sort_by_rate_then_fee(&mut cards);
        Ok(cards)
    }

    async fn merchant_matches(&self, query: &NormalizedQuery) -> Result<Vec<MerchantMatch>> {
        let mut matches: Vec<MerchantMatch> = self
            .rules
            .iter()
            .filter(|r| query.matches(&r.merchant))
            .filter_map(|r| {
                self.cards
                    .iter()
                    .find(|c| c.id == r.card_id)
                    .map(|c| MerchantMatch::new(r.clone(), c.clone()))
            })
            .collect();

        matches.sort_by(|a, b| {
            b.rule
                .ranking_yield()
                .partial_cmp(&a.rule.ranking_yield())
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.card.annual_fee.cmp(&b.card.annual_fee))
        });
        Ok(matches)
    }

    async fn cards_tagged(
        &self,
        query: &NormalizedQuery,
        exclude_ids: &[i64],
    ) -> Result<Vec<CardOffer>> {
        let mut cards: Vec<CardOffer> = self
            .cards
            .iter()
            .filter(|c| query.matches(&c.best_for) && !exclude_ids.contains(&c.id))
            .cloned()
            .collect();

        sort_by_rate_then_fee(&mut cards);
        Ok(cards)
    }

    async fn categories(&self) -> Result<Vec<String>> {
        let mut categories: Vec<String> = self
            .cards
            .iter()
            .map(|c| c.category.as_str().to_string())
            .collect();
        categories.sort();
        categories.dedup();
        Ok(categories)
    }

    async fn best_for_category(&self, category: &str) -> Result<Vec<CardOffer>> {
        let query = NormalizedQuery::new(category);

        let mut cards: Vec<CardOffer> = self
            .cards
            .iter()
            .filter(|c| c.category.as_str() == category || query.matches(&c.best_for))
            .cloned()
            .collect();

        sort_by_rate_then_fee(&mut cards);
        cards.truncate(BEST_FOR_LIMIT);
        Ok(cards)
    }

    async fn stats(&self) -> Result<CatalogStats> {
        Ok(CatalogStats {
            total_cards: self.cards.len() as u64,
            total_rules: self.rules.len() as u64,
            schema_version: 0,
        })
    }
}
