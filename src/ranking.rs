//! Pure ordering and best-choice flagging for both lookup strategies.
//!
//! These functions take owned candidate lists and return annotated,
//! ordered results; they touch no shared state, so concurrent ranking
//! requests never need a locking discipline.

use std::cmp::Ordering;

use crate::core::{CardOffer, RankedCard};
use crate::store::MerchantMatch;

/// Tolerance for the best-choice tie test. Rules are authored with clean
/// decimal yields, but equality through floats must not depend on that.
pub const YIELD_EPSILON: f64 = 1e-9;

/// Rank merchant-rule matches: yield descending, annual fee ascending.
///
/// Every rule whose yield ties the maximum is flagged best choice; there
/// is no secondary tie-break, so several cards may carry the flag.
pub fn rank_merchant_matches(mut matches: Vec<MerchantMatch>) -> Vec<RankedCard> {
    if matches.is_empty() {
        return Vec::new();
    }

    let max_yield = matches
        .iter()
        .map(|m| m.rule.ranking_yield())
        .fold(f64::NEG_INFINITY, f64::max);

    matches.sort_by(|a, b| {
        b.rule
            .ranking_yield()
            .partial_cmp(&a.rule.ranking_yield())
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.card.annual_fee.cmp(&b.card.annual_fee))
    });

    matches
        .into_iter()
        .map(|m| {
            let is_best = (max_yield - m.rule.ranking_yield()).abs() <= YIELD_EPSILON;
            RankedCard::from_rule(m.card, &m.rule, is_best)
        })
        .collect()
}

/// Rank plain catalog cards: reward_rate descending, annual fee ascending.
///
/// Used for the generic fallback and for best_for tag matches appended
/// after merchant results; no entry is ever flagged best choice.
pub fn rank_generic(mut cards: Vec<CardOffer>) -> Vec<RankedCard> {
    sort_by_rate_then_fee(&mut cards);
    cards.into_iter().map(RankedCard::generic).collect()
}

pub(crate) fn sort_by_rate_then_fee(cards: &mut [CardOffer]) {
    cards.sort_by(|a, b| {
        b.reward_rate
            .partial_cmp(&a.reward_rate)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.annual_fee.cmp(&b.annual_fee))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CardCategory, MerchantRule, RewardType};
    use chrono::Utc;

    fn card(id: i64, name: &str, rate: f64, fee: i64) -> CardOffer {
        let mut card = CardOffer::new(id, name, "HDFC", CardCategory::Premium, RewardType::Points);
        card.reward_rate = rate;
        card.annual_fee = fee;
        card
    }

    fn rule(card_id: i64, value: f64) -> MerchantRule {
        MerchantRule {
            id: card_id,
            merchant: "Zomato".to_string(),
            card_id,
            reward_value: value,
            reward_unit: "%".to_string(),
            notes: None,
            effective_rate: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_merchant_ranking_orders_by_yield() {
        let matches = vec![
            MerchantMatch::new(rule(2, 13.0), card(2, "HDFC Diners Club Black", 3.3, 10000)),
            MerchantMatch::new(rule(1, 16.6), card(1, "HDFC Infinia", 3.3, 12500)),
        ];

        let ranked = rank_merchant_matches(matches);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].card.name, "HDFC Infinia");
        assert!(ranked[0].is_best_choice);
        assert_eq!(ranked[0].merchant_reward_value, Some(16.6));
        assert_eq!(ranked[1].card.name, "HDFC Diners Club Black");
        assert!(!ranked[1].is_best_choice);
    }

    #[test]
    fn test_merchant_ranking_flags_all_ties() {
        let matches = vec![
            MerchantMatch::new(rule(1, 72.0), card(1, "Card A", 2.0, 500)),
            MerchantMatch::new(rule(2, 72.0), card(2, "Card B", 2.0, 100)),
            MerchantMatch::new(rule(3, 72.0), card(3, "Card C", 2.0, 300)),
        ];

        let ranked = rank_merchant_matches(matches);
        assert!(ranked.iter().all(|c| c.is_best_choice));
        // equal yield falls back to fee ascending
        let fees: Vec<i64> = ranked.iter().map(|c| c.card.annual_fee).collect();
        assert_eq!(fees, vec![100, 300, 500]);
    }

    #[test]
    fn test_tie_test_tolerates_float_drift() {
        let drifted = 16.6 + 1e-12;
        let matches = vec![
            MerchantMatch::new(rule(1, 16.6), card(1, "Card A", 2.0, 100)),
            MerchantMatch::new(rule(2, drifted), card(2, "Card B", 2.0, 200)),
        ];

        let ranked = rank_merchant_matches(matches);
        assert!(ranked.iter().all(|c| c.is_best_choice));
    }

    #[test]
    fn test_effective_rate_drives_ordering() {
        let mut multiplier = rule(1, 5.0);
        multiplier.reward_unit = "X".to_string();
        multiplier.effective_rate = Some(10.0);

        let matches = vec![
            MerchantMatch::new(rule(2, 6.0), card(2, "Percent Card", 2.0, 0)),
            MerchantMatch::new(multiplier, card(1, "Multiplier Card", 2.0, 0)),
        ];

        let ranked = rank_merchant_matches(matches);
        assert_eq!(ranked[0].card.name, "Multiplier Card");
        assert!(ranked[0].is_best_choice);
        // the raw authored figure is what the caller sees
        assert_eq!(ranked[0].merchant_reward_value, Some(5.0));
        assert_eq!(ranked[0].merchant_reward_unit.as_deref(), Some("X"));
        assert!(!ranked[1].is_best_choice);
    }

    #[test]
    fn test_generic_ranking_order() {
        let cards = vec![
            card(1, "Low", 1.0, 0),
            card(2, "High", 5.0, 95),
            card(3, "Mid cheap", 2.0, 0),
            card(4, "Mid pricey", 2.0, 550),
        ];

        let ranked = rank_generic(cards);
        let names: Vec<&str> = ranked.iter().map(|c| c.card.name.as_str()).collect();
        assert_eq!(names, vec!["High", "Mid cheap", "Mid pricey", "Low"]);
        assert!(ranked.iter().all(|c| !c.is_best_choice));
    }

    #[test]
    fn test_empty_inputs() {
        assert!(rank_merchant_matches(Vec::new()).is_empty());
        assert!(rank_generic(Vec::new()).is_empty());
    }
}
