use serde::{Deserialize, Serialize};
use crate::core::{CardOffer, MerchantRule};

/// A card offer annotated for one ranking request.
///
/// The merchant fields are present only when a merchant rule produced the
/// entry; the serialized names match what the presentation layer consumes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedCard {
    /// The underlying catalog card
    #[serde(flatten)]
    pub card: CardOffer,

    /// True iff this card achieves the maximum yield for the matched merchant
    #[serde(rename = "isBestChoice")]
    pub is_best_choice: bool,

    /// Authored reward figure of the applied merchant rule
    #[serde(
        rename = "merchantRewardValue",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub merchant_reward_value: Option<f64>,

    /// Unit of the applied rule ("%", "X", ...)
    #[serde(
        rename = "merchantRewardUnit",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub merchant_reward_unit: Option<String>,

    /// Caveats carried over from the applied rule
    #[serde(
        rename = "merchantNotes",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub merchant_notes: Option<String>,
}

impl RankedCard {
    /// Entry produced by the generic fallback or a best_for tag match
    pub fn generic(card: CardOffer) -> Self {
        Self {
            card,
            is_best_choice: false,
            merchant_reward_value: None,
            merchant_reward_unit: None,
            merchant_notes: None,
        }
    }

    /// Entry produced by a merchant rule match
    pub fn from_rule(card: CardOffer, rule: &MerchantRule, is_best_choice: bool) -> Self {
        Self {
            card,
            is_best_choice,
            merchant_reward_value: Some(rule.reward_value),
            merchant_reward_unit: Some(rule.reward_unit.clone()),
            merchant_notes: rule.notes.clone(),
        }
    }

    /// Get display string for logging
    pub fn display(&self) -> String {
        match (self.merchant_reward_value, &self.merchant_reward_unit) {
            (Some(value), Some(unit)) => format!(
                "{} - {}{}{}",
                self.card.display_name(),
                value,
                unit,
                if self.is_best_choice { " [best]" } else { "" }
            ),
            _ => format!("{} - {}%", self.card.display_name(), self.card.reward_rate),
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Which lookup strategy produced a ranking result.
///
/// Merchant-rule matches and the generic filtered fallback are ranked by
/// different keys; keeping them tagged lets each be tested on its own and
/// collapses to one ordered sequence at the boundary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum SearchOutcome {
    /// At least one merchant rule matched the query
    MerchantMatch(Vec<RankedCard>),
    /// No merchant rule matched; generic conjunctive filter search
    GenericMatch(Vec<RankedCard>),
}

impl SearchOutcome {
    pub fn is_merchant_match(&self) -> bool {
        matches!(self, SearchOutcome::MerchantMatch(_))
    }

    /// Borrow the ordered entries regardless of strategy
    pub fn results(&self) -> &[RankedCard] {
        match self {
            SearchOutcome::MerchantMatch(cards) => cards,
            SearchOutcome::GenericMatch(cards) => cards,
        }
    }

    /// Collapse to the ordered sequence the presentation layer renders
    pub fn into_results(self) -> Vec<RankedCard> {
        match self {
            SearchOutcome::MerchantMatch(cards) => cards,
            SearchOutcome::GenericMatch(cards) => cards,
        }
    }

    pub fn len(&self) -> usize {
        self.results().len()
    }

    pub fn is_empty(&self) -> bool {
        self.results().is_empty()
    }

    /// First best-choice entry, if any rule produced one
    pub fn best_choice(&self) -> Option<&RankedCard> {
        self.results().iter().find(|c| c.is_best_choice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CardCategory, RewardType};
    use chrono::Utc;

    fn card(id: i64, name: &str) -> CardOffer {
        CardOffer::new(id, name, "HDFC", CardCategory::Premium, RewardType::Points)
    }

    fn rule(card_id: i64, value: f64) -> MerchantRule {
        MerchantRule {
            id: 1,
            merchant: "Zomato".to_string(),
            card_id,
            reward_value: value,
            reward_unit: "%".to_string(),
            notes: Some("5X reward points via SmartBuy".to_string()),
            effective_rate: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_ranked_card_from_rule() {
        let ranked = RankedCard::from_rule(card(1, "HDFC Infinia"), &rule(1, 16.6), true);
        assert!(ranked.is_best_choice);
        assert_eq!(ranked.merchant_reward_value, Some(16.6));
        assert_eq!(ranked.merchant_reward_unit.as_deref(), Some("%"));
        assert!(ranked.merchant_notes.is_some());
    }

    #[test]
    fn test_generic_entry_has_no_merchant_fields() {
        let ranked = RankedCard::generic(card(2, "SBI Elite"));
        assert!(!ranked.is_best_choice);
        assert!(ranked.merchant_reward_value.is_none());
        assert!(ranked.merchant_reward_unit.is_none());
        assert!(ranked.merchant_notes.is_none());
    }

    #[test]
    fn test_wire_field_names() {
        let ranked = RankedCard::from_rule(card(1, "HDFC Infinia"), &rule(1, 16.6), true);
        let json = ranked.to_json().unwrap();
        assert!(json.contains("\"isBestChoice\":true"));
        assert!(json.contains("\"merchantRewardValue\":16.6"));
        assert!(json.contains("\"merchantRewardUnit\":\"%\""));
        assert!(json.contains("\"merchantNotes\""));
        // card fields stay snake_case
        assert!(json.contains("\"annual_fee\""));
        assert!(json.contains("\"reward_rate\""));

        let generic = RankedCard::generic(card(2, "SBI Elite"));
        let json = generic.to_json().unwrap();
        assert!(!json.contains("merchantRewardValue"));
    }

    #[test]
    fn test_outcome_collapse() {
        let outcome = SearchOutcome::MerchantMatch(vec![
            RankedCard::from_rule(card(1, "HDFC Infinia"), &rule(1, 16.6), true),
            RankedCard::generic(card(2, "SBI Elite")),
        ]);
        assert!(outcome.is_merchant_match());
        assert_eq!(outcome.len(), 2);
        assert_eq!(outcome.best_choice().unwrap().card.id, 1);

        let results = outcome.into_results();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].card.name, "HDFC Infinia");
    }

    #[test]
    fn test_generic_outcome_has_no_best_choice() {
        let outcome = SearchOutcome::GenericMatch(vec![RankedCard::generic(card(2, "SBI Elite"))]);
        assert!(!outcome.is_merchant_match());
        assert!(outcome.best_choice().is_none());
        assert!(!outcome.is_empty());
    }
}
