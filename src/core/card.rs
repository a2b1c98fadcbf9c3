use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// Reward currency a card earns in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewardType {
    Points,
    Cashback,
    Miles,
}

impl RewardType {
    /// Text form used in the SQL schema and the wire contract
    pub fn as_str(&self) -> &'static str {
        match self {
            RewardType::Points => "points",
            RewardType::Cashback => "cashback",
            RewardType::Miles => "miles",
        }
    }

    /// Parse from the stored text form
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "points" => Some(RewardType::Points),
            "cashback" => Some(RewardType::Cashback),
            "miles" => Some(RewardType::Miles),
            _ => None,
        }
    }
}

/// Spend category a card is positioned for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardCategory {
    Travel,
    Cashback,
    Dining,
    Business,
    Premium,
    Everyday,
    Gas,
    Groceries,
}

impl CardCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardCategory::Travel => "travel",
            CardCategory::Cashback => "cashback",
            CardCategory::Dining => "dining",
            CardCategory::Business => "business",
            CardCategory::Premium => "premium",
            CardCategory::Everyday => "everyday",
            CardCategory::Gas => "gas",
            CardCategory::Groceries => "groceries",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "travel" => Some(CardCategory::Travel),
            "cashback" => Some(CardCategory::Cashback),
            "dining" => Some(CardCategory::Dining),
            "business" => Some(CardCategory::Business),
            "premium" => Some(CardCategory::Premium),
            "everyday" => Some(CardCategory::Everyday),
            "gas" => Some(CardCategory::Gas),
            "groceries" => Some(CardCategory::Groceries),
            _ => None,
        }
    }
}

/// A credit card product in the portfolio
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CardOffer {
    /// Stable catalog identifier (SQLite rowid)
    #[serde(default)]
    pub id: i64,

    /// Card product name
    pub name: String,

    /// Issuing bank or network
    pub issuer: String,

    /// Spend category the card is positioned for
    pub category: CardCategory,

    /// Currency the card rewards in
    pub reward_type: RewardType,

    /// Base reward yield, percentage-like (2.5 = 2.5%)
    pub reward_rate: f64,

    /// Annual fee in the card's home currency
    pub annual_fee: i64,

    /// Signup bonus description
    #[serde(default)]
    pub signup_bonus: String,

    /// Comma-joined tags of merchants/categories this card is good for
    #[serde(default)]
    pub best_for: String,

    /// When the offer was seeded into the catalog
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl CardOffer {
    /// Create a new CardOffer with required fields
    pub fn new(
        id: i64,
        name: impl Into<String>,
        issuer: impl Into<String>,
        category: CardCategory,
        reward_type: RewardType,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            issuer: issuer.into(),
            category,
            reward_type,
            reward_rate: 0.0,
            annual_fee: 0,
            signup_bonus: String::new(),
            best_for: String::new(),
            created_at: Utc::now(),
        }
    }

    /// Case-insensitive membership test against the `best_for` tag list
    pub fn has_tag(&self, tag: &str) -> bool {
        let needle = tag.trim().to_lowercase();
        if needle.is_empty() {
            return false;
        }
        self.best_for
            .split(',')
            .any(|t| t.trim().to_lowercase() == needle)
    }

    /// Whether the card carries no annual fee
    pub fn is_no_fee(&self) -> bool {
        self.annual_fee == 0
    }

    /// Get display name (for logging/UI)
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.name, self.issuer)
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// An override mapping one merchant to one card's actual yield.
///
/// The relationship between merchants and cards is many-to-many: one
/// merchant may have a rule per eligible card, one card a rule per
/// eligible merchant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MerchantRule {
    #[serde(default)]
    pub id: i64,

    /// Merchant name, matched as a case-insensitive substring
    pub merchant: String,

    /// The CardOffer this rule applies to; must resolve in the catalog
    pub card_id: i64,

    /// Authored reward figure, interpreted per `reward_unit`
    pub reward_value: f64,

    /// "%" for percentage, "X" for a multiplier of base points, or a
    /// rate-per-currency label
    pub reward_unit: String,

    /// Free-text caveats (portal requirements, membership tiers)
    #[serde(default)]
    pub notes: Option<String>,

    /// Precomputed effective-yield percentage for non-"%" units, so
    /// multiplier rules rank consistently against plain percentages
    #[serde(default)]
    pub effective_rate: Option<f64>,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl MerchantRule {
    /// The figure ordering and best-choice detection use
    pub fn ranking_yield(&self) -> f64 {
        self.effective_rate.unwrap_or(self.reward_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_card() -> CardOffer {
        let mut card = CardOffer::new(
            1,
            "HDFC Infinia",
            "HDFC",
            CardCategory::Premium,
            RewardType::Points,
        );
        card.reward_rate = 3.3;
        card.annual_fee = 12500;
        card.best_for = "travel,dining,premium,zomato,swiggy".to_string();
        card
    }

    #[test]
    fn test_card_offer_creation() {
        let card = sample_card();
        assert_eq!(card.name, "HDFC Infinia");
        assert_eq!(card.issuer, "HDFC");
        assert_eq!(card.category, CardCategory::Premium);
        assert!(!card.is_no_fee());
    }

    #[test]
    fn test_has_tag() {
        let card = sample_card();
        assert!(card.has_tag("zomato"));
        assert!(card.has_tag("ZOMATO"));
        assert!(card.has_tag(" dining "));
        assert!(!card.has_tag("groceries"));
        assert!(!card.has_tag(""));
    }

    #[test]
    fn test_enum_text_round_trip() {
        for cat in [
            CardCategory::Travel,
            CardCategory::Cashback,
            CardCategory::Dining,
            CardCategory::Business,
            CardCategory::Premium,
            CardCategory::Everyday,
            CardCategory::Gas,
            CardCategory::Groceries,
        ] {
            assert_eq!(CardCategory::parse(cat.as_str()), Some(cat));
        }
        assert_eq!(CardCategory::parse("lounge"), None);
        assert_eq!(RewardType::parse("miles"), Some(RewardType::Miles));
        assert_eq!(RewardType::parse("stars"), None);
    }

    #[test]
    fn test_serialization() {
        let card = sample_card();
        let json = card.to_json().unwrap();
        assert!(json.contains("\"category\":\"premium\""));
        assert!(json.contains("\"reward_type\":\"points\""));
        let deserialized = CardOffer::from_json(&json).unwrap();
        assert_eq!(card.name, deserialized.name);
    }

    #[test]
    fn test_ranking_yield_prefers_effective_rate() {
        let mut rule = MerchantRule {
            id: 1,
            merchant: "Amazon".to_string(),
            card_id: 2,
            reward_value: 5.0,
            reward_unit: "X".to_string(),
            notes: None,
            effective_rate: Some(10.0),
            created_at: Utc::now(),
        };
        assert_eq!(rule.ranking_yield(), 10.0);

        rule.effective_rate = None;
        assert_eq!(rule.ranking_yield(), 5.0);
    }
}
