//! Fixed seed portfolio and merchant reward rules.
//!
//! The catalog is seeded once when the schema version advances and is
//! immutable afterwards; no create/update/delete surface exists.

use crate::core::{CardCategory, RewardType};

/// A card offer as authored, before it receives a catalog id
#[derive(Debug, Clone, Copy)]
pub struct SeedCard {
    pub name: &'static str,
    pub issuer: &'static str,
    pub category: CardCategory,
    pub reward_type: RewardType,
    pub reward_rate: f64,
    pub annual_fee: i64,
    pub signup_bonus: &'static str,
    pub best_for: &'static str,
}

/// A merchant rule as authored; referencing its card by name, resolved
/// to an id at seed time
#[derive(Debug, Clone, Copy)]
pub struct SeedRule {
    pub merchant: &'static str,
    pub card_name: &'static str,
    pub reward_value: f64,
    /// "%" for percentage, "X" for a multiplier of base points
    pub reward_unit: &'static str,
    pub notes: Option<&'static str>,
    /// Precomputed effective-yield percentage for non-"%" units
    pub effective_rate: Option<f64>,
}

pub const SEED_CARDS: &[SeedCard] = &[
    // Indian premium cards
    SeedCard {
        name: "HDFC Infinia",
        issuer: "HDFC",
        category: CardCategory::Premium,
        reward_type: RewardType::Points,
        reward_rate: 3.3,
        annual_fee: 12500,
        signup_bonus: "12,500 reward points on joining",
        best_for: "travel,dining,premium,zomato,swiggy",
    },
    SeedCard {
        name: "Amex Gold",
        issuer: "Amex",
        category: CardCategory::Dining,
        reward_type: RewardType::Points,
        reward_rate: 4.0,
        annual_fee: 9000,
        signup_bonus: "4,000 MR points on first transaction",
        best_for: "dining,amazon,online,travel",
    },
    SeedCard {
        name: "HDFC Diners Club Black",
        issuer: "HDFC",
        category: CardCategory::Premium,
        reward_type: RewardType::Points,
        reward_rate: 3.3,
        annual_fee: 10000,
        signup_bonus: "10,000 reward points on joining",
        best_for: "travel,dining,premium",
    },
    SeedCard {
        name: "SBI Elite",
        issuer: "SBI",
        category: CardCategory::Premium,
        reward_type: RewardType::Points,
        reward_rate: 2.0,
        annual_fee: 4999,
        signup_bonus: "Welcome vouchers worth Rs 5,000",
        best_for: "travel,movies,dining",
    },
    SeedCard {
        name: "ICICI Amazon Pay",
        issuer: "ICICI",
        category: CardCategory::Cashback,
        reward_type: RewardType::Cashback,
        reward_rate: 5.0,
        annual_fee: 0,
        signup_bonus: "Rs 500 Amazon Pay cashback",
        best_for: "amazon,online,everyday",
    },
    // US cards
    SeedCard {
        name: "Chase Sapphire Preferred",
        issuer: "Chase",
        category: CardCategory::Travel,
        reward_type: RewardType::Points,
        reward_rate: 2.5,
        annual_fee: 95,
        signup_bonus: "60,000 points after $4k spend in 3 months",
        best_for: "travel,dining",
    },
    SeedCard {
        name: "Chase Sapphire Reserve",
        issuer: "Chase",
        category: CardCategory::Travel,
        reward_type: RewardType::Points,
        reward_rate: 3.0,
        annual_fee: 550,
        signup_bonus: "60,000 points after $4k spend in 3 months",
        best_for: "travel,dining,premium",
    },
    SeedCard {
        name: "American Express Platinum",
        issuer: "Amex",
        category: CardCategory::Premium,
        reward_type: RewardType::Points,
        reward_rate: 1.0,
        annual_fee: 695,
        signup_bonus: "80,000 points after $8k spend in 6 months",
        best_for: "travel,premium,lounges",
    },
    SeedCard {
        name: "American Express Gold",
        issuer: "Amex",
        category: CardCategory::Dining,
        reward_type: RewardType::Points,
        reward_rate: 4.0,
        annual_fee: 250,
        signup_bonus: "60,000 points after $6k spend in 6 months",
        best_for: "dining,groceries",
    },
    SeedCard {
        name: "Citi Double Cash",
        issuer: "Citi",
        category: CardCategory::Cashback,
        reward_type: RewardType::Cashback,
        reward_rate: 2.0,
        annual_fee: 0,
        signup_bonus: "None",
        best_for: "everyday,cashback",
    },
    SeedCard {
        name: "Capital One Venture X",
        issuer: "Capital One",
        category: CardCategory::Travel,
        reward_type: RewardType::Miles,
        reward_rate: 2.0,
        annual_fee: 395,
        signup_bonus: "75,000 miles after $4k spend in 3 months",
        best_for: "travel,everyday",
    },
];

/// Merchant-specific reward rules. These override the base card reward
/// rates for specific merchants; "X" rules carry a precomputed effective
/// yield so they rank against plain percentages.
pub const SEED_RULES: &[SeedRule] = &[
    // HDFC Infinia - 5X points on Zomato = 16.6% value
    SeedRule {
        merchant: "Zomato",
        card_name: "HDFC Infinia",
        reward_value: 16.6,
        reward_unit: "%",
        notes: Some("5X reward points on Zomato via SmartBuy"),
        effective_rate: None,
    },
    SeedRule {
        merchant: "Swiggy",
        card_name: "HDFC Infinia",
        reward_value: 16.6,
        reward_unit: "%",
        notes: Some("5X reward points on Swiggy via SmartBuy"),
        effective_rate: None,
    },
    // Amex Gold - 5X MR points on Amazon, ~10% effective at 2% point value
    SeedRule {
        merchant: "Amazon",
        card_name: "Amex Gold",
        reward_value: 5.0,
        reward_unit: "X",
        notes: Some("5X Membership Rewards points on Amazon"),
        effective_rate: Some(10.0),
    },
    // ICICI Amazon Pay - 5% on Amazon for Prime members
    SeedRule {
        merchant: "Amazon",
        card_name: "ICICI Amazon Pay",
        reward_value: 5.0,
        reward_unit: "%",
        notes: Some("5% cashback for Prime members, 3% for non-Prime"),
        effective_rate: None,
    },
    // HDFC Diners Club Black - 10X on dining partners
    SeedRule {
        merchant: "Zomato",
        card_name: "HDFC Diners Club Black",
        reward_value: 13.0,
        reward_unit: "%",
        notes: Some("10X reward points on Zomato"),
        effective_rate: None,
    },
];
