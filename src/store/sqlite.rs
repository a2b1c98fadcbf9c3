use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row, ToSql};
use std::sync::{Arc, Mutex};

use crate::core::{CardCategory, CardOffer, MerchantRule, RewardType};
use crate::engine::SearchFilters;
use crate::error::Result;
use crate::query::NormalizedQuery;
use crate::store::seed::{SEED_CARDS, SEED_RULES};
use crate::store::{CardStore, CatalogStats, MerchantMatch, BEST_FOR_LIMIT};

/// Current schema version. Opening a database with an older version
/// drops both tables and reseeds; a current database is left untouched.
const SCHEMA_VERSION: i64 = 4;

const CARD_COLUMNS: &str =
    "id, name, issuer, category, reward_type, reward_rate, annual_fee, signup_bonus, best_for, created_at";

/// SQLite-backed card catalog and merchant rule table.
///
/// Schema:
/// ```sql
/// CREATE TABLE card_offers (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     name TEXT NOT NULL,
///     issuer TEXT NOT NULL,
///     category TEXT NOT NULL,
///     reward_type TEXT NOT NULL,
///     reward_rate REAL NOT NULL,
///     annual_fee INTEGER NOT NULL,
///     signup_bonus TEXT NOT NULL,
///     best_for TEXT NOT NULL,
///     created_at TEXT NOT NULL
/// );
/// CREATE TABLE merchant_rules (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     merchant TEXT NOT NULL COLLATE NOCASE,
///     card_id INTEGER NOT NULL REFERENCES card_offers(id),
///     reward_value REAL NOT NULL,
///     reward_unit TEXT NOT NULL DEFAULT '%',
///     notes TEXT,
///     effective_rate REAL,
///     created_at TEXT NOT NULL
/// );
/// ```
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) a store at `db_path`, seeding on first run.
    /// Pass `":memory:"` for an ephemeral store.
    pub async fn open(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        migrate(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

fn migrate(conn: &Connection) -> Result<()> {
    let current: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    if current >= SCHEMA_VERSION {
        return Ok(());
    }

    tracing::info!(
        "schema version {} behind {}, reseeding catalog",
        current,
        SCHEMA_VERSION
    );

    conn.execute_batch(
        "DROP TABLE IF EXISTS merchant_rules;
         DROP TABLE IF EXISTS card_offers;

         CREATE TABLE card_offers (
             id INTEGER PRIMARY KEY AUTOINCREMENT,
             name TEXT NOT NULL,
             issuer TEXT NOT NULL,
             category TEXT NOT NULL,
             reward_type TEXT NOT NULL,
             reward_rate REAL NOT NULL,
             annual_fee INTEGER NOT NULL,
             signup_bonus TEXT NOT NULL,
             best_for TEXT NOT NULL,
             created_at TEXT NOT NULL
         );

         CREATE INDEX idx_card_offers_category ON card_offers(category);
         CREATE INDEX idx_card_offers_reward_type ON card_offers(reward_type);
         CREATE INDEX idx_card_offers_annual_fee ON card_offers(annual_fee);
         CREATE INDEX idx_card_offers_issuer ON card_offers(issuer);

         CREATE TABLE merchant_rules (
             id INTEGER PRIMARY KEY AUTOINCREMENT,
             merchant TEXT NOT NULL COLLATE NOCASE,
             card_id INTEGER NOT NULL,
             reward_value REAL NOT NULL,
             reward_unit TEXT NOT NULL DEFAULT '%',
             notes TEXT,
             effective_rate REAL,
             created_at TEXT NOT NULL,
             FOREIGN KEY (card_id) REFERENCES card_offers(id)
         );

         CREATE INDEX idx_merchant_rules_merchant ON merchant_rules(merchant);
         CREATE INDEX idx_merchant_rules_card_id ON merchant_rules(card_id);",
    )?;

    seed(conn)?;

    conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    Ok(())
}

fn seed(conn: &Connection) -> Result<()> {
    let now = Utc::now().to_rfc3339();

    let mut insert_card = conn.prepare(
        "INSERT INTO card_offers (name, issuer, category, reward_type, reward_rate, annual_fee, signup_bonus, best_for, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    )?;
    for card in SEED_CARDS {
        insert_card.execute(params![
            card.name,
            card.issuer,
            card.category.as_str(),
            card.reward_type.as_str(),
            card.reward_rate,
            card.annual_fee,
            card.signup_bonus,
            card.best_for,
            now,
        ])?;
    }

    let mut insert_rule = conn.prepare(
        "INSERT INTO merchant_rules (merchant, card_id, reward_value, reward_unit, notes, effective_rate, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?;
    for rule in SEED_RULES {
        let card_id: Option<i64> = conn
            .query_row(
                "SELECT id FROM card_offers WHERE name = ?1",
                params![rule.card_name],
                |row| row.get(0),
            )
            .optional()?;

        match card_id {
            Some(card_id) => {
                insert_rule.execute(params![
                    rule.merchant,
                    card_id,
                    rule.reward_value,
                    rule.reward_unit,
                    rule.notes,
                    rule.effective_rate,
                    now,
                ])?;
            }
            None => {
                tracing::warn!(
                    "seed rule for '{}' references unknown card '{}', skipping",
                    rule.merchant,
                    rule.card_name
                );
            }
        }
    }

    Ok(())
}

fn invalid_column(idx: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, message.into())
}

fn parse_timestamp(text: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// Map card columns starting at `base` (non-zero in joined selects)
fn card_from_row(row: &Row<'_>, base: usize) -> rusqlite::Result<CardOffer> {
    let category_text: String = row.get(base + 3)?;
    let category = CardCategory::parse(&category_text)
        .ok_or_else(|| invalid_column(base + 3, format!("unknown category '{category_text}'")))?;

    let reward_text: String = row.get(base + 4)?;
    let reward_type = RewardType::parse(&reward_text)
        .ok_or_else(|| invalid_column(base + 4, format!("unknown reward type '{reward_text}'")))?;

    let created_at_text: String = row.get(base + 9)?;

    Ok(CardOffer {
        id: row.get(base)?,
        name: row.get(base + 1)?,
        issuer: row.get(base + 2)?,
        category,
        reward_type,
        reward_rate: row.get(base + 5)?,
        annual_fee: row.get(base + 6)?,
        signup_bonus: row.get(base + 7)?,
        best_for: row.get(base + 8)?,
        created_at: parse_timestamp(&created_at_text),
    })
}

fn match_from_row(row: &Row<'_>) -> rusqlite::Result<MerchantMatch> {
    let created_at_text: String = row.get(7)?;
    let rule = MerchantRule {
        id: row.get(0)?,
        merchant: row.get(1)?,
        card_id: row.get(2)?,
        reward_value: row.get(3)?,
        reward_unit: row.get(4)?,
        notes: row.get(5)?,
        effective_rate: row.get(6)?,
        created_at: parse_timestamp(&created_at_text),
    };
    let card = card_from_row(row, 8)?;
    Ok(MerchantMatch::new(rule, card))
}

#[async_trait]
impl CardStore for SqliteStore {
    async fn search_cards(&self, filters: &SearchFilters) -> Result<Vec<CardOffer>> {
        let conn = self.conn.lock().unwrap();

        let query = filters.normalized_query();
        let pattern = query.like_pattern();
        let category = filters.category.map(|c| c.as_str().to_string());
        let reward_type = filters.reward_type.map(|r| r.as_str().to_string());
        let max_fee = filters.max_annual_fee;
        let min_rate = filters.min_reward_rate;

        let mut conditions: Vec<&str> = Vec::new();
        let mut bindings: Vec<(&str, &dyn ToSql)> = Vec::new();

        if !query.is_empty() {
            conditions.push(
                "(name LIKE :query ESCAPE '\\' OR issuer LIKE :query ESCAPE '\\' \
                 OR best_for LIKE :query ESCAPE '\\' OR signup_bonus LIKE :query ESCAPE '\\')",
            );
            bindings.push((":query", &pattern));
        }
        if let Some(ref category) = category {
            conditions.push("category = :category");
            bindings.push((":category", category));
        }
        if let Some(ref reward_type) = reward_type {
            conditions.push("reward_type = :reward_type");
            bindings.push((":reward_type", reward_type));
        }
        if let Some(ref max_fee) = max_fee {
            conditions.push("annual_fee <= :max_fee");
            bindings.push((":max_fee", max_fee));
        }
        if let Some(ref min_rate) = min_rate {
            conditions.push("reward_rate >= :min_rate");
            bindings.push((":min_rate", min_rate));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let sql = format!(
            "SELECT {CARD_COLUMNS} FROM card_offers {where_clause} \
             ORDER BY reward_rate DESC, annual_fee ASC"
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(bindings.as_slice(), |row| card_from_row(row, 0))?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    async fn merchant_matches(&self, query: &NormalizedQuery) -> Result<Vec<MerchantMatch>> {
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(
            "SELECT m.id, m.merchant, m.card_id, m.reward_value, m.reward_unit, m.notes, m.effective_rate, m.created_at,
                    c.id, c.name, c.issuer, c.category, c.reward_type, c.reward_rate, c.annual_fee, c.signup_bonus, c.best_for, c.created_at
             FROM merchant_rules m
             JOIN card_offers c ON c.id = m.card_id
             WHERE m.merchant LIKE ?1 ESCAPE '\\'
             ORDER BY COALESCE(m.effective_rate, m.reward_value) DESC, c.annual_fee ASC",
        )?;
        let rows = stmt.query_map(params![query.like_pattern()], match_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    async fn cards_tagged(
        &self,
        query: &NormalizedQuery,
        exclude_ids: &[i64],
    ) -> Result<Vec<CardOffer>> {
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let conn = self.conn.lock().unwrap();

        let mut sql =
            format!("SELECT {CARD_COLUMNS} FROM card_offers WHERE best_for LIKE ? ESCAPE '\\'");
        let mut values: Vec<Value> = vec![Value::Text(query.like_pattern())];

        if !exclude_ids.is_empty() {
            let placeholders = vec!["?"; exclude_ids.len()].join(", ");
            sql.push_str(&format!(" AND id NOT IN ({placeholders})"));
            values.extend(exclude_ids.iter().map(|id| Value::Integer(*id)));
        }
        sql.push_str(" ORDER BY reward_rate DESC, annual_fee ASC");

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values), |row| card_from_row(row, 0))?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    async fn categories(&self) -> Result<Vec<String>> {
        let conn = self.conn.lock().unwrap();

        let mut stmt =
            conn.prepare("SELECT DISTINCT category FROM card_offers ORDER BY category")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    async fn best_for_category(&self, category: &str) -> Result<Vec<CardOffer>> {
        let conn = self.conn.lock().unwrap();

        let pattern = NormalizedQuery::new(category).like_pattern();
        let mut stmt = conn.prepare(&format!(
            "SELECT {CARD_COLUMNS} FROM card_offers
             WHERE category = ?1 OR best_for LIKE ?2 ESCAPE '\\'
             ORDER BY reward_rate DESC, annual_fee ASC
             LIMIT ?3"
        ))?;
        let rows = stmt.query_map(params![category, pattern, BEST_FOR_LIMIT as i64], |row| {
            card_from_row(row, 0)
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    async fn stats(&self) -> Result<CatalogStats> {
        let conn = self.conn.lock().unwrap();

        let total_cards: u64 =
            conn.query_row("SELECT COUNT(*) FROM card_offers", [], |row| row.get(0))?;
        let total_rules: u64 =
            conn.query_row("SELECT COUNT(*) FROM merchant_rules", [], |row| row.get(0))?;
        let schema_version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

        Ok(CatalogStats {
            total_cards,
            total_rules,
            schema_version,
        })
    }
}
