use serde_json::Value;

use super::Money;
use crate::normalize::{extract_list_with, first_f64, first_str, first_u64, id_of, unwrap_envelope};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BonusBreakdown {
    pub bonus_number: u64,
    pub threshold_reached: u64,
    pub bonus_amount: f64,
    pub description: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BonusRules {
    pub first_bonus_threshold: u64,
    pub subsequent_bonus_threshold: u64,
    pub bonus_amount: Money,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DailyBonusStatus {
    pub today_referrals: u64,
    pub bonus_awarded: bool,
    pub bonus_awarded_count: u64,
    pub bonus_awarded_amount: Option<Money>,
    pub potential_count: u64,
    pub potential_amount: Option<Money>,
    pub breakdown: Vec<BonusBreakdown>,
    pub to_next_bonus: u64,
    pub referrals_needed: u64,
    pub rules: Option<BonusRules>,
}

impl DailyBonusStatus {
    pub fn from_api(value: &Value) -> Self {
        let status = unwrap_envelope(value);
        let potential = status.get("potentialBonus").unwrap_or(&Value::Null);
        let progress = status.get("progress").unwrap_or(&Value::Null);

        let breakdown = potential
            .get("breakdown")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .map(|item| BonusBreakdown {
                        bonus_number: first_u64(item, &["bonusNumber"]).unwrap_or(0),
                        threshold_reached: first_u64(item, &["thresholdReached"]).unwrap_or(0),
                        bonus_amount: first_f64(item, &["bonusAmount"]).unwrap_or(0.0),
                        description: first_str(item, &["description"]),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let rules = status.get("bonusRules").filter(|r| r.is_object()).map(|rules| BonusRules {
            first_bonus_threshold: first_u64(rules, &["firstBonusThreshold"]).unwrap_or(0),
            subsequent_bonus_threshold: first_u64(rules, &["subsequentBonusThreshold"])
                .unwrap_or(0),
            bonus_amount: Money::from_api(rules.get("bonusAmount")).unwrap_or_default(),
        });

        Self {
            today_referrals: first_u64(status, &["todayReferrals"]).unwrap_or(0),
            bonus_awarded: status.get("bonusAwarded").and_then(Value::as_bool) == Some(true),
            bonus_awarded_count: first_u64(status, &["bonusAwardedCount"]).unwrap_or(0),
            bonus_awarded_amount: Money::from_api(status.get("bonusAwardedAmount")),
            potential_count: first_u64(potential, &["count"]).unwrap_or(0),
            potential_amount: Money::from_api(potential.get("amount")),
            breakdown,
            to_next_bonus: first_u64(progress, &["toNextBonus"]).unwrap_or(0),
            referrals_needed: first_u64(progress, &["referralsNeeded"]).unwrap_or(0),
            rules,
        }
    }

    pub fn awarded_today_pkr(&self) -> f64 {
        self.bonus_awarded_amount.map(|m| m.pkr).unwrap_or(0.0)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DailyBonusHistoryItem {
    pub id: Option<String>,
    pub bonus_date: Option<String>,
    pub referrals_count: u64,
    pub bonus_count: u64,
    pub bonus_amount: Money,
    pub created_at: Option<String>,
}

impl DailyBonusHistoryItem {
    /// History is served as `{ bonuses }` or `{ data: { bonuses } }`.
    pub fn list_from_api(value: &Value) -> Vec<Self> {
        extract_list_with(value, &["bonuses", "items", "rows"])
            .iter()
            .map(Self::from_api)
            .collect()
    }

    pub fn from_api(value: &Value) -> Self {
        Self {
            id: id_of(value),
            bonus_date: first_str(value, &["bonusDate", "bonus_date"]),
            referrals_count: first_u64(value, &["referralsCount"]).unwrap_or(0),
            bonus_count: first_u64(value, &["bonusCount"]).unwrap_or(0),
            bonus_amount: Money::from_api(value.get("bonusAmount")).unwrap_or_default(),
            created_at: first_str(value, &["createdAt", "created_at"]),
        }
    }

    /// Date text the history search matches against.
    pub fn date_text(&self) -> &str {
        self.bonus_date
            .as_deref()
            .or(self.created_at.as_deref())
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_defaults_safely() {
        let status = DailyBonusStatus::from_api(&json!({}));
        assert_eq!(status.today_referrals, 0);
        assert!(!status.bonus_awarded);
        assert_eq!(status.awarded_today_pkr(), 0.0);
        assert!(status.rules.is_none());
    }

    #[test]
    fn status_reads_nested_fields() {
        let status = DailyBonusStatus::from_api(&json!({ "data": {
            "todayReferrals": 7,
            "bonusAwarded": true,
            "bonusAwardedCount": 2,
            "bonusAwardedAmount": { "pkr": 600, "usd": 2.1 },
            "potentialBonus": {
                "count": 1,
                "amount": { "pkr": 300, "usd": 1.05 },
                "breakdown": [{ "bonusNumber": 1, "thresholdReached": 3, "bonusAmount": 300, "description": "3 Direct" }]
            },
            "progress": { "toNextBonus": 2, "referralsNeeded": 2 },
            "bonusRules": { "firstBonusThreshold": 3, "subsequentBonusThreshold": 3, "bonusAmount": { "pkr": 300, "usd": 1.05 } }
        }}));
        assert_eq!(status.today_referrals, 7);
        assert!(status.bonus_awarded);
        assert_eq!(status.awarded_today_pkr(), 600.0);
        assert_eq!(status.potential_count, 1);
        assert_eq!(status.breakdown.len(), 1);
        assert_eq!(status.referrals_needed, 2);
        assert_eq!(status.rules.map(|r| r.first_bonus_threshold), Some(3));
    }

    #[test]
    fn history_in_either_envelope() {
        let bare = DailyBonusHistoryItem::list_from_api(&json!({ "bonuses": [{ "bonusDate": "2025-02-01" }] }));
        let nested = DailyBonusHistoryItem::list_from_api(
            &json!({ "data": { "bonuses": [{ "bonusDate": "2025-02-01" }] } }),
        );
        assert_eq!(bare, nested);
        assert_eq!(bare[0].date_text(), "2025-02-01");
    }
}
