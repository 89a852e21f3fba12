use serde_json::Value;

use crate::normalize::{first_f64, first_number, first_str, first_u64, unwrap_envelope};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TopEarner {
    pub user_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub points: f64,
    pub referrals: u64,
    pub bonus: f64,
}

impl TopEarner {
    pub fn from_api(value: &Value) -> Self {
        Self {
            user_id: first_str(value, &["userId", "user_id"]),
            name: first_str(value, &["name"]),
            email: first_str(value, &["email"]),
            phone: first_str(value, &["phone"]),
            points: first_f64(value, &["commissionCount", "points"]).unwrap_or(0.0),
            referrals: first_u64(value, &["totalReferrals", "referrals"]).unwrap_or(0),
            bonus: first_f64(value, &["totalEarned", "bonus"]).unwrap_or(0.0),
        }
    }

    pub fn is_qualified(&self) -> bool {
        self.bonus > 0.0
    }
}

/// Figures shown on the reward income screen; each falls back to zero.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CommissionOverview {
    pub total_rewards_sent: f64,
    pub total_rewards_pending: f64,
    pub reward_recipients: u64,
    pub rewards_today: u64,
}

impl CommissionOverview {
    pub fn from_api(value: &Value) -> Self {
        let stats = unwrap_envelope(value);

        Self {
            total_rewards_sent: first_number(stats, &["totalRewardsSent"]).unwrap_or(0.0),
            total_rewards_pending: first_number(stats, &["totalRewardsPending"]).unwrap_or(0.0),
            reward_recipients: first_number(stats, &["rewardRecipients"])
                .map(|v| v as u64)
                .unwrap_or(0),
            rewards_today: first_number(stats, &["rewardsToday"])
                .map(|v| v as u64)
                .unwrap_or(0),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LevelDistribution {
    pub level: u32,
    pub count: u64,
    pub amount: f64,
    pub percentage: f64,
}

impl LevelDistribution {
    pub fn list_from_api(value: &Value) -> Vec<Self> {
        unwrap_envelope(value)
            .get("distributionByLevel")
            .and_then(Value::as_array)
            .map(|levels| levels.iter().map(Self::from_api).collect())
            .unwrap_or_default()
    }

    pub fn from_api(value: &Value) -> Self {
        Self {
            level: first_u64(value, &["level"]).unwrap_or(0) as u32,
            count: first_u64(value, &["count"]).unwrap_or(0),
            amount: first_f64(value, &["amount"]).unwrap_or(0.0),
            percentage: first_f64(value, &["percentage"]).unwrap_or(0.0),
        }
    }

    pub fn reward_per_member(&self) -> f64 {
        if self.count > 0 {
            self.amount / self.count as f64
        } else {
            0.0
        }
    }
}
