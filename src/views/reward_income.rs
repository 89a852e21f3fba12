use async_trait::async_trait;
use serde_json::Value;

use super::{banners, money, record_action, Resource, Screen};
use crate::models::commissions::CommissionOverview;
use crate::repositories::commissions::CommissionRepository;
use crate::repositories::ApiError;

pub struct RewardIncomeView {
    repo: CommissionRepository,
    pub overview: Resource<CommissionOverview>,
    /// Commission breakdown of one user, as the server reports it.
    pub user_commissions: Option<(String, Value)>,
    pub action_error: Option<String>,
}

impl RewardIncomeView {
    pub fn new(repo: CommissionRepository) -> Self {
        Self {
            repo,
            overview: Resource::Idle,
            user_commissions: None,
            action_error: None,
        }
    }

    pub async fn load(&mut self) {
        self.overview.start();

        let result = self.repo.overall_stats().await;
        if let Err(e) = &result {
            log::warn!("Failed to load reward income: {}", e);
        }
        self.overview.settle(result);
    }

    pub async fn show_user(&mut self, user_id: &str) -> Result<(), ApiError> {
        let breakdown = record_action(&mut self.action_error, self.repo.user_admin(user_id).await)?;
        self.user_commissions = Some((user_id.to_string(), breakdown));
        Ok(())
    }

    /// Loaded figures, or all zeros before a successful load.
    pub fn figures(&self) -> CommissionOverview {
        self.overview.data().copied().unwrap_or_default()
    }
}

#[async_trait]
impl Screen for RewardIncomeView {
    fn title(&self) -> &'static str {
        "Reward Income"
    }

    async fn refresh(&mut self) {
        self.load().await;
    }

    fn render(&self) -> String {
        let figures = self.figures();
        let mut out = banners(self.overview.error(), self.action_error.as_deref());
        out.push_str(&format!(
            "Total rewards sent:    {}\nPending rewards:       {}\nReward recipients:     {}\nRewards today:         {}\n",
            money(Some(figures.total_rewards_sent)),
            money(Some(figures.total_rewards_pending)),
            figures.reward_recipients,
            figures.rewards_today
        ));

        if let Some((user_id, breakdown)) = &self.user_commissions {
            let pretty = serde_json::to_string_pretty(breakdown).unwrap_or_else(|_| breakdown.to_string());
            out.push_str(&format!("\nCommissions for user {user_id}\n{pretty}\n"));
        }
        out
    }
}
