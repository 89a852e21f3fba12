use async_trait::async_trait;
use futures_util::future::join;

use super::{banners, degrade, money, record_action, ListQuery, Resource, Screen, Searchable, Table};
use crate::models::daily_bonus::{DailyBonusHistoryItem, DailyBonusStatus};
use crate::repositories::daily_bonus::DailyBonusRepository;
use crate::repositories::ApiError;

pub const HISTORY_PAGE: u32 = 1;
pub const HISTORY_LIMIT: u32 = 20;

impl Searchable for DailyBonusHistoryItem {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![Some(self.date_text())]
    }
}

/// Today's daily referral bonus status with the award history.
pub struct BonusView {
    repo: DailyBonusRepository,
    pub status: Resource<DailyBonusStatus>,
    pub history: Resource<Vec<DailyBonusHistoryItem>>,
    pub query: ListQuery,
    pub action_error: Option<String>,
}

impl BonusView {
    pub fn new(repo: DailyBonusRepository) -> Self {
        Self {
            repo,
            status: Resource::Idle,
            history: Resource::Idle,
            query: ListQuery::default(),
            action_error: None,
        }
    }

    pub async fn load(&mut self) {
        self.status.start();
        self.history.start();

        let (status, history) = join(
            self.repo.status(),
            self.repo.history(HISTORY_PAGE, HISTORY_LIMIT),
        )
        .await;

        self.status.settle(degrade("bonus status", status));
        self.history.settle(degrade("bonus history", history));
    }

    pub fn rows(&self) -> Vec<&DailyBonusHistoryItem> {
        let history = self.history.data().map(Vec::as_slice).unwrap_or(&[]);
        self.query.apply(history)
    }

    pub async fn check_and_award(&mut self) -> Result<(), ApiError> {
        record_action(&mut self.action_error, self.repo.check_and_award().await)?;
        self.load().await;
        Ok(())
    }

    fn render_status(status: &DailyBonusStatus) -> String {
        let mut out = format!(
            "Today's referrals: {}  Awarded: {} ({} bonuses, PKR {})\n",
            status.today_referrals,
            if status.bonus_awarded { "yes" } else { "no" },
            status.bonus_awarded_count,
            money(Some(status.awarded_today_pkr()))
        );
        out.push_str(&format!(
            "Potential bonuses: {}  Next bonus in: {} referrals\n",
            status.potential_count, status.to_next_bonus
        ));
        if let Some(rules) = &status.rules {
            out.push_str(&format!(
                "Rules: first bonus at {} referrals, then every {}; PKR {} / USD {} each\n",
                rules.first_bonus_threshold,
                rules.subsequent_bonus_threshold,
                money(Some(rules.bonus_amount.pkr)),
                money(Some(rules.bonus_amount.usd))
            ));
        }
        for item in &status.breakdown {
            out.push_str(&format!(
                "  #{} at {} referrals: {}\n",
                item.bonus_number,
                item.threshold_reached,
                money(Some(item.bonus_amount))
            ));
        }
        out
    }
}

#[async_trait]
impl Screen for BonusView {
    fn title(&self) -> &'static str {
        "Bonus"
    }

    async fn refresh(&mut self) {
        self.load().await;
    }

    fn render(&self) -> String {
        let load_error = self.status.error().or_else(|| self.history.error());
        let mut out = banners(load_error, self.action_error.as_deref());
        if let Some(status) = self.status.data() {
            out.push_str(&Self::render_status(status));
            out.push('\n');
        }

        let mut table = Table::new(["Date", "Referrals", "Bonuses", "PKR", "USD"]);
        for item in self.rows() {
            table.row([
                item.date_text().to_string(),
                item.referrals_count.to_string(),
                item.bonus_count.to_string(),
                money(Some(item.bonus_amount.pkr)),
                money(Some(item.bonus_amount.usd)),
            ]);
        }
        out.push_str(&table.to_string());
        out
    }

    fn set_search(&mut self, text: &str) {
        self.query.search = text.to_string();
    }
}
