use async_trait::async_trait;
use chrono::{DateTime, Local};

use super::fortnight::FortnightPeriod;
use super::{banners, cell, money, Resource, Screen, Table};
use crate::models::commissions::TopEarner;
use crate::repositories::commissions::CommissionRepository;

pub const LEADERBOARD_SIZE: usize = 10;

#[derive(Clone, Debug, PartialEq)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub earner: TopEarner,
}

/// Ranks follow the order the backend returns, starting at 1.
pub fn rank(earners: Vec<TopEarner>) -> Vec<LeaderboardEntry> {
    earners
        .into_iter()
        .enumerate()
        .map(|(idx, earner)| LeaderboardEntry { rank: idx + 1, earner })
        .collect()
}

/// Fortnight top earners who share the extra bonus pool.
pub struct LeaderboardView {
    repo: CommissionRepository,
    pub period: FortnightPeriod,
    pub leaders: Resource<Vec<LeaderboardEntry>>,
}

impl LeaderboardView {
    pub fn new(repo: CommissionRepository) -> Self {
        Self {
            repo,
            period: FortnightPeriod::current(),
            leaders: Resource::Idle,
        }
    }

    pub async fn load(&mut self) {
        self.period = FortnightPeriod::current();
        self.load_period(self.period).await;
    }

    pub async fn load_period(&mut self, period: FortnightPeriod) {
        self.period = period;
        self.leaders.start();

        let result = self
            .repo
            .top_earners(period.starts_at(), period.ends_at(), LEADERBOARD_SIZE)
            .await
            .map(rank);
        if let Err(e) = &result {
            log::warn!("Failed to load leaderboard: {}", e);
        }
        self.leaders.settle(result);
    }

    fn entries(&self) -> &[LeaderboardEntry] {
        self.leaders.data().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn total_bonus_pool(&self) -> f64 {
        self.entries().iter().map(|e| e.earner.bonus).sum()
    }

    pub fn qualified_count(&self) -> usize {
        self.entries().iter().filter(|e| e.earner.is_qualified()).count()
    }

    pub fn days_left(&self, now: DateTime<Local>) -> i64 {
        self.period.days_left(now)
    }
}

#[async_trait]
impl Screen for LeaderboardView {
    fn title(&self) -> &'static str {
        "Leaderboard (Fortnight Bonus)"
    }

    async fn refresh(&mut self) {
        self.load().await;
    }

    fn render(&self) -> String {
        let mut out = banners(self.leaders.error(), None);
        out.push_str(&format!(
            "Period: {}  Days left: {}\nBonus pool: {}  Qualified leaders: {}\n\n",
            self.period.label(),
            self.days_left(Local::now()),
            money(Some(self.total_bonus_pool())),
            self.qualified_count()
        ));

        let mut table = Table::new(["Rank", "Name", "Email", "Phone", "Points", "Referrals", "Bonus"]);
        for entry in self.entries() {
            let earner = &entry.earner;
            table.row([
                entry.rank.to_string(),
                cell(earner.name.as_deref()),
                cell(earner.email.as_deref()),
                cell(earner.phone.as_deref()),
                earner.points.to_string(),
                earner.referrals.to_string(),
                money(Some(earner.bonus)),
            ]);
        }
        out.push_str(&table.to_string());
        out
    }
}
