use async_trait::async_trait;
use futures_util::future::join4;

use super::{banners, cell, degrade, money, Resource, Screen, Table};
use crate::models::commissions::LevelDistribution;
use crate::models::dashboard::{AdminStats, TransferStats};
use crate::models::notifications::Notification;
use crate::repositories::dashboard::DashboardRepository;
use crate::repositories::notifications::NotificationRepository;
use crate::repositories::transfers::TransferRepository;

pub const MAX_VISIBLE_NOTIFICATIONS: usize = 3;

/// Level distribution with the figures the rank reward chart derives.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LevelChart {
    pub levels: Vec<LevelDistribution>,
}

impl LevelChart {
    pub fn total_members(&self) -> u64 {
        self.levels.iter().map(|l| l.count).sum()
    }

    pub fn total_earnings(&self) -> f64 {
        self.levels.iter().map(|l| l.amount).sum()
    }

    fn level(&self, level: u32) -> Option<&LevelDistribution> {
        self.levels.iter().find(|l| l.level == level)
    }

    /// Members at `level` relative to the most populated level, in percent.
    pub fn progress_percentage(&self, level: u32) -> f64 {
        let max = self.levels.iter().map(|l| l.count).max().unwrap_or(0);
        match self.level(level) {
            Some(l) if max > 0 => l.count as f64 / max as f64 * 100.0,
            _ => 0.0,
        }
    }

    /// Share of all earnings paid at `level`, in percent.
    pub fn earnings_percentage(&self, level: u32) -> f64 {
        let total = self.total_earnings();
        match self.level(level) {
            Some(l) if total > 0.0 => l.amount / total * 100.0,
            _ => 0.0,
        }
    }
}

pub struct DashboardView {
    dashboard_repo: DashboardRepository,
    transfers_repo: TransferRepository,
    notifications_repo: NotificationRepository,
    pub stats: Resource<AdminStats>,
    pub levels: Resource<LevelChart>,
    pub transfers: Resource<TransferStats>,
    pub notifications: Resource<Vec<Notification>>,
    pub show_all_notifications: bool,
}

impl DashboardView {
    pub fn new(
        dashboard_repo: DashboardRepository,
        transfers_repo: TransferRepository,
        notifications_repo: NotificationRepository,
    ) -> Self {
        Self {
            dashboard_repo,
            transfers_repo,
            notifications_repo,
            stats: Resource::Idle,
            levels: Resource::Idle,
            transfers: Resource::Idle,
            notifications: Resource::Idle,
            show_all_notifications: false,
        }
    }

    pub async fn load(&mut self) {
        self.stats.start();
        self.levels.start();
        self.transfers.start();
        self.notifications.start();

        let (stats, levels, transfers, notifications) = join4(
            self.dashboard_repo.admin_stats(),
            self.dashboard_repo.admin_commissions(),
            self.transfers_repo.admin_stats(),
            self.notifications_repo.list_admin(),
        )
        .await;

        self.stats.settle(degrade("admin stats", stats));
        self.levels
            .settle(degrade("level distribution", levels).map(|levels| LevelChart { levels }));
        self.transfers.settle(degrade("transfer stats", transfers));
        self.notifications.settle(degrade("notifications", notifications));
    }

    /// The first three notifications unless the panel is expanded.
    pub fn visible_notifications(&self) -> &[Notification] {
        let all = self.notifications.data().map(Vec::as_slice).unwrap_or(&[]);
        if self.show_all_notifications {
            all
        } else {
            &all[..all.len().min(MAX_VISIBLE_NOTIFICATIONS)]
        }
    }

    fn load_error(&self) -> Option<&str> {
        self.stats
            .error()
            .or_else(|| self.levels.error())
            .or_else(|| self.transfers.error())
            .or_else(|| self.notifications.error())
    }

    fn render_stats(&self, out: &mut String) {
        let stats = self.stats.data().copied().unwrap_or_default();
        let transfers = self.transfers.data().copied().unwrap_or_default();

        out.push_str(&format!(
            "Users: {} (verified {})  Pending requests: {}\n",
            cell(stats.total_users),
            cell(stats.verified_users),
            cell(stats.pending_requests)
        ));
        out.push_str(&format!(
            "Deposits: {}  Withdrawals: {}  Daily revenue: {}\n",
            money(stats.total_deposits),
            money(stats.total_withdrawals),
            money(stats.daily_revenue)
        ));
        out.push_str(&format!(
            "Transfers: total {}  today {}  this month {}\n\n",
            money(transfers.total),
            money(transfers.today),
            money(transfers.month)
        ));
    }
}

#[async_trait]
impl Screen for DashboardView {
    fn title(&self) -> &'static str {
        "Dashboard"
    }

    async fn refresh(&mut self) {
        self.load().await;
    }

    fn render(&self) -> String {
        let mut out = banners(self.load_error(), None);
        self.render_stats(&mut out);

        if let Some(chart) = self.levels.data() {
            out.push_str(&format!(
                "Rank rewards: {} members, {} earned\n",
                chart.total_members(),
                money(Some(chart.total_earnings()))
            ));
            let mut table = Table::new(["Level", "Members", "Earnings", "Per member", "Members %", "Earnings %"]);
            for level in &chart.levels {
                table.row([
                    level.level.to_string(),
                    level.count.to_string(),
                    money(Some(level.amount)),
                    money(Some(level.reward_per_member())),
                    format!("{:.1}", chart.progress_percentage(level.level)),
                    format!("{:.1}", chart.earnings_percentage(level.level)),
                ]);
            }
            out.push_str(&table.to_string());
            out.push('\n');
        }

        out.push_str("Notifications\n");
        for n in self.visible_notifications() {
            let marker = if n.is_new { "*" } else { " " };
            out.push_str(&format!(
                "{} {} {}  {}\n",
                marker,
                n.icon(),
                n.message,
                cell(n.time.as_deref())
            ));
        }
        let total = self.notifications.data().map(Vec::len).unwrap_or(0);
        if total > MAX_VISIBLE_NOTIFICATIONS && !self.show_all_notifications {
            out.push_str(&format!("  ... {} more\n", total - MAX_VISIBLE_NOTIFICATIONS));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart() -> LevelChart {
        LevelChart {
            levels: vec![
                LevelDistribution { level: 1, count: 10, amount: 300.0, percentage: 0.0 },
                LevelDistribution { level: 2, count: 5, amount: 100.0, percentage: 0.0 },
                LevelDistribution { level: 3, count: 0, amount: 0.0, percentage: 0.0 },
            ],
        }
    }

    #[test]
    fn level_percentages() {
        let chart = chart();
        assert_eq!(chart.total_members(), 15);
        assert_eq!(chart.progress_percentage(1), 100.0);
        assert_eq!(chart.progress_percentage(2), 50.0);
        assert_eq!(chart.earnings_percentage(1), 75.0);
        assert_eq!(chart.earnings_percentage(9), 0.0);
        assert_eq!(chart.levels[2].reward_per_member(), 0.0);
    }

    #[test]
    fn empty_chart_is_all_zero() {
        let chart = LevelChart::default();
        assert_eq!(chart.progress_percentage(1), 0.0);
        assert_eq!(chart.earnings_percentage(1), 0.0);
    }
}
