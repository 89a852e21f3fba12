use async_trait::async_trait;
use futures_util::future::join;

use super::{banners, cell, degrade, money, record_action, ListQuery, Resource, Screen, Searchable, StatusFilter, Table};
use crate::models::withdrawals::{Withdrawal, WithdrawalStats};
use crate::repositories::withdrawals::WithdrawalRepository;
use crate::repositories::ApiError;

impl Searchable for Withdrawal {
    fn search_fields(&self) -> Vec<Option<&str>> {
        match &self.user {
            Some(user) => vec![user.name.as_deref(), user.email.as_deref()],
            None => Vec::new(),
        }
    }

    fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WithdrawalTotals {
    pub pending_amount: f64,
    pub sent_amount: f64,
    pub pending_count: u64,
}

pub struct WithdrawalsView {
    repo: WithdrawalRepository,
    pub withdrawals: Resource<Vec<Withdrawal>>,
    pub stats: Resource<WithdrawalStats>,
    pub query: ListQuery,
    pub action_error: Option<String>,
}

impl WithdrawalsView {
    pub fn new(repo: WithdrawalRepository) -> Self {
        Self {
            repo,
            withdrawals: Resource::Idle,
            stats: Resource::Idle,
            query: ListQuery::default(),
            action_error: None,
        }
    }

    pub async fn load(&mut self) {
        self.withdrawals.start();
        self.stats.start();

        let (list, stats) = join(self.repo.list_all(), self.repo.stats()).await;
        self.withdrawals.settle(degrade("withdrawals", list));
        self.stats.settle(degrade("withdrawal stats", stats));
    }

    fn all(&self) -> &[Withdrawal] {
        self.withdrawals.data().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn rows(&self) -> Vec<&Withdrawal> {
        self.query.apply(self.all())
    }

    pub fn totals(&self) -> WithdrawalTotals {
        let all = self.all();
        let sum = |status: &str| -> f64 {
            all.iter()
                .filter(|w| w.status_is(status))
                .filter_map(|w| w.amount)
                .sum()
        };
        let listed_pending = all.iter().filter(|w| w.status_is("pending")).count() as u64;

        WithdrawalTotals {
            pending_amount: sum("pending"),
            sent_amount: sum("sent"),
            pending_count: self
                .stats
                .data()
                .and_then(|s| s.pending)
                .unwrap_or(listed_pending),
        }
    }

    pub async fn approve(&mut self, id: &str) -> Result<(), ApiError> {
        record_action(&mut self.action_error, self.repo.approve(id).await)?;
        self.load().await;
        Ok(())
    }

    pub async fn reject(&mut self, id: &str, reason: Option<&str>) -> Result<(), ApiError> {
        record_action(&mut self.action_error, self.repo.reject(id, reason).await)?;
        self.load().await;
        Ok(())
    }

    pub async fn mark_sent(&mut self, id: &str) -> Result<(), ApiError> {
        record_action(&mut self.action_error, self.repo.mark_sent(id).await)?;
        self.load().await;
        Ok(())
    }
}

#[async_trait]
impl Screen for WithdrawalsView {
    fn title(&self) -> &'static str {
        "Withdrawal Requests"
    }

    async fn refresh(&mut self) {
        self.load().await;
    }

    fn render(&self) -> String {
        let totals = self.totals();
        let load_error = self.withdrawals.error().or_else(|| self.stats.error());
        let mut out = banners(load_error, self.action_error.as_deref());
        out.push_str(&format!(
            "Pending: {} ({} requests)  Sent: {}\n\n",
            money(Some(totals.pending_amount)),
            totals.pending_count,
            money(Some(totals.sent_amount))
        ));

        let mut table = Table::new(["ID", "User", "Amount", "Account", "Status", "Requested"]);
        for w in self.rows() {
            table.row([
                w.id.clone(),
                cell(w.user.as_ref().and_then(|u| u.label())),
                money(w.amount),
                cell(w.account_details.as_deref()),
                cell(w.status.as_deref()),
                cell(w.created_at.as_deref()),
            ]);
        }
        out.push_str(&table.to_string());
        out
    }

    fn set_search(&mut self, text: &str) {
        self.query.search = text.to_string();
    }

    fn set_status(&mut self, filter: StatusFilter) {
        self.query.status = filter;
    }
}
