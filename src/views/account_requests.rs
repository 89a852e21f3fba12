use async_trait::async_trait;
use futures_util::future::join3;

use super::{banners, cell, degrade, record_action, ListQuery, Resource, Screen, Searchable, StatusFilter, Table};
use crate::models::approvals::{ApprovalStats, ApprovalUser};
use crate::repositories::approvals::ApprovalRepository;
use crate::repositories::ApiError;

impl Searchable for ApprovalUser {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![self.name.as_deref(), self.email.as_deref()]
    }

    fn status(&self) -> Option<&str> {
        Some(&self.status)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RequestCounts {
    pub pending: u64,
    pub approved: u64,
    pub rejected: u64,
}

/// Pending and approved sign-ups awaiting an admin decision.
pub struct AccountRequestsView {
    repo: ApprovalRepository,
    pub pending: Resource<Vec<ApprovalUser>>,
    pub approved: Resource<Vec<ApprovalUser>>,
    pub stats: Resource<ApprovalStats>,
    pub query: ListQuery,
    pub action_error: Option<String>,
}

impl AccountRequestsView {
    pub fn new(repo: ApprovalRepository) -> Self {
        Self {
            repo,
            pending: Resource::Idle,
            approved: Resource::Idle,
            stats: Resource::Idle,
            query: ListQuery::default(),
            action_error: None,
        }
    }

    pub async fn load(&mut self) {
        self.pending.start();
        self.approved.start();
        self.stats.start();

        let (pending, approved, stats) = join3(
            self.repo.list_pending(),
            self.repo.list_approved(),
            self.repo.stats(),
        )
        .await;

        self.pending.settle(degrade("pending users", pending));
        self.approved.settle(degrade("approved users", approved));
        self.stats.settle(degrade("approval stats", stats));
    }

    /// Pending first, then approved; sources that failed contribute nothing.
    pub fn all_users(&self) -> Vec<&ApprovalUser> {
        let pending = self.pending.data().map(Vec::as_slice).unwrap_or(&[]);
        let approved = self.approved.data().map(Vec::as_slice).unwrap_or(&[]);

        pending.iter().chain(approved.iter()).collect()
    }

    pub fn rows(&self) -> Vec<&ApprovalUser> {
        self.all_users()
            .into_iter()
            .filter(|user| self.query.matches(*user))
            .collect()
    }

    /// Server counts when available, otherwise counted from the lists.
    pub fn counts(&self) -> RequestCounts {
        let users = self.all_users();
        let listed = |status: &str| users.iter().filter(|u| u.status == status).count() as u64;
        let stats = self.stats.data().copied().unwrap_or_default();

        RequestCounts {
            pending: stats.pending.unwrap_or_else(|| listed("pending")),
            approved: stats.approved.unwrap_or_else(|| listed("approved")),
            rejected: stats.rejected.unwrap_or_else(|| listed("rejected")),
        }
    }

    pub async fn approve(&mut self, id: &str) -> Result<(), ApiError> {
        record_action(&mut self.action_error, self.repo.approve(id).await)?;
        self.load().await;
        Ok(())
    }

    pub async fn reject(&mut self, id: &str) -> Result<(), ApiError> {
        record_action(&mut self.action_error, self.repo.reject(id).await)?;
        self.load().await;
        Ok(())
    }

    fn load_error(&self) -> Option<&str> {
        self.pending
            .error()
            .or_else(|| self.approved.error())
            .or_else(|| self.stats.error())
    }
}

#[async_trait]
impl Screen for AccountRequestsView {
    fn title(&self) -> &'static str {
        "Account Requests"
    }

    async fn refresh(&mut self) {
        self.load().await;
    }

    fn render(&self) -> String {
        let counts = self.counts();
        let mut out = banners(self.load_error(), self.action_error.as_deref());
        out.push_str(&format!(
            "Pending: {}  Approved: {}  Rejected: {}\n\n",
            counts.pending, counts.approved, counts.rejected
        ));

        let mut table = Table::new(["ID", "Name", "Email", "Phone", "CNIC", "Status", "Joined"]);
        for user in self.rows() {
            table.row([
                user.id.clone(),
                cell(user.name.as_deref()),
                cell(user.email.as_deref()),
                cell(user.phone.as_deref()),
                cell(user.cnic.as_deref()),
                user.status.clone(),
                cell(user.created_at.as_deref()),
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
