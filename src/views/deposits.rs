use async_trait::async_trait;

use super::{banners, cell, money, record_action, ListQuery, Paginator, Resource, Screen, Searchable, StatusFilter, Table};
use crate::models::deposits::{Deposit, DepositStats};
use crate::repositories::deposits::DepositRepository;
use crate::repositories::ApiError;

impl Searchable for Deposit {
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

/// Every deposit, paged client-side, with an optional details panel.
pub struct DepositsView {
    repo: DepositRepository,
    paginator: Paginator,
    pub deposits: Resource<Vec<Deposit>>,
    pub query: ListQuery,
    pub page: usize,
    pub details: Option<Deposit>,
    pub action_error: Option<String>,
}

impl DepositsView {
    pub fn new(repo: DepositRepository, page_size: usize) -> Self {
        Self {
            repo,
            paginator: Paginator::new(page_size),
            deposits: Resource::Idle,
            query: ListQuery::default(),
            page: 1,
            details: None,
            action_error: None,
        }
    }

    pub async fn load(&mut self) {
        self.deposits.start();

        let result = self.repo.list_all().await;
        if let Err(e) = &result {
            log::warn!("Failed to load deposits: {}", e);
        }
        self.deposits.settle(result);
    }

    fn all(&self) -> &[Deposit] {
        self.deposits.data().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn filtered(&self) -> Vec<&Deposit> {
        self.query.apply(self.all())
    }

    pub fn total_pages(&self) -> usize {
        self.paginator.total_pages(self.filtered().len())
    }

    /// The current page of the filtered list.
    pub fn visible(&self) -> Vec<&Deposit> {
        let filtered = self.filtered();
        self.paginator.page(&filtered, self.page).to_vec()
    }

    pub fn stats(&self) -> DepositStats {
        DepositStats::from_deposits(self.all())
    }

    pub async fn show(&mut self, id: &str) -> Result<(), ApiError> {
        let deposit = record_action(&mut self.action_error, self.repo.get(id).await)?;
        self.details = Some(deposit);
        Ok(())
    }

    pub fn close_details(&mut self) {
        self.details = None;
    }

    pub async fn approve(&mut self, id: &str) -> Result<(), ApiError> {
        record_action(&mut self.action_error, self.repo.approve(id).await)?;
        self.after_action(id).await;
        Ok(())
    }

    pub async fn reject(&mut self, id: &str, reason: Option<&str>) -> Result<(), ApiError> {
        record_action(&mut self.action_error, self.repo.reject(id, reason).await)?;
        self.after_action(id).await;
        Ok(())
    }

    async fn after_action(&mut self, id: &str) {
        self.load().await;

        if self.details.as_ref().is_some_and(|d| d.id == id) {
            match self.repo.get(id).await {
                Ok(deposit) => self.details = Some(deposit),
                Err(e) => log::warn!("Failed to refresh deposit {}: {}", id, e),
            }
        }
    }

    fn render_details(deposit: &Deposit) -> String {
        let user = deposit.user.clone().unwrap_or_default();
        let lines = [
            ("ID", Some(deposit.id.clone())),
            ("User", user.name),
            ("Email", user.email),
            ("Phone", user.phone),
            ("Amount", deposit.amount.map(|a| format!("{a:.2}"))),
            ("Status", deposit.status.clone()),
            ("Proof", deposit.proof_url.clone()),
            ("Created", deposit.created_at.clone()),
            ("Updated", deposit.updated_at.clone()),
            ("Approved", deposit.approved_at.clone()),
            ("Approved by", deposit.approved_by.clone()),
            ("Rejected", deposit.rejected_at.clone()),
            ("Rejected by", deposit.rejected_by.clone()),
            ("Reason", deposit.rejection_reason.clone()),
        ];

        let mut out = String::from("\nDeposit details\n");
        for (label, value) in lines {
            out.push_str(&format!("  {:<12} {}\n", label, cell(value)));
        }
        out
    }
}

#[async_trait]
impl Screen for DepositsView {
    fn title(&self) -> &'static str {
        "Deposits"
    }

    async fn refresh(&mut self) {
        self.load().await;
    }

    fn render(&self) -> String {
        let stats = self.stats();
        let mut out = banners(self.deposits.error(), self.action_error.as_deref());
        out.push_str(&format!("Total: {}  Pending: {}\n\n", stats.total, stats.pending));

        let mut table = Table::new(["ID", "User", "Email", "Amount", "Status", "Created"]);
        for d in self.visible() {
            let user = d.user.as_ref();
            table.row([
                d.id.clone(),
                cell(user.and_then(|u| u.name.as_deref())),
                cell(user.and_then(|u| u.email.as_deref())),
                money(d.amount),
                cell(d.status.as_deref()),
                cell(d.created_at.as_deref()),
            ]);
        }
        out.push_str(&table.to_string());

        let pages = self.total_pages();
        out.push_str(&format!(
            "Page {} of {}\n",
            self.paginator.clamp(self.filtered().len(), self.page),
            pages
        ));

        if let Some(deposit) = &self.details {
            out.push_str(&Self::render_details(deposit));
        }
        out
    }

    fn set_search(&mut self, text: &str) {
        self.query.search = text.to_string();
        self.page = 1;
    }

    fn set_status(&mut self, filter: StatusFilter) {
        self.query.status = filter;
        self.page = 1;
    }

    fn set_page(&mut self, page: usize) {
        self.page = self.paginator.clamp(self.filtered().len(), page);
    }
}
