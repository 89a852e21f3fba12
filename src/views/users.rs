use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;

use super::{banners, cell, money, record_action, ListQuery, Resource, Screen, Searchable, StatusFilter, Table};
use crate::models::users::{UserAccount, UserPatch};
use crate::repositories::users::UserRepository;
use crate::repositories::ApiError;

impl Searchable for UserAccount {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![self.name.as_deref(), self.email.as_deref()]
    }

    fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UserTab {
    #[default]
    All,
    Active,
    WithBalance,
}

impl UserTab {
    pub fn includes(&self, user: &UserAccount) -> bool {
        match self {
            UserTab::All => true,
            UserTab::Active => user.is_active(),
            UserTab::WithBalance => user.has_balance(),
        }
    }
}

impl FromStr for UserTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "all" => Ok(UserTab::All),
            "active" => Ok(UserTab::Active),
            "with-balance" | "withBalance" | "balance" => Ok(UserTab::WithBalance),
            other => Err(format!("Unknown user tab: {other}")),
        }
    }
}

impl fmt::Display for UserTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UserTab::All => "all",
            UserTab::Active => "active",
            UserTab::WithBalance => "with-balance",
        };
        write!(f, "{name}")
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TabCounts {
    pub all: usize,
    pub active: usize,
    pub with_balance: usize,
}

pub struct UsersView {
    repo: UserRepository,
    pub users: Resource<Vec<UserAccount>>,
    pub tab: UserTab,
    pub query: ListQuery,
    pub details: Option<UserAccount>,
    pub action_error: Option<String>,
}

impl UsersView {
    pub fn new(repo: UserRepository) -> Self {
        Self {
            repo,
            users: Resource::Idle,
            tab: UserTab::All,
            query: ListQuery::default(),
            details: None,
            action_error: None,
        }
    }

    pub async fn load(&mut self) {
        self.users.start();

        let result = self.repo.list().await;
        if let Err(e) = &result {
            log::warn!("Failed to load users: {}", e);
        }
        self.users.settle(result);
    }

    fn all(&self) -> &[UserAccount] {
        self.users.data().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn rows(&self) -> Vec<&UserAccount> {
        self.all()
            .iter()
            .filter(|user| self.tab.includes(user) && self.query.matches(*user))
            .collect()
    }

    pub fn counts(&self) -> TabCounts {
        let all = self.all();

        TabCounts {
            all: all.len(),
            active: all.iter().filter(|u| UserTab::Active.includes(u)).count(),
            with_balance: all.iter().filter(|u| UserTab::WithBalance.includes(u)).count(),
        }
    }

    /// Fetches one user fresh from the server for the details panel.
    pub async fn show(&mut self, id: &str) -> Result<(), ApiError> {
        let user = record_action(&mut self.action_error, self.repo.get(id).await)?;
        self.details = Some(user);
        Ok(())
    }

    pub async fn update(&mut self, id: &str, patch: &UserPatch) -> Result<(), ApiError> {
        record_action(&mut self.action_error, self.repo.update(id, patch).await)?;
        self.load().await;
        Ok(())
    }

    pub async fn delete(&mut self, id: &str) -> Result<(), ApiError> {
        record_action(&mut self.action_error, self.repo.delete(id).await)?;
        self.load().await;
        Ok(())
    }
}

#[async_trait]
impl Screen for UsersView {
    fn title(&self) -> &'static str {
        "Manage Users"
    }

    async fn refresh(&mut self) {
        self.load().await;
    }

    fn render(&self) -> String {
        let counts = self.counts();
        let mut out = banners(self.users.error(), self.action_error.as_deref());
        out.push_str(&format!(
            "[{}]  all: {}  active: {}  with-balance: {}\n\n",
            self.tab, counts.all, counts.active, counts.with_balance
        ));

        let mut table = Table::new([
            "ID", "Name", "Email", "Phone", "Status", "Verified", "Balance", "Referrals", "Earned",
        ]);
        for user in self.rows() {
            table.row([
                user.id.clone(),
                cell(user.name.as_deref()),
                cell(user.email.as_deref()),
                cell(user.phone.as_deref()),
                cell(user.status.as_deref()),
                cell(user.verified),
                money(user.balance),
                cell(user.referrals_count),
                money(user.total_earned),
            ]);
        }
        out.push_str(&table.to_string());

        if let Some(user) = &self.details {
            out.push_str("\nUser details\n");
            let lines = [
                ("ID", Some(user.id.clone())),
                ("Name", user.name.clone()),
                ("Email", user.email.clone()),
                ("Phone", user.phone.clone()),
                ("Status", user.status.clone()),
                ("Balance", user.balance.map(|b| format!("{b:.2}"))),
                ("Earned", user.total_earned.map(|e| format!("{e:.2}"))),
                ("Joined", user.created_at.clone()),
            ];
            for (label, value) in lines {
                out.push_str(&format!("  {:<8} {}\n", label, cell(value)));
            }
        }
        out
    }

    fn set_search(&mut self, text: &str) {
        self.query.search = text.to_string();
    }

    /// `all`, `active` and `with-balance` pick a tab; other values filter by status.
    fn set_status(&mut self, filter: StatusFilter) {
        match &filter {
            StatusFilter::All => {
                self.tab = UserTab::All;
                self.query.status = StatusFilter::All;
            }
            StatusFilter::Only(name) => match name.parse::<UserTab>() {
                Ok(tab) => {
                    self.tab = tab;
                    self.query.status = StatusFilter::All;
                }
                Err(_) => self.query.status = filter.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tabs_parse() {
        assert_eq!("with-balance".parse::<UserTab>(), Ok(UserTab::WithBalance));
        assert_eq!("all".parse::<UserTab>(), Ok(UserTab::All));
        assert!("banned".parse::<UserTab>().is_err());
    }

    #[test]
    fn tab_membership() {
        let rich = UserAccount {
            id: "1".into(),
            balance: Some(50.0),
            ..Default::default()
        };
        assert!(UserTab::WithBalance.includes(&rich));
        assert!(!UserTab::Active.includes(&rich));
        assert!(UserTab::All.includes(&rich));
    }
}
