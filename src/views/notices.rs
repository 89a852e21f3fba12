use async_trait::async_trait;

use super::{banners, cell, record_action, ListQuery, Resource, Screen, Searchable, Table};
use crate::models::notices::{Notice, NoticeDraft};
use crate::repositories::notices::NoticeRepository;
use crate::repositories::ApiError;

impl Searchable for Notice {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![self.title.as_deref(), self.content.as_deref()]
    }
}

pub struct NoticesView {
    repo: NoticeRepository,
    pub notices: Resource<Vec<Notice>>,
    pub query: ListQuery,
    /// Load only what `/notices/active` publishes.
    pub active_only: bool,
    pub action_error: Option<String>,
}

impl NoticesView {
    pub fn new(repo: NoticeRepository) -> Self {
        Self {
            repo,
            notices: Resource::Idle,
            query: ListQuery::default(),
            active_only: false,
            action_error: None,
        }
    }

    pub async fn load(&mut self) {
        self.notices.start();

        let result = if self.active_only {
            self.repo.list_active().await
        } else {
            self.repo.list().await
        };
        if let Err(e) = &result {
            log::warn!("Failed to load notices: {}", e);
        }
        self.notices.settle(result);
    }

    fn all(&self) -> &[Notice] {
        self.notices.data().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn rows(&self) -> Vec<&Notice> {
        self.query.apply(self.all())
    }

    pub fn active_count(&self) -> usize {
        self.all().iter().filter(|n| n.is_active).count()
    }

    pub fn active_phone_count(&self) -> usize {
        self.all().iter().filter(|n| n.is_active && n.is_phone()).count()
    }

    pub async fn create(&mut self, draft: &NoticeDraft) -> Result<(), ApiError> {
        record_action(&mut self.action_error, self.repo.create(draft).await)?;
        self.load().await;
        Ok(())
    }

    pub async fn update(&mut self, id: &str, draft: &NoticeDraft) -> Result<(), ApiError> {
        record_action(&mut self.action_error, self.repo.update(id, draft).await)?;
        self.load().await;
        Ok(())
    }

    pub async fn delete(&mut self, id: &str) -> Result<(), ApiError> {
        record_action(&mut self.action_error, self.repo.delete(id).await)?;
        self.load().await;
        Ok(())
    }

    /// Flips the active flag of a loaded notice.
    pub async fn toggle_active(&mut self, id: &str) -> Result<(), ApiError> {
        let active = match self.all().iter().find(|n| n.id == id) {
            Some(notice) => notice.is_active,
            None => {
                let e = ApiError::Validation(format!("Notice {id} is not loaded"));
                return record_action(&mut self.action_error, Err(e));
            }
        };

        let draft = NoticeDraft {
            is_active: Some(!active),
            ..Default::default()
        };
        self.update(id, &draft).await
    }
}

#[async_trait]
impl Screen for NoticesView {
    fn title(&self) -> &'static str {
        "Notices"
    }

    async fn refresh(&mut self) {
        self.load().await;
    }

    fn render(&self) -> String {
        let mut out = banners(self.notices.error(), self.action_error.as_deref());
        if self.active_only {
            out.push_str("Showing published notices only\n");
        }
        out.push_str(&format!(
            "Notices: {}  Active: {}  Active phone: {}\n\n",
            self.all().len(),
            self.active_count(),
            self.active_phone_count()
        ));

        let mut table = Table::new(["ID", "Type", "Title", "Priority", "Active", "Created"]);
        for notice in self.rows() {
            table.row([
                notice.id.clone(),
                cell(notice.kind.as_deref()),
                cell(notice.title.as_deref()),
                cell(notice.priority.as_deref()),
                if notice.is_active { "yes" } else { "no" }.to_string(),
                cell(notice.created_date.as_deref()),
            ]);
        }
        out.push_str(&table.to_string());
        out
    }

    fn set_search(&mut self, text: &str) {
        self.query.search = text.to_string();
    }
}
