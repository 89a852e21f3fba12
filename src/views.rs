pub mod account_requests;
pub mod ads;
pub mod bonus;
pub mod dashboard;
pub mod deposits;
pub mod fortnight;
pub mod leaderboard;
pub mod notices;
pub mod reward_income;
pub mod users;
pub mod withdrawals;

use std::fmt;

use async_trait::async_trait;

use crate::normalize::PLACEHOLDER;
use crate::repositories::ApiError;

/// One dashboard screen as driven by the console.
#[async_trait]
pub trait Screen: Send {
    fn title(&self) -> &'static str;

    /// Refetches every source the screen shows.
    async fn refresh(&mut self);

    fn render(&self) -> String;

    fn set_search(&mut self, _text: &str) {}

    fn set_status(&mut self, _filter: StatusFilter) {}

    fn set_page(&mut self, _page: usize) {}
}

/// Stores a failed mutation as the action banner, clearing it on success.
pub(crate) fn record_action<T>(
    banner: &mut Option<String>,
    result: Result<T, ApiError>,
) -> Result<T, ApiError> {
    match result {
        Ok(value) => {
            *banner = None;
            Ok(value)
        }
        Err(e) => {
            log::warn!("Action failed: {}", e);
            *banner = Some(e.to_string());
            Err(e)
        }
    }
}

/// Logs a degraded sub-request and turns it into a banner.
pub(crate) fn degrade<T>(source: &str, result: Result<T, ApiError>) -> Result<T, String> {
    result.map_err(|e| {
        log::warn!("Failed to load {}: {}", source, e);
        e.to_string()
    })
}

/// Load state of one remote data source.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Resource<T> {
    #[default]
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Resource<T> {
    pub fn start(&mut self) {
        *self = Resource::Loading;
    }

    pub fn succeed(&mut self, value: T) {
        *self = Resource::Ready(value);
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        *self = Resource::Failed(message.into());
    }

    /// Applies a fetch result, turning errors into the banner text.
    pub fn settle<E: fmt::Display>(&mut self, result: Result<T, E>) {
        match result {
            Ok(value) => self.succeed(value),
            Err(e) => self.fail(e.to_string()),
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Resource::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Resource::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Resource::Loading)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(String),
}

impl StatusFilter {
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() || text == "all" {
            StatusFilter::All
        } else {
            StatusFilter::Only(text.to_string())
        }
    }

    pub fn matches(&self, status: Option<&str>) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => status == Some(wanted.as_str()),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => write!(f, "all"),
            StatusFilter::Only(status) => write!(f, "{status}"),
        }
    }
}

/// A record a list screen can search and filter.
pub trait Searchable {
    /// Fields the free-text search looks at.
    fn search_fields(&self) -> Vec<Option<&str>>;

    fn status(&self) -> Option<&str> {
        None
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub search: String,
    pub status: StatusFilter,
}

impl ListQuery {
    pub fn matches<T: Searchable>(&self, item: &T) -> bool {
        self.matches_search(item) && self.status.matches(item.status())
    }

    fn matches_search<T: Searchable>(&self, item: &T) -> bool {
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        item.search_fields()
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    pub fn apply<'a, T: Searchable>(&self, items: &'a [T]) -> Vec<&'a T> {
        items.iter().filter(|item| self.matches(*item)).collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Paginator {
    pub page_size: usize,
}

impl Paginator {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
        }
    }

    pub fn total_pages(&self, len: usize) -> usize {
        len.div_ceil(self.page_size).max(1)
    }

    pub fn clamp(&self, len: usize, page: usize) -> usize {
        page.clamp(1, self.total_pages(len))
    }

    /// The 1-based `page` of `items`; out-of-range pages are clamped.
    pub fn page<'a, T>(&self, items: &'a [T], page: usize) -> &'a [T] {
        let page = self.clamp(items.len(), page);
        let start = (page - 1) * self.page_size;
        let end = (start + self.page_size).min(items.len());

        items.get(start..end).unwrap_or(&[])
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(10)
    }
}

/// Plain-text table used by every screen.
#[derive(Clone, Debug, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn row<I, S>(&mut self, cells: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                let len = cell.chars().count();
                match widths.get_mut(i) {
                    Some(w) => *w = (*w).max(len),
                    None => widths.push(len),
                }
            }
        }

        write_line(f, &widths, &self.headers)?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        write_line(f, &widths, &rule)?;
        for row in &self.rows {
            write_line(f, &widths, row)?;
        }
        if self.rows.is_empty() {
            writeln!(f, "(no records)")?;
        }

        Ok(())
    }
}

fn write_line(f: &mut fmt::Formatter<'_>, widths: &[usize], cells: &[String]) -> fmt::Result {
    let padded: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(i, &w)| format!("{:<w$}", cells.get(i).map(String::as_str).unwrap_or("")))
        .collect();
    writeln!(f, "{}", padded.join("  ").trim_end())
}

/// Cell text for an optional value.
pub fn cell<T: fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| PLACEHOLDER.to_string())
}

pub fn money(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Banner lines shared by the screens: load failure first, then the last
/// action failure.
pub fn banners(load_error: Option<&str>, action_error: Option<&str>) -> String {
    let mut out = String::new();
    if let Some(e) = load_error {
        out.push_str(&format!("! {e}\n"));
    }
    if let Some(e) = action_error {
        out.push_str(&format!("! {e}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        name: &'static str,
        email: Option<&'static str>,
        status: &'static str,
    }

    impl Searchable for Row {
        fn search_fields(&self) -> Vec<Option<&str>> {
            vec![Some(self.name), self.email]
        }

        fn status(&self) -> Option<&str> {
            Some(self.status)
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { name: "Ayesha Khan", email: Some("ayesha@pakads.pk"), status: "pending" },
            Row { name: "Bilal", email: None, status: "approved" },
            Row { name: "Sana", email: Some("KHAN.sana@mail.com"), status: "pending" },
        ]
    }

    #[test]
    fn empty_query_is_identity() {
        let rows = rows();
        let query = ListQuery::default();
        assert_eq!(query.apply(&rows).len(), rows.len());
    }

    #[test]
    fn search_is_case_insensitive_over_both_fields() {
        let rows = rows();
        let query = ListQuery {
            search: "khan".into(),
            status: StatusFilter::All,
        };
        let names: Vec<_> = query.apply(&rows).iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["Ayesha Khan", "Sana"]);
    }

    #[test]
    fn status_filter_all_and_exact() {
        assert_eq!(StatusFilter::parse("all"), StatusFilter::All);
        assert_eq!(StatusFilter::parse(""), StatusFilter::All);

        let rows = rows();
        let query = ListQuery {
            search: String::new(),
            status: StatusFilter::parse("pending"),
        };
        assert_eq!(query.apply(&rows).len(), 2);
        assert!(!StatusFilter::parse("Pending").matches(Some("pending")));
    }

    #[test]
    fn pagination_of_23_records() {
        let items: Vec<u32> = (1..=23).collect();
        let pager = Paginator::new(10);
        assert_eq!(pager.total_pages(items.len()), 3);
        assert_eq!(pager.page(&items, 3), &[21, 22, 23]);
        assert_eq!(pager.page(&items, 1).len(), 10);
        assert_eq!(pager.page(&items, 9), &[21, 22, 23]);
        assert_eq!(pager.page(&items, 0).first(), Some(&1));
    }

    #[test]
    fn empty_list_has_one_page() {
        let pager = Paginator::default();
        let items: Vec<u32> = Vec::new();
        assert_eq!(pager.total_pages(0), 1);
        assert!(pager.page(&items, 1).is_empty());
    }

    #[test]
    fn resource_transitions() {
        let mut resource: Resource<u32> = Resource::default();
        assert_eq!(resource, Resource::Idle);
        resource.start();
        assert!(resource.is_loading());
        resource.succeed(3);
        assert_eq!(resource.data(), Some(&3));
        resource.start();
        assert_eq!(resource.data(), None);
        resource.settle(Err(ApiError::Status {
            status: 500,
            message: "Boom".into(),
        }));
        assert_eq!(resource.error(), Some("Boom (HTTP 500)"));
    }

    #[test]
    fn table_pads_columns() {
        let mut table = Table::new(["ID", "Name"]);
        table.row(["1", "Ayesha"]).row(["22", cell::<&str>(None).as_str()]);
        let text = table.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "ID  Name");
        assert_eq!(lines[2], "1   Ayesha");
        assert_eq!(lines[3], "22  —");
    }
}
