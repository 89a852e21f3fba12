use async_trait::async_trait;
use futures_util::future::join3;

use super::{banners, cell, degrade, money, record_action, ListQuery, Resource, Screen, Searchable, StatusFilter, Table};
use crate::models::ads::{Ad, AdDraft};
use crate::models::taxonomy::{Category, Location, TaxonomyEntry};
use crate::repositories::ads::AdRepository;
use crate::repositories::taxonomy::{CategoryRepository, LocationRepository};
use crate::repositories::ApiError;

impl Searchable for Ad {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![self.title.as_deref(), self.description.as_deref()]
    }

    fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AdTotals {
    pub views: u64,
    pub clicks: u64,
    pub active: usize,
}

pub struct AdsView {
    ads_repo: AdRepository,
    categories_repo: CategoryRepository,
    locations_repo: LocationRepository,
    pub ads: Resource<Vec<Ad>>,
    pub categories: Resource<Vec<Category>>,
    pub locations: Resource<Vec<Location>>,
    pub query: ListQuery,
    pub action_error: Option<String>,
}

impl AdsView {
    pub fn new(
        ads_repo: AdRepository,
        categories_repo: CategoryRepository,
        locations_repo: LocationRepository,
    ) -> Self {
        Self {
            ads_repo,
            categories_repo,
            locations_repo,
            ads: Resource::Idle,
            categories: Resource::Idle,
            locations: Resource::Idle,
            query: ListQuery::default(),
            action_error: None,
        }
    }

    pub async fn load(&mut self) {
        self.ads.start();
        self.categories.start();
        self.locations.start();

        let (ads, categories, locations) = join3(
            self.ads_repo.list(),
            self.categories_repo.list(),
            self.locations_repo.list(),
        )
        .await;

        self.ads.settle(degrade("ads", ads));
        self.categories.settle(degrade("categories", categories));
        self.locations.settle(degrade("locations", locations));
    }

    fn all(&self) -> &[Ad] {
        self.ads.data().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn rows(&self) -> Vec<&Ad> {
        self.query.apply(self.all())
    }

    pub fn find(&self, id: &str) -> Option<&Ad> {
        self.all().iter().find(|ad| ad.id == id)
    }

    pub fn totals(&self) -> AdTotals {
        let all = self.all();

        AdTotals {
            views: all.iter().filter_map(|ad| ad.views).sum(),
            clicks: all.iter().filter_map(|ad| ad.clicks).sum(),
            active: all.iter().filter(|ad| ad.is_active()).count(),
        }
    }

    pub async fn create(&mut self, draft: &AdDraft) -> Result<(), ApiError> {
        record_action(&mut self.action_error, self.ads_repo.create(draft).await)?;
        self.load().await;
        Ok(())
    }

    pub async fn update(&mut self, id: &str, draft: &AdDraft) -> Result<(), ApiError> {
        record_action(&mut self.action_error, self.ads_repo.update(id, draft).await)?;
        self.load().await;
        Ok(())
    }

    /// Active ads are rejected; anything else is approved.
    pub async fn toggle_status(&mut self, id: &str) -> Result<(), ApiError> {
        let active = self.find(id).is_some_and(Ad::is_active);
        let result = if active {
            self.ads_repo.reject(id).await
        } else {
            self.ads_repo.approve(id).await
        };

        record_action(&mut self.action_error, result)?;
        self.load().await;
        Ok(())
    }

    pub async fn feature(&mut self, id: &str) -> Result<(), ApiError> {
        record_action(&mut self.action_error, self.ads_repo.feature(id).await)?;
        self.load().await;
        Ok(())
    }

    pub async fn delete(&mut self, id: &str) -> Result<(), ApiError> {
        record_action(&mut self.action_error, self.ads_repo.delete(id).await)?;
        self.load().await;
        Ok(())
    }

    fn taxonomy_name<'a>(entries: &'a Resource<Vec<TaxonomyEntry>>, id: Option<&'a str>) -> Option<&'a str> {
        let id = id?;
        entries
            .data()
            .and_then(|list| list.iter().find(|e| e.id == id))
            .map(|e| e.name.as_str())
            .or(Some(id))
    }
}

#[async_trait]
impl Screen for AdsView {
    fn title(&self) -> &'static str {
        "Ads Manager"
    }

    async fn refresh(&mut self) {
        self.load().await;
    }

    fn render(&self) -> String {
        let totals = self.totals();
        let load_error = self
            .ads
            .error()
            .or_else(|| self.categories.error())
            .or_else(|| self.locations.error());
        let mut out = banners(load_error, self.action_error.as_deref());
        out.push_str(&format!(
            "Ads: {}  Active: {}  Views: {}  Clicks: {}\n\n",
            self.all().len(),
            totals.active,
            totals.views,
            totals.clicks
        ));

        let mut table = Table::new([
            "ID", "Title", "Placement", "Category", "Location", "Price", "Views", "Clicks", "Status",
        ]);
        for ad in self.rows() {
            table.row([
                ad.id.clone(),
                cell(ad.title.as_deref()),
                cell(ad.placement.as_deref()),
                cell(Self::taxonomy_name(&self.categories, ad.category_id.as_deref())),
                cell(Self::taxonomy_name(&self.locations, ad.location_id.as_deref())),
                money(ad.price),
                cell(ad.views),
                cell(ad.clicks),
                cell(ad.status.as_deref()),
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
