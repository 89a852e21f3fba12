use serde_json::{json, Map, Value};

use crate::normalize::{first_f64, first_number, first_str, id_of};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Ad {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub link: Option<String>,
    pub status: Option<String>,
    pub placement: Option<String>,
    pub views: Option<u64>,
    pub clicks: Option<u64>,
    pub price: Option<f64>,
    pub category_id: Option<String>,
    pub location_id: Option<String>,
    pub created_at: Option<String>,
}

impl Ad {
    pub fn from_api(value: &Value) -> Self {
        let primary_image = value
            .get("images")
            .and_then(Value::as_array)
            .and_then(|images| images.first());
        let image_url = first_str(value, &["imageUrl", "image_url"]).or_else(|| {
            primary_image.and_then(|image| first_str(image, &["image_url", "thumbnail_url"]))
        });

        Self {
            id: id_of(value).unwrap_or_default(),
            title: first_str(value, &["title"]),
            description: first_str(value, &["description"]),
            image_url,
            link: first_str(value, &["link", "external_url", "url"]),
            status: first_str(value, &["status"]),
            placement: first_str(value, &["placement", "position", "ad_placement"]),
            views: first_number(value, &["views", "views_count"]).map(|v| v as u64),
            clicks: first_number(value, &["clicks", "clicks_count"]).map(|v| v as u64),
            price: first_f64(value, &["price"]),
            category_id: first_str(value, &["category_id", "categoryId"]),
            location_id: first_str(value, &["location_id", "locationId"]),
            created_at: first_str(value, &["createdAt", "created_at"]),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.as_deref() == Some("active")
    }
}

/// Form contents for creating or editing an ad.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AdDraft {
    pub title: String,
    pub description: String,
    pub link: Option<String>,
    pub placement: Option<String>,
    pub image_url: Option<String>,
    pub price: Option<f64>,
    pub category_id: Option<String>,
    pub location_id: Option<String>,
}

impl AdDraft {
    /// Required-field checks matching the backend ad model.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() || self.description.trim().is_empty() {
            return Err("Title and description are required".to_string());
        }

        let missing = |v: &Option<String>| v.as_deref().map_or(true, |s| s.trim().is_empty());
        if missing(&self.category_id) || missing(&self.location_id) {
            return Err("Category and Location are required".to_string());
        }

        match self.price {
            Some(price) if price.is_finite() => Ok(()),
            _ => Err("Price is required".to_string()),
        }
    }

    pub fn to_body(&self) -> Value {
        let mut body = Map::new();
        body.insert("title".into(), json!(self.title));
        body.insert("description".into(), json!(self.description));
        if let Some(link) = &self.link {
            body.insert("external_url".into(), json!(link));
        }
        if let Some(placement) = &self.placement {
            body.insert("placement".into(), json!(placement));
        }
        if let Some(price) = self.price {
            body.insert("price".into(), json!(price));
        }
        if let Some(category_id) = &self.category_id {
            body.insert("category_id".into(), json!(category_id));
        }
        if let Some(location_id) = &self.location_id {
            body.insert("location_id".into(), json!(location_id));
        }
        if let Some(image_url) = self.image_url.as_deref().filter(|u| !u.is_empty()) {
            body.insert("images".into(), json!([{ "image_url": image_url }]));
        }

        Value::Object(body)
    }
}

impl From<&Ad> for AdDraft {
    fn from(ad: &Ad) -> Self {
        Self {
            title: ad.title.clone().unwrap_or_default(),
            description: ad.description.clone().unwrap_or_default(),
            link: ad.link.clone(),
            placement: ad.placement.clone(),
            image_url: ad.image_url.clone(),
            price: ad.price,
            category_id: ad.category_id.clone(),
            location_id: ad.location_id.clone(),
        }
    }
}
