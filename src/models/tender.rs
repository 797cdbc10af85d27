use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Tender as published by the backend. The page holds a read-only copy for
/// the duration of a render; field names on the wire are the backend's.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tender {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Buyer_ID", default)]
    pub buyer_id: i64,
    #[serde(rename = "Buyer", default)]
    pub buyer: Option<Buyer>,
    #[serde(rename = "PublishedAt", default)]
    pub published_at: String,
    #[serde(rename = "ClosingAt", default)]
    pub closing_at: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Description", default)]
    pub description: String,
    #[serde(rename = "HeadingImage", default)]
    pub heading_image: String,
    #[serde(rename = "State_ID", default)]
    pub state_id: i64,
    #[serde(rename = "State", default)]
    pub state: Option<State>,
    #[serde(rename = "City_ID", default)]
    pub city_id: i64,
    #[serde(rename = "City", default)]
    pub city: Option<City>,
    #[serde(rename = "Offer", default)]
    pub offer: f64,
    #[serde(rename = "SupplyCategories", default)]
    pub supply_categories: Vec<SupplyCategory>,
    #[serde(rename = "DeletedAt", default)]
    pub deleted_at: Option<String>,
    #[serde(rename = "CreatedAt", default)]
    pub created_at: Option<String>,
    #[serde(rename = "UpdatedAt", default)]
    pub updated_at: Option<String>,
}

impl Tender {
    /// Closing date formatted for display (DD/MM/YYYY), falling back to the
    /// raw value when the backend sends something unparseable.
    pub fn closing_display(&self) -> String {
        let date_part = self.closing_at.get(..10).unwrap_or(&self.closing_at);
        match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
            Ok(date) => date.format("%d/%m/%Y").to_string(),
            Err(_) => self.closing_at.clone(),
        }
    }

    pub fn buyer_name(&self) -> &str {
        self.buyer.as_ref().map(|b| b.name.as_str()).unwrap_or("")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Buyer {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Logo", default)]
    pub logo: String,
    #[serde(rename = "Description", default)]
    pub description: String,
    #[serde(rename = "State_ID", default)]
    pub state_id: i64,
    #[serde(rename = "City_ID", default)]
    pub city_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct State {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Acronym", default)]
    pub acronym: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct City {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "State_ID", default)]
    pub state_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplyCategory {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "Description", default)]
    pub description: String,
}
