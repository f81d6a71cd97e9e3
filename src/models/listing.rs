use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether a property is offered for sale or for rent
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ListingType {
    Sale,
    #[default]
    Rent,
}

impl ListingType {
    pub fn as_str(self) -> &'static str {
        match self {
            ListingType::Sale => "sale",
            ListingType::Rent => "rent",
        }
    }
}

/// Editable fields of a listing, as sent to the create/update endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ListingDraft {
    pub name: String,
    pub description: String,
    pub address: String,
    #[serde(rename = "type")]
    pub listing_type: ListingType,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub regular_price: f64,
    pub discount_price: f64,
    pub offer: bool,
    pub parking: bool,
    pub furnished: bool,
    /// Ordered image URLs; the first one is the cover
    pub image_urls: Vec<String>,
}

impl Default for ListingDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            address: String::new(),
            listing_type: ListingType::Rent,
            bedrooms: 1,
            bathrooms: 1,
            regular_price: 50.0,
            discount_price: 0.0,
            offer: false,
            parking: false,
            furnished: false,
            image_urls: Vec::new(),
        }
    }
}

/// A stored listing as returned by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub fields: ListingDraft,
    /// Owner's user id
    pub user_ref: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Listing {
    pub fn into_draft(self) -> ListingDraft {
        self.fields
    }

    pub fn cover_image(&self) -> Option<&str> {
        self.fields.image_urls.first().map(String::as_str)
    }

    /// Price a visitor pays: the discount price while an offer runs
    pub fn display_price(&self) -> f64 {
        if self.fields.offer {
            self.fields.discount_price
        } else {
            self.fields.regular_price
        }
    }

    pub fn discount_amount(&self) -> Option<f64> {
        self.fields
            .offer
            .then(|| self.fields.regular_price - self.fields.discount_price)
    }

    /// Human readable price, e.g. `Rs 1,250 / month` for rentals
    pub fn price_label(&self) -> String {
        let amount = group_thousands(self.display_price().round() as u64);
        match self.fields.listing_type {
            ListingType::Rent => format!("Rs {amount} / month"),
            ListingType::Sale => format!("Rs {amount}"),
        }
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_ref == user_id
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
