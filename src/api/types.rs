use crate::error::ApiError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::form_urlencoded;

/// Listing type filter; `All` matches both sale and rent
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TypeFilter {
    #[default]
    All,
    Rent,
    Sale,
}

impl TypeFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            TypeFilter::All => "all",
            TypeFilter::Rent => "rent",
            TypeFilter::Sale => "sale",
        }
    }

    fn parse(value: &str) -> Self {
        match value {
            "rent" => TypeFilter::Rent,
            "sale" => TypeFilter::Sale,
            _ => TypeFilter::All,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum SortField {
    #[serde(rename = "regularPrice")]
    RegularPrice,
    #[default]
    #[serde(rename = "created_at")]
    CreatedAt,
}

impl SortField {
    pub fn as_str(self) -> &'static str {
        match self {
            SortField::RegularPrice => "regularPrice",
            SortField::CreatedAt => "created_at",
        }
    }

    fn parse(value: &str) -> Self {
        match value {
            "regularPrice" => SortField::RegularPrice,
            _ => SortField::CreatedAt,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    fn parse(value: &str) -> Self {
        match value {
            "asc" => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }
}

/// Search parameters for listing queries
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilter {
    /// Free text matched against listing names
    pub search_term: String,
    #[serde(rename = "type")]
    pub listing_type: TypeFilter,
    pub parking: bool,
    pub furnished: bool,
    pub offer: bool,
    pub sort: SortField,
    pub order: SortOrder,
}

impl SearchFilter {
    /// Query string carrying every filter key, without a leading `?`
    pub fn to_query(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        self.append_pairs(&mut serializer);
        serializer.finish()
    }

    fn append_pairs(&self, serializer: &mut form_urlencoded::Serializer<'_, String>) {
        serializer
            .append_pair("searchTerm", &self.search_term)
            .append_pair("type", self.listing_type.as_str())
            .append_pair("parking", bool_str(self.parking))
            .append_pair("furnished", bool_str(self.furnished))
            .append_pair("offer", bool_str(self.offer))
            .append_pair("sort", self.sort.as_str())
            .append_pair("order", self.order.as_str());
    }
}

/// A filter plus the paging keys understood by `GET /api/listing/get`
///
/// Keys that are absent from the parsed query stay absent when the query is
/// sent on, so `?offer=true&limit=4` reaches the backend unchanged in meaning.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchQuery {
    pub filter: SearchFilter,
    pub start_index: Option<usize>,
    pub limit: Option<usize>,
    present: PresentKeys,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct PresentKeys {
    search_term: bool,
    listing_type: bool,
    parking: bool,
    furnished: bool,
    offer: bool,
    sort: bool,
    order: bool,
}

impl PresentKeys {
    const ALL: Self = Self {
        search_term: true,
        listing_type: true,
        parking: true,
        furnished: true,
        offer: true,
        sort: true,
        order: true,
    };
}

impl SearchQuery {
    /// Parse a browser query string (with or without the leading `?`).
    ///
    /// Missing keys fall back to the defaults of [`SearchFilter`]; booleans are
    /// only true for the literal `"true"`. When a key repeats, the first value wins.
    pub fn parse(query: &str) -> Self {
        let mut parsed = SearchQuery::default();
        let mut seen = Vec::new();

        for (key, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
            if seen.contains(&key) {
                continue;
            }
            match key.as_ref() {
                "searchTerm" => {
                    parsed.filter.search_term = value.to_string();
                    parsed.present.search_term = true;
                }
                "type" => {
                    parsed.filter.listing_type = TypeFilter::parse(&value);
                    parsed.present.listing_type = true;
                }
                "parking" => {
                    parsed.filter.parking = value == "true";
                    parsed.present.parking = true;
                }
                "furnished" => {
                    parsed.filter.furnished = value == "true";
                    parsed.present.furnished = true;
                }
                "offer" => {
                    parsed.filter.offer = value == "true";
                    parsed.present.offer = true;
                }
                "sort" => {
                    parsed.filter.sort = SortField::parse(&value);
                    parsed.present.sort = true;
                }
                "order" => {
                    parsed.filter.order = SortOrder::parse(&value);
                    parsed.present.order = true;
                }
                "startIndex" => parsed.start_index = value.parse().ok(),
                "limit" => parsed.limit = value.parse().ok(),
                _ => {}
            }
            seen.push(key);
        }

        parsed
    }

    /// Query for a freshly submitted filter: every filter key, no paging
    pub fn from_filter(filter: SearchFilter) -> Self {
        Self {
            filter,
            start_index: None,
            limit: None,
            present: PresentKeys::ALL,
        }
    }

    pub fn with_start_index(mut self, start_index: usize) -> Self {
        self.start_index = Some(start_index);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offer(mut self, offer: bool) -> Self {
        self.filter.offer = offer;
        self.present.offer = true;
        self
    }

    pub fn with_type(mut self, listing_type: TypeFilter) -> Self {
        self.filter.listing_type = listing_type;
        self.present.listing_type = true;
        self
    }

    /// Serialize the keys that were present plus any paging keys
    pub fn to_query(&self) -> String {
        let filter = &self.filter;
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        if self.present == PresentKeys::ALL {
            filter.append_pairs(&mut serializer);
        } else {
            if self.present.search_term {
                serializer.append_pair("searchTerm", &filter.search_term);
            }
            if self.present.listing_type {
                serializer.append_pair("type", filter.listing_type.as_str());
            }
            if self.present.parking {
                serializer.append_pair("parking", bool_str(filter.parking));
            }
            if self.present.furnished {
                serializer.append_pair("furnished", bool_str(filter.furnished));
            }
            if self.present.offer {
                serializer.append_pair("offer", bool_str(filter.offer));
            }
            if self.present.sort {
                serializer.append_pair("sort", filter.sort.as_str());
            }
            if self.present.order {
                serializer.append_pair("order", filter.order.as_str());
            }
        }
        if let Some(start_index) = self.start_index {
            serializer.append_pair("startIndex", &start_index.to_string());
        }
        if let Some(limit) = self.limit {
            serializer.append_pair("limit", &limit.to_string());
        }
        serializer.finish()
    }
}

fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// Body of a backend response, split on the `success: false` sentinel
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse<T> {
    Success(T),
    Failure { message: String },
}

impl<T: DeserializeOwned> ApiResponse<T> {
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        if value.get("success").and_then(Value::as_bool) == Some(false) {
            let message = value
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("Request failed")
                .to_string();
            return Ok(ApiResponse::Failure { message });
        }
        serde_json::from_value(value).map(ApiResponse::Success)
    }
}

impl<T> ApiResponse<T> {
    pub fn into_result(self) -> Result<T, ApiError> {
        match self {
            ApiResponse::Success(body) => Ok(body),
            ApiResponse::Failure { message } => Err(ApiError::Application { message }),
        }
    }
}
