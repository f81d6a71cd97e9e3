use crate::api::{ListingApi, SearchQuery, TypeFilter};
use crate::models::Listing;
use tracing::warn;

const ROW_LIMIT: usize = 4;

/// The three rows of the landing page
#[derive(Debug, Default)]
pub struct HomeFeed {
    pub offers: Vec<Listing>,
    pub rent: Vec<Listing>,
    pub sale: Vec<Listing>,
}

impl HomeFeed {
    pub fn offer_query() -> SearchQuery {
        SearchQuery::default().with_offer(true).with_limit(ROW_LIMIT)
    }

    pub fn rent_query() -> SearchQuery {
        SearchQuery::default()
            .with_type(TypeFilter::Rent)
            .with_limit(ROW_LIMIT)
    }

    pub fn sale_query() -> SearchQuery {
        SearchQuery::default()
            .with_type(TypeFilter::Sale)
            .with_limit(ROW_LIMIT)
    }

    /// Fetch all rows; a row that fails stays empty
    pub async fn load(api: &dyn ListingApi) -> Self {
        let (offer_query, rent_query, sale_query) =
            (Self::offer_query(), Self::rent_query(), Self::sale_query());
        let (offers, rent, sale) = tokio::join!(
            load_row(api, "offer", &offer_query),
            load_row(api, "rent", &rent_query),
            load_row(api, "sale", &sale_query),
        );
        Self { offers, rent, sale }
    }

    /// Cover images of the offer row, for the landing carousel
    pub fn carousel(&self) -> Vec<&str> {
        self.offers.iter().filter_map(Listing::cover_image).collect()
    }
}

async fn load_row(api: &dyn ListingApi, row: &str, query: &SearchQuery) -> Vec<Listing> {
    match api.search_listings(query).await {
        Ok(listings) => listings,
        Err(err) => {
            warn!("Could not load {} listings: {}", row, err);
            Vec::new()
        }
    }
}
