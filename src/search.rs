//! Search page state: query-string parsing, fetch on navigation and
//! "show more" pagination.

use crate::api::{ListingApi, SearchFilter, SearchQuery};
use crate::error::ApiError;
use crate::models::Listing;
use crate::routes::Route;
use tracing::{debug, warn};
use url::form_urlencoded;

/// A first page longer than this suggests more results exist
const FIRST_PAGE_MORE_THAN: usize = 8;
/// A follow-up page shorter than this is the last one
const FOLLOW_UP_FULL_PAGE: usize = 9;

#[derive(Debug, Default)]
pub struct SearchController {
    /// Query of the current location; paging re-issues it
    query: SearchQuery,
    /// Sidebar state, edited freely until submitted
    filter: SearchFilter,
    listings: Vec<Listing>,
    loading: bool,
    show_more: bool,
}

impl SearchController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(&self) -> &SearchFilter {
        &self.filter
    }

    pub fn filter_mut(&mut self) -> &mut SearchFilter {
        &mut self.filter
    }

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_more(&self) -> bool {
        self.show_more
    }

    /// React to a location change (including back/forward): reset the sidebar
    /// from the query string and fetch the first page.
    pub async fn navigate(&mut self, api: &dyn ListingApi, query_string: &str) -> Result<(), ApiError> {
        self.query = SearchQuery::parse(query_string);
        self.filter = self.query.filter.clone();
        self.loading = true;
        self.show_more = false;

        let result = api.search_listings(&self.query).await;
        self.loading = false;

        match result {
            Ok(listings) => {
                debug!("Search returned {} listings", listings.len());
                self.show_more = listings.len() > FIRST_PAGE_MORE_THAN;
                self.listings = listings;
                Ok(())
            }
            Err(err) => {
                warn!("Search failed: {}", err);
                self.listings.clear();
                Err(err)
            }
        }
    }

    /// Serialize the sidebar into the search page route; navigating there
    /// triggers the fetch.
    pub fn submit(&self) -> Route {
        Route::Search(self.filter.to_query())
    }

    /// Fetch the next page after the listings already shown and append it.
    ///
    /// Returns how many listings were added.
    pub async fn show_more(&mut self, api: &dyn ListingApi) -> Result<usize, ApiError> {
        let start_index = self.listings.len();
        let query = self.query.clone().with_start_index(start_index);

        let page = api.search_listings(&query).await.map_err(|err| {
            warn!("Loading more listings from {} failed: {}", start_index, err);
            err
        })?;

        if page.len() < FOLLOW_UP_FULL_PAGE {
            self.show_more = false;
        }
        let added = page.len();
        self.listings.extend(page);
        Ok(added)
    }
}

/// Header search box: put `term` into the current query, keeping every other key
pub fn header_search(current_query: &str, term: &str) -> Route {
    let mut pairs: Vec<(String, String)> =
        form_urlencoded::parse(current_query.trim_start_matches('?').as_bytes())
            .into_owned()
            .collect();

    match pairs.iter_mut().find(|(key, _)| key == "searchTerm") {
        Some((_, value)) => *value = term.to_string(),
        None => pairs.push(("searchTerm".to_string(), term.to_string())),
    }

    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();
    Route::Search(query)
}

/// Term to show in the header box for the current location, if any
pub fn header_term(current_query: &str) -> Option<String> {
    let term = SearchQuery::parse(current_query).filter.search_term;
    (!term.is_empty()).then_some(term)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_search_replaces_term_in_place() {
        assert_eq!(
            header_search("?searchTerm=old&type=rent", "beach house"),
            Route::Search("searchTerm=beach+house&type=rent".to_string())
        );
    }

    #[test]
    fn header_search_adds_missing_term() {
        assert_eq!(
            header_search("", "loft"),
            Route::Search("searchTerm=loft".to_string())
        );
    }

    #[test]
    fn header_term_ignores_empty_values() {
        assert_eq!(header_term("?searchTerm="), None);
        assert_eq!(header_term("?searchTerm=villa").as_deref(), Some("villa"));
    }

    #[test]
    fn submit_uses_sidebar_not_location() {
        let mut controller = SearchController::new();
        controller.filter_mut().offer = true;
        let Route::Search(query) = controller.submit() else {
            panic!("expected a search route");
        };
        assert_eq!(SearchQuery::parse(&query).filter, *controller.filter());
        assert!(controller.query().to_query().is_empty());
    }
}
