use common::types::{Product, SessionId};
use ratatui::widgets::ListState;

pub const EMPTY_TERM_NOTICE: &str = "Please enter a search term";
pub const NO_PRODUCTS_NOTICE: &str = "No products found";

/// What the results area of the product panel shows.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchResults {
    Idle,
    Loading,
    Products(Vec<Product>),
    Empty,
    Notice(String),
}

/// State of the product search overlay.
///
/// Searches are numbered; only the result of the latest one is applied, so
/// a slow earlier search cannot overwrite a newer one.
#[derive(Debug)]
pub struct ProductPanel {
    pub visible: bool,
    pub session_id: Option<SessionId>,
    pub term: String,
    pub results: SearchResults,
    pub list_state: ListState,
    generation: u64,
}

impl Default for ProductPanel {
    fn default() -> Self {
        ProductPanel {
            visible: false,
            session_id: None,
            term: String::new(),
            results: SearchResults::Idle,
            list_state: ListState::default(),
            generation: 0,
        }
    }
}

impl ProductPanel {
    pub fn open(&mut self, session_id: impl Into<SessionId>) {
        self.visible = true;
        self.session_id = Some(session_id.into());
        self.term.clear();
        self.results = SearchResults::Idle;
        self.list_state = ListState::default();
    }

    pub fn close(&mut self) {
        self.visible = false;
        self.session_id = None;
        // Invalidate whatever search is still in flight.
        self.generation += 1;
    }

    /// Starts a search for `term`, returning its generation.
    ///
    /// An empty term shows [`EMPTY_TERM_NOTICE`] and starts nothing.
    pub fn begin_search(&mut self, term: &str) -> Option<u64> {
        let term = term.trim();
        self.term = term.to_string();

        if term.is_empty() {
            self.results = SearchResults::Notice(EMPTY_TERM_NOTICE.into());
            return None;
        }

        self.generation += 1;
        self.results = SearchResults::Loading;
        self.list_state = ListState::default();
        Some(self.generation)
    }

    /// Applies a search outcome if it belongs to the latest search.
    pub fn finish_search(
        &mut self,
        generation: u64,
        outcome: Result<Vec<Product>, String>,
    ) -> bool {
        if generation != self.generation || !self.visible {
            return false;
        }

        self.results = match outcome {
            Ok(products) if products.is_empty() => SearchResults::Empty,
            Ok(products) => {
                self.list_state.select(Some(0));
                SearchResults::Products(products)
            }
            Err(message) => SearchResults::Notice(message),
        };
        true
    }

    pub fn products(&self) -> &[Product] {
        match &self.results {
            SearchResults::Products(products) => products,
            _ => &[],
        }
    }

    pub fn selected_product(&self) -> Option<&Product> {
        self.list_state
            .selected()
            .and_then(|i| self.products().get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str) -> Product {
        Product {
            id: id.into(),
            title: format!("Widget {id}"),
            sku: None,
            price: Some("9.99".into()),
            image: None,
            url: format!("https://shop.test/p/{id}"),
        }
    }

    #[test]
    fn open_resets_previous_search() {
        let mut panel = ProductPanel::default();
        panel.open("1");
        let generation = panel.begin_search("widget").unwrap();
        panel.finish_search(generation, Ok(vec![product("9")]));

        panel.open("2");
        assert_eq!(panel.term, "");
        assert_eq!(panel.results, SearchResults::Idle);
        assert_eq!(panel.session_id.as_deref(), Some("2"));
    }

    #[test]
    fn empty_term_shows_notice_without_searching() {
        let mut panel = ProductPanel::default();
        panel.open("1");
        assert_eq!(panel.begin_search("   "), None);
        assert_eq!(panel.results, SearchResults::Notice(EMPTY_TERM_NOTICE.into()));
    }

    #[test]
    fn latest_search_wins() {
        let mut panel = ProductPanel::default();
        panel.open("1");
        let first = panel.begin_search("wid").unwrap();
        let second = panel.begin_search("widget").unwrap();

        assert!(panel.finish_search(second, Ok(vec![product("2")])));
        assert!(!panel.finish_search(first, Ok(vec![product("1")])));
        assert_eq!(panel.products()[0].id, "2");
    }

    #[test]
    fn results_after_close_are_dropped() {
        let mut panel = ProductPanel::default();
        panel.open("1");
        let generation = panel.begin_search("widget").unwrap();
        panel.close();

        assert!(!panel.finish_search(generation, Ok(vec![product("1")])));
    }

    #[test]
    fn empty_result_list_is_empty_state() {
        let mut panel = ProductPanel::default();
        panel.open("1");
        let generation = panel.begin_search("widget").unwrap();
        panel.finish_search(generation, Ok(vec![]));

        assert_eq!(panel.results, SearchResults::Empty);
        assert!(panel.selected_product().is_none());
    }
}
