//! The product list page: view state, recomputation and image rows.
//!
//! [`CatalogView`] owns the [`ProductStore`] and every piece of view state as
//! explicit values. Any change recomputes the rows with
//! [`compute_view`](crate::catalog::compute_view) from scratch; nothing is
//! patched incrementally.

use std::time::Duration;

use tokio::time::Instant;
use uuid::Uuid;

use crate::catalog::debounce::SearchDebouncer;
use crate::catalog::filter::{FilterState, GroupFilter, StatusFilter};
use crate::catalog::image::{ImageView, LoadTicket, RowImages};
use crate::catalog::paginate::{paginate, total_pages, Page, PaginationState};
use crate::catalog::sort::{SortConfig, SortKey};
use crate::catalog::store::{ProductApi, ProductStore};
use crate::catalog::view::compute_view;
use crate::config::CatalogSettings;
use crate::error::ApiError;
use crate::metrics;
use crate::models::{CurrencyType, Product, ProductDraft, ProductStatus};

pub struct CatalogView<A> {
    store: ProductStore<A>,
    filter: FilterState,
    sort: SortConfig,
    pagination: PaginationState,
    debouncer: SearchDebouncer,
    /// Filtered and sorted collection, rebuilt on every recompute.
    rows: Vec<Product>,
    images: RowImages,
    notice: Option<String>,
    recomputations: u64,
}

impl<A: ProductApi> CatalogView<A> {
    pub fn new(api: A, page_size: usize, search_debounce: Duration) -> Self {
        Self {
            store: ProductStore::new(api),
            filter: FilterState::new(),
            sort: SortConfig::unsorted(),
            pagination: PaginationState::new(page_size),
            debouncer: SearchDebouncer::new(search_debounce),
            rows: Vec::new(),
            images: RowImages::new(),
            notice: None,
            recomputations: 0,
        }
    }

    pub fn with_settings(api: A, settings: &CatalogSettings) -> Self {
        Self::new(api, settings.page_size, settings.search_debounce)
    }

    // -------------------------------------------------------------------------
    // READ ACCESS
    // -------------------------------------------------------------------------

    pub fn store(&self) -> &ProductStore<A> {
        &self.store
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn sort(&self) -> SortConfig {
        self.sort
    }

    pub fn pagination(&self) -> PaginationState {
        self.pagination
    }

    /// Raw contents of the search box.
    pub fn search_input(&self) -> &str {
        self.debouncer.raw()
    }

    /// Every row that passes the filters, in display order.
    pub fn rows(&self) -> &[Product] {
        &self.rows
    }

    /// The rows on the current page.
    pub fn page(&self) -> Page<'_, Product> {
        paginate(
            &self.rows,
            self.pagination.page_size(),
            self.pagination.current_page(),
        )
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.rows.len(), self.pagination.page_size())
    }

    /// Message from the last failed mutation, if any.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// How many times the rows were rebuilt.
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }

    pub fn images(&self) -> &RowImages {
        &self.images
    }

    pub fn image_view(&self, id: &Uuid) -> ImageView<'_> {
        self.images.view(id)
    }

    // -------------------------------------------------------------------------
    // COLLECTION
    // -------------------------------------------------------------------------

    /// Fetch the collection and build the first view.
    pub async fn load(&mut self) -> Result<(), ApiError> {
        let result = self.store.refresh().await;
        self.settle(result)?;
        self.recompute();
        Ok(())
    }

    pub async fn create(&mut self, draft: ProductDraft) -> Result<Product, ApiError> {
        let result = self.store.create(draft).await;
        let created = self.settle(result)?;
        self.recompute();
        Ok(created)
    }

    pub async fn update(&mut self, id: Uuid, draft: ProductDraft) -> Result<Product, ApiError> {
        let result = self.store.update(id, draft).await;
        let updated = self.settle(result)?;
        self.recompute();
        Ok(updated)
    }

    pub async fn delete(&mut self, id: Uuid) -> Result<(), ApiError> {
        let result = self.store.delete(id).await;
        self.settle(result)?;
        self.recompute();
        Ok(())
    }

    pub async fn set_status(
        &mut self,
        id: Uuid,
        status: ProductStatus,
    ) -> Result<Product, ApiError> {
        let result = self.store.set_status(id, status).await;
        let updated = self.settle(result)?;
        self.recompute();
        Ok(updated)
    }

    /// Record the outcome of a collaborator call for the notice line.
    fn settle<T>(&mut self, result: Result<T, ApiError>) -> Result<T, ApiError> {
        match result {
            Ok(value) => {
                self.notice = None;
                Ok(value)
            }
            Err(err) => {
                tracing::warn!(error = %err, "catalog request failed");
                self.notice = Some(err.to_string());
                Err(err)
            }
        }
    }

    // -------------------------------------------------------------------------
    // SEARCH
    // -------------------------------------------------------------------------

    /// A keystroke in the search box. Nothing is recomputed until
    /// [`tick`](Self::tick) observes the quiet interval has passed.
    pub fn type_search(&mut self, value: impl Into<String>, now: Instant) {
        self.debouncer.input(value, now);
    }

    /// Let the debouncer commit. Returns true when the rows were rebuilt.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(term) = self.debouncer.poll(now) else {
            return false;
        };
        self.filter.search = term.to_string();
        self.pagination.reset();
        self.recompute();
        true
    }

    /// When the next [`tick`](Self::tick) could commit, if a value is pending.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// The clear button: empties the search right away.
    pub fn clear_search(&mut self) {
        self.debouncer.clear();
        if !self.filter.search.is_empty() {
            self.filter.search.clear();
            self.pagination.reset();
            self.recompute();
        }
    }

    // -------------------------------------------------------------------------
    // FACETS & SORT
    // -------------------------------------------------------------------------

    pub fn set_status_filter(&mut self, status: StatusFilter) {
        self.filter.status = status;
        self.view_state_changed();
    }

    pub fn set_currency_filter(&mut self, currency: Option<CurrencyType>) {
        self.filter.currency = currency;
        self.view_state_changed();
    }

    pub fn set_grouping(&mut self, grouping: GroupFilter) {
        self.filter.set_grouping(grouping);
        self.view_state_changed();
    }

    pub fn set_sub_type(&mut self, sub_type: Option<String>) {
        self.filter.set_sub_type(sub_type);
        self.view_state_changed();
    }

    /// Column header click.
    pub fn toggle_sort(&mut self, key: SortKey) {
        self.sort.toggle(key);
        self.view_state_changed();
    }

    /// Column header click by column name. Unknown names clear the sort.
    pub fn sort_by_name(&mut self, column: &str) {
        match SortKey::parse(column) {
            Some(key) => self.toggle_sort(key),
            None => {
                tracing::debug!(column, "unknown sort column, keeping collection order");
                self.sort = SortConfig::unsorted();
                self.view_state_changed();
            }
        }
    }

    fn view_state_changed(&mut self) {
        self.pagination.reset();
        self.recompute();
    }

    // -------------------------------------------------------------------------
    // PAGINATION
    // -------------------------------------------------------------------------

    pub fn next_page(&mut self) {
        self.pagination.next(self.total_pages());
        self.sync_images();
    }

    pub fn prev_page(&mut self) {
        self.pagination.prev();
        self.sync_images();
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.pagination.jump(page, self.total_pages());
        self.sync_images();
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.pagination.set_page_size(page_size, self.rows.len());
        self.sync_images();
    }

    // -------------------------------------------------------------------------
    // IMAGES
    // -------------------------------------------------------------------------

    pub fn on_image_loaded(&mut self, id: &Uuid, ticket: LoadTicket) -> bool {
        self.images.on_load(id, ticket)
    }

    pub fn on_image_failed(&mut self, id: &Uuid, ticket: LoadTicket) -> bool {
        self.images.on_error(id, ticket)
    }

    pub fn retry_image(&mut self, id: &Uuid) -> bool {
        self.images.retry(id)
    }

    // -------------------------------------------------------------------------
    // RECOMPUTATION
    // -------------------------------------------------------------------------

    fn recompute(&mut self) {
        self.rows = compute_view(self.store.products(), &self.filter, &self.sort)
            .into_iter()
            .cloned()
            .collect();
        self.pagination.clamp_to(self.total_pages());
        self.recomputations += 1;
        metrics::record_view_recompute();

        tracing::debug!(
            matched = self.rows.len(),
            total = self.store.products().len(),
            page = self.pagination.current_page(),
            "catalog view recomputed"
        );

        self.sync_images();
    }

    fn sync_images(&mut self) {
        let page = paginate(
            &self.rows,
            self.pagination.page_size(),
            self.pagination.current_page(),
        );
        self.images.sync(page.items);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::image::ImageLoadState;
    use crate::catalog::sort::SortDirection;
    use crate::db::Database;
    use crate::models::TOY_TAG;

    const QUIET: Duration = Duration::from_millis(300);

    async fn seeded_view() -> CatalogView<Database> {
        let db = Database::in_memory();
        db.seed_sample_data().await.expect("seed");
        let mut view = CatalogView::new(db, 10, QUIET);
        view.load().await.expect("load");
        view
    }

    #[tokio::test]
    async fn test_filter_change_resets_to_first_page() {
        let mut view = seeded_view().await;
        assert_eq!(view.total_pages(), 3);

        view.go_to_page(3);
        assert_eq!(view.pagination().current_page(), 3);
        assert_eq!(view.page().items.len(), 3);

        view.set_status_filter(StatusFilter::OutOfStock);
        assert_eq!(view.rows().len(), 7);
        assert_eq!(view.pagination().current_page(), 1);
        assert_eq!(view.total_pages(), 1);
    }

    #[tokio::test]
    async fn test_settings_fix_page_size_and_quiet_interval() {
        let settings = CatalogSettings {
            api_base_url: "http://localhost:8080".to_string(),
            page_size: 4,
            search_debounce: Duration::from_millis(120),
        };
        let db = Database::in_memory();
        db.seed_sample_data().await.expect("seed");
        let mut view = CatalogView::with_settings(db, &settings);
        view.load().await.expect("load");

        assert_eq!(view.pagination().page_size(), 4);
        assert_eq!(view.total_pages(), 6);

        let t0 = Instant::now();
        view.type_search("cat", t0);
        assert_eq!(view.next_deadline(), Some(t0 + Duration::from_millis(120)));
    }

    #[tokio::test]
    async fn test_debounced_search_recomputes_once() {
        let mut view = seeded_view().await;
        let baseline = view.recomputations();
        let t0 = Instant::now();

        for (i, prefix) in ["d", "dr", "dra", "drag", "drago", "dragon"].iter().enumerate() {
            let now = t0 + Duration::from_millis(50 * i as u64);
            view.type_search(*prefix, now);
            assert!(!view.tick(now));
        }
        assert_eq!(view.search_input(), "dragon");
        assert_eq!(view.filter().search, "");

        let settled = view.next_deadline().expect("pending search");
        assert!(view.tick(settled));
        assert!(!view.tick(settled + QUIET));

        assert_eq!(view.recomputations(), baseline + 1);
        assert_eq!(view.filter().search, "dragon");
        assert!(view
            .rows()
            .iter()
            .all(|p| p.name.to_lowercase().contains("dragon")
                || p.description.as_deref().unwrap_or_default().to_lowercase().contains("dragon")));
        assert!(!view.rows().is_empty());
    }

    #[tokio::test]
    async fn test_clear_search_restores_everything_immediately() {
        let mut view = seeded_view().await;
        let t0 = Instant::now();
        view.type_search("kibble", t0);
        view.tick(t0 + QUIET);
        assert_eq!(view.rows().len(), 1);

        view.clear_search();
        assert_eq!(view.rows().len(), 23);
        assert_eq!(view.search_input(), "");
    }

    #[tokio::test]
    async fn test_sort_toggle_resets_page_and_flips_direction() {
        let mut view = seeded_view().await;
        view.next_page();
        assert_eq!(view.pagination().current_page(), 2);

        view.toggle_sort(SortKey::Price);
        assert_eq!(view.pagination().current_page(), 1);
        assert_eq!(view.rows()[0].name, "Name Tag");

        view.sort_by_name("price");
        assert_eq!(view.sort(), SortConfig::by(SortKey::Price, SortDirection::Descending));
        assert_eq!(view.rows()[0].name, "Ancient Phoenix Egg");

        view.sort_by_name("weight");
        assert_eq!(view.sort().key, None);
    }

    #[tokio::test]
    async fn test_paging_is_clamped_at_the_bounds() {
        let mut view = seeded_view().await;
        view.prev_page();
        assert_eq!(view.pagination().current_page(), 1);

        view.go_to_page(99);
        assert_eq!(view.pagination().current_page(), 3);
        view.next_page();
        assert_eq!(view.pagination().current_page(), 3);

        view.set_page_size(5);
        assert_eq!(view.pagination().current_page(), 3);
        assert_eq!(view.total_pages(), 5);
    }

    #[tokio::test]
    async fn test_delete_shrinking_the_view_clamps_the_page() {
        let db = Database::in_memory();
        let mut view = CatalogView::new(db.clone(), 2, QUIET);
        for name in ["A", "B", "C"] {
            db.create_product(ProductDraft::new(name, TOY_TAG, CurrencyType::Gold, 1.0, 1))
                .await
                .expect("create");
        }
        view.load().await.expect("load");
        view.go_to_page(2);

        let last = view.page().items[0].id;
        view.delete(last).await.expect("delete");

        assert_eq!(view.pagination().current_page(), 1);
        assert_eq!(view.page().items.len(), 2);
    }

    #[tokio::test]
    async fn test_failed_mutation_surfaces_a_notice() {
        let mut view = seeded_view().await;
        let before = view.rows().to_vec();

        let result = view.set_status(Uuid::new_v4(), ProductStatus::Inactive).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
        assert!(view.notice().is_some_and(|n| n.contains("Not found")));
        assert_eq!(view.rows(), before.as_slice());

        view.load().await.expect("reload");
        assert!(view.notice().is_none());
    }

    #[tokio::test]
    async fn test_images_follow_the_current_page() {
        let db = Database::in_memory();
        let shared = "https://drive.google.com/file/d/XYZ/view";
        let first = db
            .create_product(
                ProductDraft::new("Ball", TOY_TAG, CurrencyType::Gold, 1.0, 1).with_image(shared),
            )
            .await
            .expect("create");
        db.create_product(ProductDraft::new("Bone", TOY_TAG, CurrencyType::Gold, 1.0, 1))
            .await
            .expect("create");

        let mut view = CatalogView::new(db, 1, QUIET);
        view.load().await.expect("load");

        let ticket = view
            .images()
            .get(&first.id)
            .and_then(|r| r.ticket())
            .expect("pending image");
        assert!(view.on_image_failed(&first.id, ticket));
        assert_eq!(
            view.images().get(&first.id).map(|r| r.state()),
            Some(ImageLoadState::Pending { cursor: 1 })
        );
        assert!(matches!(
            view.image_view(&first.id),
            ImageView::Image { src, .. } if src.contains("thumbnail")
        ));

        // off-page rows keep no resolver and ignore late callbacks
        view.next_page();
        assert!(view.images().get(&first.id).is_none());
        assert!(!view.on_image_loaded(&first.id, ticket));
        assert!(!view.retry_image(&first.id));
    }
}
