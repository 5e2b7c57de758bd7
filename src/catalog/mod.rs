//! Product catalog view engine.
//!
//! Everything the admin dashboard needs to turn the raw product collection
//! into the rows on screen:
//!
//! - [`filter`] / [`sort`]: the view state as plain values
//! - [`view`]: the pure filter → sort pass
//! - [`paginate`]: page slicing with clamping
//! - [`debounce`]: search input debouncing
//! - [`image`]: fallback-chain image resolution per row
//! - [`store`]: the collection and the API it comes from
//! - [`session`]: the page controller tying it all together

pub mod debounce;
pub mod filter;
pub mod image;
pub mod paginate;
pub mod session;
pub mod sort;
pub mod store;
pub mod view;

#[cfg(test)]
pub(crate) mod test_support;

pub use debounce::{spawn_search_debouncer, SearchDebouncer, SearchDebouncerHandle, SearchEvent};
pub use filter::{FilterState, GroupFilter, StatusFilter};
pub use image::{
    candidate_urls, extract_document_id, render_image, ImageLoadState, ImageResolver, ImageView,
    LoadTicket, RowImages,
};
pub use paginate::{paginate, Page, PaginationState};
pub use session::CatalogView;
pub use sort::{SortConfig, SortDirection, SortKey};
pub use store::{ProductApi, ProductStore};
pub use view::compute_view;
