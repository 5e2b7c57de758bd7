//! Remote image resolution with ordered fallbacks.
//!
//! Product images are often document sharing links rather than direct image
//! URLs, and hosts differ in how they treat hotlinked requests. An
//! [`ImageResolver`] turns one raw reference into an ordered list of candidate
//! URLs and walks that list as loads fail:
//!
//! ```text
//!   Pending(0) --error--> Pending(1) --error--> ... --error--> Exhausted
//!       |                     |                                   |
//!      load                  load                               retry
//!       v                     v                                   |
//!   Succeeded(0)          Succeeded(1)              Pending(0) <--+
//! ```
//!
//! Each load attempt hands out a [`LoadTicket`]; callbacks carrying a ticket
//! from a superseded attempt (an earlier candidate, or a reference that has
//! since changed) are ignored.

use std::collections::HashMap;

use url::Url;
use uuid::Uuid;

use crate::metrics;
use crate::models::Product;

// =============================================================================
// CANDIDATE URLS
// =============================================================================

/// Hosts whose links carry a document identifier.
const SHARING_HOSTS: &[&str] = &["drive.google.com", "docs.google.com"];
const CONTENT_HOST: &str = "lh3.googleusercontent.com";

/// Extract the document identifier from a sharing-style link.
///
/// Recognised shapes:
/// - `https://drive.google.com/file/d/<id>/view`
/// - `https://docs.google.com/<kind>/d/<id>/edit`
/// - `https://drive.google.com/open?id=<id>` and `.../uc?id=<id>`
/// - `https://lh3.googleusercontent.com/d/<id>`
pub fn extract_document_id(reference: &str) -> Option<String> {
    let url = Url::parse(reference.trim()).ok()?;
    let host = url.host_str()?;
    if !SHARING_HOSTS.contains(&host) && host != CONTENT_HOST {
        return None;
    }

    let segments: Vec<&str> = url.path_segments()?.collect();
    let from_path = segments
        .windows(2)
        .find(|pair| pair[0] == "d")
        .map(|pair| pair[1].to_string());

    let id = from_path.or_else(|| {
        url.query_pairs()
            .find(|(key, _)| key == "id")
            .map(|(_, value)| value.into_owned())
    })?;

    is_document_id(&id).then_some(id)
}

fn is_document_id(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Best single URL for a reference: the direct-view form for sharing links,
/// the trimmed reference otherwise.
pub fn convert_sharing_url(reference: &str) -> String {
    match extract_document_id(reference) {
        Some(id) => format!("https://drive.google.com/uc?export=view&id={id}"),
        None => reference.trim().to_string(),
    }
}

/// Ordered candidate URLs, most likely to load first. The untouched reference
/// is always the last entry when a document id was found.
pub fn candidate_urls(reference: &str) -> Vec<String> {
    let Some(id) = extract_document_id(reference) else {
        return vec![convert_sharing_url(reference)];
    };

    let original = reference.trim().to_string();
    let mut candidates: Vec<String> = [
        format!("https://{CONTENT_HOST}/d/{id}"),
        format!("https://drive.google.com/thumbnail?id={id}&sz=w1000"),
        format!("https://drive.google.com/uc?export=view&id={id}"),
        format!("https://drive.google.com/uc?export=download&id={id}"),
    ]
    .into_iter()
    .filter(|candidate| *candidate != original)
    .collect();

    candidates.push(original);
    candidates
}

// =============================================================================
// STATE MACHINE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageLoadState {
    /// Waiting on `candidates[cursor]`.
    Pending { cursor: usize },
    /// `candidates[cursor]` loaded. Terminal.
    Succeeded { cursor: usize },
    /// Every candidate failed. Only a manual retry leaves this state.
    Exhausted,
}

/// Identifies one load attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    epoch: u64,
    generation: u64,
    cursor: usize,
}

impl LoadTicket {
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

/// What a row should render for its image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageView<'a> {
    /// No reference: neutral placeholder, no network attempt.
    Placeholder,
    /// Point the image element at `src`.
    Image { src: &'a str, ticket: Option<LoadTicket> },
    /// Error affordance linking the original reference, with a retry control.
    Failed { original: &'a str },
}

#[derive(Debug, Clone)]
pub struct ImageResolver {
    reference: String,
    candidates: Vec<String>,
    state: ImageLoadState,
    /// Identifies this resolver among every resolver its owner ever created.
    epoch: u64,
    generation: u64,
}

impl ImageResolver {
    /// Start resolving `reference`. Returns `None` for an empty reference.
    pub fn new(reference: &str) -> Option<Self> {
        Self::with_epoch(reference, 0)
    }

    /// Like [`new`](Self::new), stamping every ticket with `epoch`. Owners
    /// that dispose and recreate resolvers for the same row pass a fresh
    /// epoch each time, so tickets from a disposed resolver never match.
    pub fn with_epoch(reference: &str, epoch: u64) -> Option<Self> {
        if reference.trim().is_empty() {
            return None;
        }

        Some(Self {
            reference: reference.to_string(),
            candidates: candidate_urls(reference),
            state: ImageLoadState::Pending { cursor: 0 },
            epoch,
            generation: 0,
        })
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn state(&self) -> ImageLoadState {
        self.state
    }

    /// Ticket for the attempt in flight, if any.
    pub fn ticket(&self) -> Option<LoadTicket> {
        match self.state {
            ImageLoadState::Pending { cursor } => Some(LoadTicket {
                epoch: self.epoch,
                generation: self.generation,
                cursor,
            }),
            _ => None,
        }
    }

    /// URL the image element should point at.
    pub fn current_src(&self) -> Option<&str> {
        match self.state {
            ImageLoadState::Pending { cursor } | ImageLoadState::Succeeded { cursor } => {
                self.candidates.get(cursor).map(String::as_str)
            }
            ImageLoadState::Exhausted => None,
        }
    }

    /// Point the resolver at a new reference. Any change is a hard reset to
    /// the first candidate; the same reference leaves the state alone.
    ///
    /// Returns false when the new reference is empty: the caller should drop
    /// the resolver and render the placeholder.
    pub fn set_reference(&mut self, reference: &str) -> bool {
        if reference.trim().is_empty() {
            return false;
        }
        if reference != self.reference {
            self.reference = reference.to_string();
            self.candidates = candidate_urls(reference);
            self.restart();
        }
        true
    }

    /// The image at the ticket's candidate loaded.
    ///
    /// Returns false when the ticket is stale and nothing changed.
    pub fn on_load(&mut self, ticket: LoadTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.state = ImageLoadState::Succeeded {
            cursor: ticket.cursor,
        };
        metrics::record_image_event("succeeded");
        true
    }

    /// The image at the ticket's candidate failed to load. Moves to the next
    /// candidate, or to `Exhausted` after the last one.
    ///
    /// Returns false when the ticket is stale and nothing changed.
    pub fn on_error(&mut self, ticket: LoadTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }

        let next = ticket.cursor + 1;
        if next < self.candidates.len() {
            tracing::debug!(
                reference = %self.reference,
                failed = %self.candidates[ticket.cursor],
                next = %self.candidates[next],
                "image candidate failed, trying fallback"
            );
            self.state = ImageLoadState::Pending { cursor: next };
            metrics::record_image_event("fallback");
        } else {
            tracing::warn!(
                reference = %self.reference,
                attempts = self.candidates.len(),
                "image candidates exhausted"
            );
            self.state = ImageLoadState::Exhausted;
            metrics::record_image_event("exhausted");
        }
        true
    }

    /// Manual retry from `Exhausted`: run the whole chain again.
    pub fn retry(&mut self) -> bool {
        if self.state != ImageLoadState::Exhausted {
            return false;
        }
        self.restart();
        metrics::record_image_event("retry");
        true
    }

    pub fn view(&self) -> ImageView<'_> {
        match self.current_src() {
            Some(src) => ImageView::Image {
                src,
                ticket: self.ticket(),
            },
            None => ImageView::Failed {
                original: &self.reference,
            },
        }
    }

    fn restart(&mut self) {
        self.generation += 1;
        self.state = ImageLoadState::Pending { cursor: 0 };
    }

    fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.epoch == self.epoch
            && ticket.generation == self.generation
            && self.state == ImageLoadState::Pending {
                cursor: ticket.cursor,
            }
    }
}

/// Render helper for a row that may have no resolver at all.
pub fn render_image(resolver: Option<&ImageResolver>) -> ImageView<'_> {
    resolver.map_or(ImageView::Placeholder, ImageResolver::view)
}

// =============================================================================
// PER-ROW RESOLVERS
// =============================================================================

/// One resolver per rendered row, keyed by product id.
///
/// Rows that leave the page are disposed together with their resolver, so
/// late callbacks for them fall on the floor.
#[derive(Debug, Default)]
pub struct RowImages {
    resolvers: HashMap<Uuid, ImageResolver>,
    /// Epoch for the next resolver created; never reused.
    next_epoch: u64,
}

impl RowImages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconcile with the rows currently on screen.
    pub fn sync<'a>(&mut self, rows: impl IntoIterator<Item = &'a Product>) {
        let mut next = HashMap::new();

        for row in rows {
            let reference = row.image_url.as_deref().unwrap_or_default();
            let resolver = match self.resolvers.remove(&row.id) {
                Some(mut existing) => existing.set_reference(reference).then_some(existing),
                None => self.create(reference),
            };
            if let Some(resolver) = resolver {
                next.insert(row.id, resolver);
            }
        }

        self.resolvers = next;
    }

    fn create(&mut self, reference: &str) -> Option<ImageResolver> {
        let resolver = ImageResolver::with_epoch(reference, self.next_epoch)?;
        self.next_epoch += 1;
        Some(resolver)
    }

    pub fn get(&self, id: &Uuid) -> Option<&ImageResolver> {
        self.resolvers.get(id)
    }

    pub fn view(&self, id: &Uuid) -> ImageView<'_> {
        render_image(self.resolvers.get(id))
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }

    pub fn on_load(&mut self, id: &Uuid, ticket: LoadTicket) -> bool {
        self.resolvers
            .get_mut(id)
            .is_some_and(|resolver| resolver.on_load(ticket))
    }

    pub fn on_error(&mut self, id: &Uuid, ticket: LoadTicket) -> bool {
        self.resolvers
            .get_mut(id)
            .is_some_and(|resolver| resolver.on_error(ticket))
    }

    pub fn retry(&mut self, id: &Uuid) -> bool {
        self.resolvers
            .get_mut(id)
            .is_some_and(ImageResolver::retry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_support::product;
    use crate::models::TOY_TAG;

    const SHARED: &str = "https://drive.google.com/file/d/XYZ/view?usp=sharing";

    fn fail_current(resolver: &mut ImageResolver) {
        let ticket = resolver.ticket().expect("pending attempt");
        assert!(resolver.on_error(ticket));
    }

    #[test]
    fn test_extracts_id_from_known_link_shapes() {
        assert_eq!(extract_document_id(SHARED).as_deref(), Some("XYZ"));
        assert_eq!(
            extract_document_id("https://drive.google.com/open?id=abc_123-Q").as_deref(),
            Some("abc_123-Q")
        );
        assert_eq!(
            extract_document_id("https://docs.google.com/document/d/DOC1/edit").as_deref(),
            Some("DOC1")
        );
        assert_eq!(
            extract_document_id("https://lh3.googleusercontent.com/d/LH3").as_deref(),
            Some("LH3")
        );
    }

    #[test]
    fn test_no_id_for_direct_or_malformed_references() {
        assert_eq!(extract_document_id("https://cdn.example.com/d/not-a-share.png"), None);
        assert_eq!(extract_document_id("not a url"), None);
        assert_eq!(extract_document_id("https://drive.google.com/open?id=bad%20id"), None);
    }

    #[test]
    fn test_sharing_link_candidates_start_with_content_host() {
        let candidates = candidate_urls(SHARED);

        assert!(candidates.len() >= 2);
        assert!(candidates[0].starts_with("https://lh3.googleusercontent.com/"));
        assert!(candidates[0].contains("XYZ"));
        assert!(candidates[1].contains("thumbnail"));
        assert_eq!(candidates.last().map(String::as_str), Some(SHARED));
    }

    #[test]
    fn test_original_is_not_repeated_in_the_chain() {
        let direct = "https://lh3.googleusercontent.com/d/XYZ";
        let candidates = candidate_urls(direct);
        assert_eq!(candidates.iter().filter(|c| *c == direct).count(), 1);
        assert_eq!(candidates.last().map(String::as_str), Some(direct));
    }

    #[test]
    fn test_plain_reference_is_a_single_candidate() {
        let candidates = candidate_urls(" https://cdn.example.com/pets/cat.png ");
        assert_eq!(candidates, vec!["https://cdn.example.com/pets/cat.png".to_string()]);
    }

    #[test]
    fn test_empty_reference_has_no_resolver() {
        assert!(ImageResolver::new("").is_none());
        assert!(ImageResolver::new("   ").is_none());
        assert_eq!(render_image(None), ImageView::Placeholder);
    }

    #[test]
    fn test_fourth_candidate_succeeds() {
        let mut resolver = ImageResolver::new(SHARED).expect("resolver");

        for _ in 0..3 {
            fail_current(&mut resolver);
        }
        let ticket = resolver.ticket().expect("pending attempt");
        assert!(resolver.on_load(ticket));

        assert_eq!(resolver.state(), ImageLoadState::Succeeded { cursor: 3 });
        assert_eq!(resolver.current_src(), Some(resolver.candidates()[3].as_str()));
        assert!(resolver.ticket().is_none());
    }

    #[test]
    fn test_exhaustion_after_k_pending_states_then_retry() {
        let mut resolver = ImageResolver::new(SHARED).expect("resolver");
        let k = resolver.candidates().len();

        let mut visited = Vec::new();
        while let ImageLoadState::Pending { cursor } = resolver.state() {
            visited.push(cursor);
            fail_current(&mut resolver);
        }

        assert_eq!(visited, (0..k).collect::<Vec<_>>());
        assert_eq!(resolver.state(), ImageLoadState::Exhausted);
        assert_eq!(resolver.view(), ImageView::Failed { original: SHARED });

        assert!(resolver.retry());
        assert_eq!(resolver.state(), ImageLoadState::Pending { cursor: 0 });
        assert!(!resolver.retry());
    }

    #[test]
    fn test_stale_tickets_are_ignored() {
        let mut resolver = ImageResolver::new(SHARED).expect("resolver");
        let first = resolver.ticket().expect("first attempt");

        assert!(resolver.on_error(first));
        // a late duplicate error for the first candidate must not skip one
        assert!(!resolver.on_error(first));
        assert_eq!(resolver.state(), ImageLoadState::Pending { cursor: 1 });

        // a reference change is a hard reset; old callbacks no longer apply
        let second = resolver.ticket().expect("second attempt");
        assert!(resolver.set_reference("https://drive.google.com/open?id=OTHER"));
        assert_eq!(resolver.state(), ImageLoadState::Pending { cursor: 0 });
        assert!(!resolver.on_load(second));
    }

    #[test]
    fn test_same_reference_keeps_progress() {
        let mut resolver = ImageResolver::new(SHARED).expect("resolver");
        fail_current(&mut resolver);

        assert!(resolver.set_reference(SHARED));
        assert_eq!(resolver.state(), ImageLoadState::Pending { cursor: 1 });
        assert!(!resolver.set_reference(""));
    }

    #[test]
    fn test_row_images_follow_the_visible_rows() {
        let with_image = product("Ball", TOY_TAG).image(SHARED).build();
        let without_image = product("Bone", TOY_TAG).build();
        let other = product("Rope", TOY_TAG).image("https://cdn.example.com/rope.png").build();

        let mut images = RowImages::new();
        images.sync([&with_image, &without_image]);
        assert_eq!(images.len(), 1);
        assert_eq!(images.view(&without_image.id), ImageView::Placeholder);

        let ticket = images
            .get(&with_image.id)
            .and_then(ImageResolver::ticket)
            .expect("pending attempt");

        // the row scrolls off the page: its resolver is disposed
        images.sync([&other]);
        assert!(images.get(&with_image.id).is_none());
        assert!(!images.on_error(&with_image.id, ticket));

        // and comes back with a fresh chain the old ticket cannot touch
        images.sync([&with_image, &other]);
        assert!(!images.on_error(&with_image.id, ticket));
        assert!(!images.on_load(&with_image.id, ticket));
        assert_eq!(
            images.get(&with_image.id).map(ImageResolver::state),
            Some(ImageLoadState::Pending { cursor: 0 })
        );
    }

    #[test]
    fn test_remounted_row_ignores_tickets_from_a_retried_chain() {
        let row = product("Ball", TOY_TAG).image(SHARED).build();
        let other = product("Rope", TOY_TAG).build();

        let mut images = RowImages::new();
        images.sync([&row]);
        while let Some(ticket) = images.get(&row.id).and_then(ImageResolver::ticket) {
            assert!(images.on_error(&row.id, ticket));
        }
        assert!(images.retry(&row.id));
        let retried = images
            .get(&row.id)
            .and_then(ImageResolver::ticket)
            .expect("retried attempt");

        images.sync([&other]);
        images.sync([&row]);

        let fresh = images
            .get(&row.id)
            .and_then(ImageResolver::ticket)
            .expect("fresh attempt");
        assert_ne!(fresh, retried);
        assert!(!images.on_load(&row.id, retried));
        assert!(images.on_load(&row.id, fresh));
        assert_eq!(
            images.get(&row.id).map(ImageResolver::state),
            Some(ImageLoadState::Succeeded { cursor: 0 })
        );
    }
}
