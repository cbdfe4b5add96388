//! Portfolio gallery filtering and project detail modals.

use std::time::Duration;

use tracing::debug;

use crate::models::GalleryItem;

/// Stagger between consecutive items reappearing after a filter change.
pub const FILTER_REVEAL_STAGGER: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryFilter {
    All,
    Category(String),
}

impl GalleryFilter {
    /// Parses a filter button token; `"all"` selects everything.
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        if token.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Category(token.to_string())
        }
    }

    pub fn matches(
        &self,
        item: &GalleryItem,
    ) -> bool {
        match self {
            Self::All => true,
            Self::Category(category) => item.category == *category,
        }
    }
}

/// Outcome of a filter pass for one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemVisibility<'a> {
    pub item: &'a GalleryItem,
    pub visible: bool,
    /// Delay before a matching item is revealed; `None` for hidden items,
    /// which disappear immediately.
    pub reveal_delay: Option<Duration>,
}

/// Shows matching items with a staggered reveal and hides the rest.
///
/// The stagger uses the item's position in the whole gallery, not among
/// the matches, so items keep their timing slot across filters.
pub fn apply_filter<'a>(
    items: &'a [GalleryItem],
    filter: &GalleryFilter,
) -> Vec<ItemVisibility<'a>> {
    debug!(?filter, "filtering gallery");
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let visible = filter.matches(item);
            ItemVisibility {
                item,
                visible,
                reveal_delay: visible.then(|| FILTER_REVEAL_STAGGER * index as u32),
            }
        })
        .collect()
}

/// Case-insensitive search over title and description.
pub fn search<'a>(
    items: &'a [GalleryItem],
    query: &str,
) -> Vec<&'a GalleryItem> {
    let needle = query.trim().to_lowercase();
    items
        .iter()
        .filter(|item| {
            item.title.to_lowercase().contains(&needle)
                || item.description.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Project detail dialogs; at most one is open at a time.
#[derive(Debug, Default)]
pub struct ModalSet {
    open: Option<String>,
}

impl ModalSet {
    pub fn open_modal(&self) -> Option<&str> {
        self.open.as_deref()
    }

    /// Opens `id`, replacing any modal already open.
    pub fn open(
        &mut self,
        id: impl Into<String>,
    ) {
        self.open = Some(id.into());
    }

    /// Closes `id` if it is the open modal. Returns whether anything closed.
    pub fn close(
        &mut self,
        id: &str,
    ) -> bool {
        if self.open.as_deref() == Some(id) {
            self.open = None;
            true
        } else {
            false
        }
    }

    /// Escape key or a click on the backdrop closes whatever is open.
    pub fn close_on_escape(&mut self) -> Option<String> {
        self.open.take()
    }
}
