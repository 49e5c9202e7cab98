use std::fmt;

/// One slot of the page selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(u32),
    Ellipsis,
}

impl fmt::Display for PageItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageItem::Page(n) => write!(f, "{}", n),
            PageItem::Ellipsis => f.write_str("..."),
        }
    }
}

/// Compact page list: first, last, and the current page with its neighbours
pub fn page_numbers(page: u32, total_pages: u32) -> Vec<PageItem> {
    let mut items = vec![PageItem::Page(1)];

    if page > 3 {
        items.push(PageItem::Ellipsis);
    }

    let start = page.saturating_sub(1).max(2);
    let end = total_pages.saturating_sub(1).min(page + 1);
    items.extend((start..=end).map(PageItem::Page));

    if page + 2 < total_pages {
        items.push(PageItem::Ellipsis);
    }

    if total_pages > 1 {
        items.push(PageItem::Page(total_pages));
    }

    items
}

/// Pagination control derived from the current page and page count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationView {
    pub page: u32,
    pub total_pages: u32,
    pub items: Vec<PageItem>,
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

impl PaginationView {
    pub fn new(page: u32, total_pages: u32) -> Self {
        Self {
            page,
            total_pages,
            items: page_numbers(page, total_pages),
            prev_enabled: page > 1,
            next_enabled: page < total_pages,
        }
    }

    /// Hidden when everything fits on one page
    pub fn is_visible(&self) -> bool {
        self.total_pages > 1
    }

    pub fn render(&self) -> String {
        if !self.is_visible() {
            return String::new();
        }

        let mut parts = Vec::with_capacity(self.items.len() + 2);
        parts.push(if self.prev_enabled { "< Prev".to_string() } else { "  Prev".to_string() });
        for item in &self.items {
            match item {
                PageItem::Page(n) if *n == self.page => parts.push(format!("[{}]", n)),
                other => parts.push(other.to_string()),
            }
        }
        parts.push(if self.next_enabled { "Next >".to_string() } else { "Next  ".to_string() });
        parts.join(" ")
    }
}
