use packscan_core::{CustomerKey, LabelLookup};
use std::path::Path;

/// Page-indexed text of the shipping-labels document.
///
/// Built from `pdftotext` style output where pages are separated by form
/// feeds. Page text is normalized like `CustomerKey` so lookups are
/// insensitive to case and line wrapping.
#[derive(Debug, Clone, Default)]
pub struct LabelTextIndex {
    pages: Vec<String>,
}

impl LabelTextIndex {
    pub fn from_text(text: &str) -> Self {
        let mut pages: Vec<String> = text
            .split('\x0c')
            .map(|page| CustomerKey::new(page).as_str().to_string())
            .collect();

        // pdftotext terminates the last page with a form feed too
        if pages.len() > 1 && pages.last().is_some_and(|page| page.is_empty()) {
            pages.pop();
        }

        Self { pages }
    }

    pub fn load(path: &Path) -> std::io::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let index = Self::from_text(&text);
        tracing::info!(path = %path.display(), pages = index.page_count(), "Indexed label document");
        Ok(index)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

impl LabelLookup for LabelTextIndex {
    fn find_label_page(&self, customer: &CustomerKey) -> Option<u32> {
        if customer.is_empty() {
            return None;
        }

        self.pages
            .iter()
            .position(|page| contains_name(page, customer.as_str()))
            .and_then(|idx| u32::try_from(idx + 1).ok())
    }
}

// Whole-name match so "ann lee" does not hit "joann lee"
fn contains_name(page: &str, name: &str) -> bool {
    page.match_indices(name).any(|(start, _)| {
        let end = start + name.len();
        let before = page[..start].chars().next_back();
        let after = page[end..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}
