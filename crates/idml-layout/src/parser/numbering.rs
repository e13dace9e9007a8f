//! Printed page numbers and master-page margin inheritance

use std::collections::BTreeMap;

use crate::model::{Page, Section, Spread};

/// Maps physical page positions to printed page numbers
#[derive(Debug, Clone, Copy)]
pub struct PageNumberResolver<'a> {
    sections: &'a [Section],
}

impl<'a> PageNumberResolver<'a> {
    /// Create a resolver over the designmap's sections, in order
    #[inline]
    #[must_use = "creates a resolver"]
    pub const fn new(sections: &'a [Section]) -> Self {
        Self { sections }
    }

    /// Printed number of the page at 1-based physical `index`
    ///
    /// Sections are visited in order with a running page count. A section
    /// that has a `PageStart` applies when the running count is still below
    /// `index` when it is reached; the last applicable one wins. Without one
    /// the physical index is returned.
    #[must_use = "returns the printed page number"]
    pub fn resolve(&self, index: u32) -> u32 {
        let mut applicable: Option<(&Section, u32)> = None;
        let mut running = 0u32;

        for section in self.sections.iter().filter(|s| s.page_start.is_some()) {
            if running < index {
                applicable = Some((section, running));
            }
            running = running.saturating_add(section.length);
        }

        match applicable {
            Some((section, before)) => section
                .page_number_start
                .saturating_add(index.saturating_sub(before).saturating_sub(1)),
            None => index,
        }
    }

    /// Number every page of `spread` in order, continuing after `pages_before`
    /// already numbered pages. Returns the new running page count.
    pub fn number_pages(&self, spread: &mut Spread, pages_before: u32) -> u32 {
        let mut index = pages_before;
        for page in &mut spread.pages {
            index += 1;
            page.page_number = Some(self.resolve(index));
        }
        index
    }
}

/// Fills margins of pages that declare none from their master spread
#[derive(Debug, Clone, Copy)]
pub struct MasterMarginResolver<'a> {
    masters: &'a BTreeMap<String, Spread>,
}

impl<'a> MasterMarginResolver<'a> {
    /// Create a resolver over master spreads keyed by `Self`
    #[inline]
    #[must_use = "creates a resolver"]
    pub const fn new(masters: &'a BTreeMap<String, Spread>) -> Self {
        Self { masters }
    }

    /// Copy the master's first-page margins onto `page` when all of its own
    /// margins are zero. The master's column layout is copied too when the
    /// page has a single column and the master has more.
    ///
    /// Returns whether the page was changed.
    pub fn apply(&self, page: &mut Page) -> bool {
        if !page.margins.is_zero() {
            return false;
        }
        let Some(master_page) = page
            .master_id()
            .and_then(|id| self.masters.get(id))
            .and_then(|master| master.pages.first())
        else {
            return false;
        };

        page.margins = master_page.margins;
        if page.column_count <= 1 && master_page.column_count > 1 {
            page.column_count = master_page.column_count;
            page.column_gutter = master_page.column_gutter;
        }
        log::debug!(
            "Page {} inherits margins from master {}",
            page.id,
            page.master_id().unwrap_or_default()
        );
        true
    }

    /// Apply to every page of a spread, returning how many changed
    pub fn apply_to_spread(&self, spread: &mut Spread) -> usize {
        spread
            .pages
            .iter_mut()
            .map(|page| self.apply(page))
            .filter(|changed| *changed)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Margins;

    fn section(start: Option<&str>, number: u32, length: u32) -> Section {
        Section {
            page_start: start.map(str::to_string),
            page_number_start: number,
            length,
            ..Section::default()
        }
    }

    #[test]
    fn test_no_sections_is_identity() {
        let resolver = PageNumberResolver::new(&[]);
        for index in 1..=10 {
            assert_eq!(resolver.resolve(index), index);
        }
    }

    #[test]
    fn test_single_section_offset() {
        let sections = [section(Some("p1"), 5, 4)];
        let resolver = PageNumberResolver::new(&sections);
        assert_eq!(resolver.resolve(1), 5);
        assert_eq!(resolver.resolve(3), 7);
    }

    #[test]
    fn test_later_section_wins() {
        let sections = [section(Some("p1"), 1, 2), section(Some("p3"), 10, 3)];
        let resolver = PageNumberResolver::new(&sections);
        assert_eq!(resolver.resolve(1), 1);
        assert_eq!(resolver.resolve(2), 2);
        assert_eq!(resolver.resolve(3), 10);
        assert_eq!(resolver.resolve(5), 12);
    }

    #[test]
    fn test_sections_without_anchor_ignored() {
        let sections = [section(None, 100, 50)];
        let resolver = PageNumberResolver::new(&sections);
        assert_eq!(resolver.resolve(4), 4);
    }

    #[test]
    fn test_number_pages_continues_count() {
        let sections = [section(Some("p1"), 3, 10)];
        let resolver = PageNumberResolver::new(&sections);
        let mut spread = Spread::new("s".to_string());
        spread.pages = vec![Page::default(), Page::default()];
        let total = resolver.number_pages(&mut spread, 2);
        assert_eq!(total, 4);
        assert_eq!(spread.pages[0].page_number, Some(5));
        assert_eq!(spread.pages[1].page_number, Some(6));
    }

    fn masters() -> BTreeMap<String, Spread> {
        let mut master = Spread::new("uc4".to_string());
        master.pages.push(Page {
            margins: Margins::new(20.0, 30.0, 36.0, 36.0),
            column_count: 2,
            column_gutter: 12.0,
            ..Page::default()
        });
        BTreeMap::from([("uc4".to_string(), master)])
    }

    #[test]
    fn test_zero_margins_inherit() {
        let masters = masters();
        let resolver = MasterMarginResolver::new(&masters);
        let mut page = Page {
            applied_master: Some("uc4".to_string()),
            ..Page::default()
        };
        assert!(resolver.apply(&mut page));
        assert_eq!(page.margins.top, 20.0);
        assert_eq!(page.column_count, 2);
        assert_eq!(page.column_gutter, 12.0);
    }

    #[test]
    fn test_own_margins_kept() {
        let masters = masters();
        let resolver = MasterMarginResolver::new(&masters);
        let mut page = Page {
            applied_master: Some("uc4".to_string()),
            margins: Margins::new(0.0, 0.0, 5.0, 0.0),
            ..Page::default()
        };
        assert!(!resolver.apply(&mut page));
        assert_eq!(page.margins, Margins::new(0.0, 0.0, 5.0, 0.0));
        assert_eq!(page.column_count, 1);
    }

    #[test]
    fn test_missing_or_none_master() {
        let masters = masters();
        let resolver = MasterMarginResolver::new(&masters);
        for master in ["n", "unknown"] {
            let mut page = Page {
                applied_master: Some(master.to_string()),
                ..Page::default()
            };
            assert!(!resolver.apply(&mut page));
            assert!(page.margins.is_zero());
        }
    }

    #[test]
    fn test_multi_column_page_keeps_columns() {
        let masters = masters();
        let resolver = MasterMarginResolver::new(&masters);
        let mut spread = Spread::new("s".to_string());
        spread.pages.push(Page {
            applied_master: Some("uc4".to_string()),
            column_count: 3,
            ..Page::default()
        });
        assert_eq!(resolver.apply_to_spread(&mut spread), 1);
        assert_eq!(spread.pages[0].column_count, 3);
        assert_eq!(spread.pages[0].margins.bottom, 30.0);
    }
}
