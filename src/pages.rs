//! The ordered page list. Each page owns its stroke list and history; the
//! collection decides which pair is live and keeps the `strokes` mirror in
//! sync with the live history snapshot.

use egui::Color32;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::history::StrokeHistory;
use crate::stroke::Stroke;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "4:3")]
    FourThree,
    #[serde(rename = "16:9")]
    SixteenNine,
}

impl AspectRatio {
    pub fn label(self) -> &'static str {
        match self {
            AspectRatio::FourThree => "4:3",
            AspectRatio::SixteenNine => "16:9",
        }
    }

    /// Height over width.
    pub fn height_factor(self) -> f32 {
        match self {
            AspectRatio::FourThree => 3.0 / 4.0,
            AspectRatio::SixteenNine => 9.0 / 16.0,
        }
    }
}

/// One whiteboard page: a stroke list, its background, and its own history.
///
/// `strokes` mirrors `history.current()`; the collection re-syncs it after
/// every mutation and when navigating away.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    pub strokes: Vec<Stroke>,
    pub background_color: Color32,
    pub history: StrokeHistory,
    pub aspect_ratio: AspectRatio,
}

impl Page {
    pub fn new(aspect_ratio: AspectRatio) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            strokes: Vec::new(),
            background_color: Color32::WHITE,
            history: StrokeHistory::new(),
            aspect_ratio,
        }
    }

    fn sync_strokes(&mut self) {
        self.strokes = self.history.current().clone();
    }
}

/// Ordered list of pages with one current page.
///
/// An empty collection is a valid state (the welcome screen); every operation
/// on the current page is a no-op until a page exists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageCollection {
    pages: Vec<Page>,
    current: usize,
}

impl PageCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pages(pages: Vec<Page>) -> Self {
        Self { pages, current: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_page(&self) -> Option<&Page> {
        self.pages.get(self.current)
    }

    pub fn current_page_mut(&mut self) -> Option<&mut Page> {
        self.pages.get_mut(self.current)
    }

    /// Re-sync the current page's stroke mirror from its live history.
    pub fn sync_current(&mut self) {
        if let Some(page) = self.pages.get_mut(self.current) {
            page.sync_strokes();
        }
    }

    /// Append a new empty page and make it current.
    pub fn add_page(&mut self, aspect_ratio: AspectRatio) {
        self.sync_current();
        self.pages.push(Page::new(aspect_ratio));
        self.current = self.pages.len() - 1;
        log::info!("added page ({}), {} total", aspect_ratio.label(), self.pages.len());
    }

    /// Remove a page. Deleting the only page empties the collection; when the
    /// removed index is at or before the current one, the current index
    /// shifts down (clamped to 0).
    pub fn delete_page(&mut self, index: usize) {
        if index >= self.pages.len() {
            return;
        }
        if self.pages.len() == 1 {
            self.pages.clear();
            self.current = 0;
            return;
        }
        self.sync_current();
        self.pages.remove(index);
        if self.current >= index {
            self.current = self.current.saturating_sub(1);
        }
    }

    /// Switch the current page; a no-op when already current. The outgoing
    /// page's mirror is snapshotted before the new history becomes live.
    pub fn select_page(&mut self, index: usize) {
        if index == self.current || index >= self.pages.len() {
            return;
        }
        self.sync_current();
        self.current = index;
    }

    /// Background color is a direct per-page mutation, outside undo history.
    pub fn set_background(&mut self, color: Color32) {
        if let Some(page) = self.pages.get_mut(self.current) {
            page.background_color = color;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::{PenConfig, StrokeGeometry};
    use egui::Pos2;

    fn dot(x: f32, y: f32) -> Stroke {
        Stroke::new(
            PenConfig::default(),
            StrokeGeometry::Path {
                points: vec![Pos2::new(x, y), Pos2::new(x + 1.0, y)],
            },
        )
    }

    #[test]
    fn deleting_the_only_page_empties_the_collection() {
        let mut pages = PageCollection::new();
        pages.add_page(AspectRatio::FourThree);
        pages.delete_page(0);
        assert!(pages.is_empty());
        assert!(pages.current_page().is_none());
    }

    #[test]
    fn adding_after_going_empty_starts_a_fresh_history() {
        let mut pages = PageCollection::new();
        pages.add_page(AspectRatio::FourThree);
        pages.delete_page(0);
        assert!(pages.is_empty());

        pages.add_page(AspectRatio::SixteenNine);
        assert_eq!(pages.len(), 1);
        let page = pages.current_page().unwrap();
        assert_eq!(page.aspect_ratio, AspectRatio::SixteenNine);
        assert_eq!(page.history.index(), 0);
        assert_eq!(page.history.stack().len(), 1);
        assert!(page.history.current().is_empty());
    }

    #[test]
    fn deleting_an_earlier_page_shifts_the_current_index() {
        let mut pages = PageCollection::new();
        pages.add_page(AspectRatio::FourThree);
        pages.add_page(AspectRatio::FourThree);
        pages.add_page(AspectRatio::SixteenNine);
        assert_eq!(pages.current_index(), 2);

        pages.delete_page(0);
        assert_eq!(pages.current_index(), 1);
        assert_eq!(pages.len(), 2);

        pages.delete_page(1);
        assert_eq!(pages.current_index(), 0);
    }

    #[test]
    fn deleting_a_later_page_keeps_the_current_index() {
        let mut pages = PageCollection::new();
        pages.add_page(AspectRatio::FourThree);
        pages.add_page(AspectRatio::FourThree);
        pages.select_page(0);
        pages.delete_page(1);
        assert_eq!(pages.current_index(), 0);
        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn switching_pages_hands_over_history() {
        let mut pages = PageCollection::new();
        pages.add_page(AspectRatio::FourThree);
        let stroke = dot(1.0, 1.0);
        {
            let page = pages.current_page_mut().unwrap();
            page.history.push(vec![stroke.clone()]);
        }
        pages.sync_current();

        pages.add_page(AspectRatio::SixteenNine);
        assert!(pages.current_page().unwrap().strokes.is_empty());

        pages.select_page(0);
        let page = pages.current_page().unwrap();
        assert_eq!(page.strokes, vec![stroke]);
        assert!(page.history.can_undo());
    }

    #[test]
    fn select_current_is_a_no_op() {
        let mut pages = PageCollection::new();
        pages.add_page(AspectRatio::FourThree);
        pages.select_page(0);
        assert_eq!(pages.current_index(), 0);
        pages.select_page(9);
        assert_eq!(pages.current_index(), 0);
    }

    #[test]
    fn background_color_bypasses_history() {
        let mut pages = PageCollection::new();
        pages.add_page(AspectRatio::FourThree);
        pages.set_background(Color32::LIGHT_BLUE);
        let page = pages.current_page().unwrap();
        assert_eq!(page.background_color, Color32::LIGHT_BLUE);
        assert!(!page.history.can_undo());
    }
}
