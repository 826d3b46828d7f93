//! Document save/load: an ordered list of pages, each serialized as
//! `{id, strokes, backgroundColor, history: {stack, index}, aspectRatio}`.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::pages::{Page, PageCollection};

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to serialize document: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("failed to access document file: {0}")]
    Io(#[from] std::io::Error),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Write the page list as pretty-printed JSON.
pub fn save_document(pages: &PageCollection, path: &Path) -> PersistenceResult<()> {
    let json = serde_json::to_string_pretty(pages.pages())?;
    fs::write(path, json)?;
    log::info!("saved {} page(s) to {}", pages.len(), path.display());
    Ok(())
}

/// Read a page list back; the first page becomes current.
pub fn load_document(path: &Path) -> PersistenceResult<PageCollection> {
    let json = fs::read_to_string(path)?;
    let pages: Vec<Page> = serde_json::from_str(&json)?;
    log::info!("loaded {} page(s) from {}", pages.len(), path.display());
    Ok(PageCollection::from_pages(pages))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::AspectRatio;
    use crate::stroke::{PenConfig, Stroke, StrokeGeometry};
    use egui::Pos2;

    #[test]
    fn document_round_trips_through_json() {
        let mut pages = PageCollection::new();
        pages.add_page(AspectRatio::SixteenNine);
        {
            let page = pages.current_page_mut().unwrap();
            page.history.push(vec![Stroke::new(
                PenConfig::default(),
                StrokeGeometry::Path {
                    points: vec![Pos2::new(1.0, 2.0), Pos2::new(3.0, 4.0)],
                },
            )]);
        }
        pages.sync_current();

        let path = std::env::temp_dir().join("whiteboard-persistence-test.json");
        save_document(&pages, &path).unwrap();
        let loaded = load_document(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(loaded.pages(), pages.pages());
        assert_eq!(loaded.current_index(), 0);
    }

    #[test]
    fn page_layout_uses_camel_case_fields() {
        let page = Page::new(AspectRatio::FourThree);
        let json = serde_json::to_value(&page).unwrap();
        assert!(json.get("backgroundColor").is_some());
        assert!(json.get("aspectRatio").is_some());
        assert_eq!(json["aspectRatio"], "4:3");
        assert_eq!(json["history"]["index"], 0);
        assert_eq!(json["history"]["stack"].as_array().unwrap().len(), 1);
    }
}
