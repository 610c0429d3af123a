use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use usvg::fontdb;

use crate::model::style::{FontFamily, FontWeight};

/// One concrete font face, ready for shaping and glyph rendering.
#[derive(Clone, Debug)]
pub struct FontFace {
    /// Family name as the face reports it.
    pub family_name: String,
    pub weight: u16,
    /// Face index inside a collection file.
    pub index: u32,
    pub data: Arc<Vec<u8>>,
}

/// Font lookup by design family and weight over a `fontdb` database.
///
/// A family the database lacks falls back to a generic serif/sans face; with no usable face
/// at all, lookups return `None` and text is measured but not drawn.
pub struct FontBook {
    db: fontdb::Database,
    cache: HashMap<(FontFamily, u16), Option<Arc<FontFace>>>,
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field("faces", &self.db.len())
            .field("cached", &self.cache.len())
            .finish()
    }
}

impl FontBook {
    pub fn empty() -> Self {
        Self {
            db: fontdb::Database::new(),
            cache: HashMap::new(),
        }
    }

    /// System fonts (optional) plus every font file directly inside `dirs`, in order.
    pub fn load(system_fonts: bool, dirs: &[&Path]) -> Self {
        let mut book = Self::empty();
        if system_fonts {
            book.db.load_system_fonts();
        }
        for dir in dirs {
            book.load_dir(dir);
        }
        tracing::debug!(faces = book.db.len(), "font book loaded");
        book
    }

    pub fn load_dir(&mut self, dir: &Path) {
        let Ok(rd) = std::fs::read_dir(dir) else {
            return;
        };
        for entry in rd.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
                continue;
            };
            let ext = ext.to_ascii_lowercase();
            if ext != "ttf" && ext != "otf" && ext != "ttc" {
                continue;
            }
            if let Err(err) = self.db.load_font_file(&path) {
                tracing::warn!(path = %path.display(), error = %err, "skipping unreadable font");
            }
        }
        self.cache.clear();
    }

    pub fn load_font_data(&mut self, data: Vec<u8>) {
        self.db.load_font_data(data);
        self.cache.clear();
    }

    pub fn face_count(&self) -> usize {
        self.db.len()
    }

    pub fn resolve(&mut self, family: FontFamily, weight: FontWeight) -> Option<Arc<FontFace>> {
        let key = (family, weight.0);
        if let Some(hit) = self.cache.get(&key) {
            return hit.clone();
        }
        let face = self.query(family, weight);
        self.cache.insert(key, face.clone());
        face
    }

    fn query(&self, family: FontFamily, weight: FontWeight) -> Option<Arc<FontFace>> {
        let generic = if is_serif(family) {
            fontdb::Family::Serif
        } else {
            fontdb::Family::SansSerif
        };
        let families = [fontdb::Family::Name(family.name()), generic];
        let query = fontdb::Query {
            families: &families,
            weight: fontdb::Weight(weight.0),
            stretch: fontdb::Stretch::Normal,
            style: fontdb::Style::Normal,
        };
        let Some(id) = self.db.query(&query).or_else(|| self.db.faces().next().map(|f| f.id))
        else {
            tracing::warn!(family = family.name(), "no font faces available; text will not be drawn");
            return None;
        };
        let info = self.db.face(id)?;
        let family_name = info
            .families
            .first()
            .map(|(name, _)| name.clone())
            .unwrap_or_else(|| family.name().to_string());
        if !info.families.iter().any(|(name, _)| name == family.name()) {
            tracing::warn!(requested = family.name(), using = %family_name, "font family not installed");
        }
        let weight = info.weight.0;
        let (data, index) = self
            .db
            .with_face_data(id, |data, index| (data.to_vec(), index))?;
        Some(Arc::new(FontFace {
            family_name,
            weight,
            index,
            data: Arc::new(data),
        }))
    }
}

impl Default for FontBook {
    fn default() -> Self {
        Self::empty()
    }
}

fn is_serif(family: FontFamily) -> bool {
    matches!(
        family,
        FontFamily::NotoSerifTc | FontFamily::ShipporiMincho | FontFamily::PlayfairDisplay
    )
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
