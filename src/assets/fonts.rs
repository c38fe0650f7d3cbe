use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use usvg::fontdb;

use crate::foundation::error::{OliveError, OliveResult};
use crate::request::options::{ImageKind, ImageRequest};

/// Font faces available to the text renderer.
///
/// Registration happens up front, once per run; rendering only reads from the book.
#[derive(Clone, Debug)]
pub struct FontBook {
    db: Arc<fontdb::Database>,
    /// Requested family name -> family name of a registered font file.
    aliases: HashMap<String, String>,
}

impl FontBook {
    /// A book with no faces at all.
    pub fn empty() -> Self {
        Self {
            db: Arc::new(fontdb::Database::new()),
            aliases: HashMap::new(),
        }
    }

    /// A book holding every font installed on the host.
    pub fn system() -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "loaded system fonts");
        Self {
            db: Arc::new(db),
            aliases: HashMap::new(),
        }
    }

    /// Prepare the fonts `req` needs.
    ///
    /// Non-text images need none, so nothing is loaded for them.
    pub fn for_request(req: &ImageRequest) -> OliveResult<Self> {
        if req.kind() != ImageKind::Text {
            return Ok(Self::empty());
        }

        let mut book = Self::system();
        if let Some(path) = req.font_file() {
            book.register_file(path, req.font())?;
        }
        book.resolve_family(req.font())?;
        Ok(book)
    }

    /// Load the faces in `path` and make them answer to `family`.
    pub fn register_file(&mut self, path: &Path, family: &str) -> OliveResult<()> {
        let data = std::fs::read(path).map_err(|e| {
            OliveError::font(format!("cannot read font file '{}': {e}", path.display()))
        })?;

        let db = Arc::make_mut(&mut self.db);
        let before = db.len();
        db.load_font_data(data);

        let Some(face) = db.faces().nth(before) else {
            return Err(OliveError::font(format!(
                "font file '{}' contains no usable faces",
                path.display()
            )));
        };
        let Some((actual, _)) = face.families.first() else {
            return Err(OliveError::font(format!(
                "font file '{}' has no family name",
                path.display()
            )));
        };

        tracing::debug!(requested = family, actual = %actual, "registered font file");
        self.aliases.insert(family.to_owned(), actual.clone());
        Ok(())
    }

    /// Map a requested family to the concrete family name of an available face.
    pub fn resolve_family(&self, family: &str) -> OliveResult<String> {
        if let Some(actual) = self.aliases.get(family) {
            return Ok(actual.clone());
        }

        let wanted = match family.to_ascii_lowercase().as_str() {
            "serif" => fontdb::Family::Serif,
            "sans-serif" => fontdb::Family::SansSerif,
            "monospace" => fontdb::Family::Monospace,
            "cursive" => fontdb::Family::Cursive,
            "fantasy" => fontdb::Family::Fantasy,
            _ => fontdb::Family::Name(family),
        };
        let query = fontdb::Query {
            families: &[wanted],
            ..fontdb::Query::default()
        };

        self.db
            .query(&query)
            .and_then(|id| self.db.face(id))
            .and_then(|face| face.families.first())
            .map(|(name, _)| name.clone())
            .ok_or_else(|| {
                OliveError::font(format!(
                    "font family \"{family}\" is not available; install it or pass --font-file"
                ))
            })
    }

    /// Shared handle for the SVG rasterizer.
    pub fn database(&self) -> Arc<fontdb::Database> {
        Arc::clone(&self.db)
    }

    /// Number of loaded faces.
    pub fn face_count(&self) -> usize {
        self.db.len()
    }

    /// Distinct family names of the loaded faces, sorted.
    pub fn families(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .db
            .faces()
            .filter_map(|face| face.families.first())
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
