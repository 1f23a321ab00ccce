use std::path::Path;
use std::sync::Arc;

use ahash::AHashMap;

use crate::{BitmapFont, TextError, builtin_font};

/// Fonts by name. Widgets resolve their font once at construction; a name
/// that isn't here is a wiring mistake and surfaces as
/// [`TextError::FontNotFound`].
#[derive(Clone, Default)]
pub struct FontRegistry {
    fonts: AHashMap<String, Arc<BitmapFont>>,
}

impl FontRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry that already holds the compiled-in 3x5 font.
    pub fn with_builtin() -> Self {
        let mut reg = Self::new();
        reg.insert(builtin_font());
        reg
    }

    pub fn insert(&mut self, font: BitmapFont) -> Arc<BitmapFont> {
        let font = Arc::new(font);
        self.fonts.insert(font.name().to_string(), font.clone());
        font
    }

    /// Loads every `*.bdf` in `dir`, named by file stem. Returns how many
    /// fonts were loaded.
    pub fn load_dir(&mut self, dir: impl AsRef<Path>) -> Result<usize, TextError> {
        let dir = dir.as_ref();
        let io_err = |source| TextError::Io {
            path: dir.to_path_buf(),
            source,
        };
        let mut loaded = 0;
        for entry in std::fs::read_dir(dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if path.extension().is_some_and(|e| e.eq_ignore_ascii_case("bdf")) {
                let font = BitmapFont::load_bdf(&path)?;
                log::info!("loaded font `{}` from {}", font.name(), path.display());
                self.insert(font);
                loaded += 1;
            }
        }
        Ok(loaded)
    }

    pub fn get(&self, name: &str) -> Result<Arc<BitmapFont>, TextError> {
        self.fonts
            .get(name)
            .cloned()
            .ok_or_else(|| TextError::FontNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fonts.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fonts.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BUILTIN_FONT;

    #[test]
    fn test_registry_missing_font_is_an_error() {
        let reg = FontRegistry::with_builtin();
        assert!(reg.get(BUILTIN_FONT).is_ok());
        match reg.get("7x13") {
            Err(TextError::FontNotFound(name)) => assert_eq!(name, "7x13"),
            other => panic!("unexpected {:?}", other.map(|f| f.name().to_string())),
        }
    }

    #[test]
    fn test_registry_load_dir_missing_is_io_error() {
        let mut reg = FontRegistry::new();
        let err = reg.load_dir("/definitely/not/a/font/dir").unwrap_err();
        assert!(matches!(err, TextError::Io { .. }));
    }
}
