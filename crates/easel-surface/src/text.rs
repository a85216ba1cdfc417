//! Font resolution and text rasterization.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use easel_graphics::{Color, FontSpec};
use once_cell::sync::Lazy;
use rusttype::{point, Font, Scale};

use crate::canvas::Canvas;
use crate::error::{DrawError, FontError};

/// Glyph coverage at or above this value marks a pixel as drawn.
const COVERAGE_THRESHOLD: f32 = 0.5;
const SEARCH_DEPTH: usize = 4;

static FONT_BOOK: Lazy<FontBook> = Lazy::new(FontBook::new);

/// Process-wide font registry shared by every surface.
pub fn font_book() -> &'static FontBook {
    &FONT_BOOK
}

/// Registers font data under `family` in the process-wide [`FontBook`].
pub fn register_font(family: &str, bytes: Vec<u8>) -> Result<(), FontError> {
    font_book().register(family, bytes)
}

pub struct FontBook {
    fonts: RwLock<HashMap<String, Arc<Font<'static>>>>,
    /// Families that resolved to nothing; cleared when registered.
    missing: RwLock<HashSet<String>>,
}

impl FontBook {
    fn new() -> Self {
        Self {
            fonts: RwLock::new(HashMap::new()),
            missing: RwLock::new(HashSet::new()),
        }
    }

    pub fn register(&self, family: &str, bytes: Vec<u8>) -> Result<(), FontError> {
        let font = Font::try_from_vec(bytes).ok_or_else(|| FontError::Invalid {
            family: family.to_string(),
        })?;
        let key = family.to_lowercase();
        self.missing
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&key);
        self.fonts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, Arc::new(font));
        log::debug!("registered font family `{family}`");
        Ok(())
    }

    pub fn load_file(&self, family: &str, path: impl AsRef<Path>) -> Result<(), FontError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| FontError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.register(family, bytes)
    }

    /// Resolves a family: registered names first, then a file path, then
    /// the system font directories, then generic fallbacks.
    pub fn resolve(&self, family: &str) -> Option<Arc<Font<'static>>> {
        let key = family.to_lowercase();
        if let Some(font) = self
            .fonts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Some(Arc::clone(font));
        }
        if self
            .missing
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&key)
        {
            return None;
        }
        let font = self.search(family, &key);
        if font.is_none() {
            log::debug!("no font found for family `{family}`");
            self.missing
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(key);
        }
        font
    }

    fn search(&self, family: &str, key: &str) -> Option<Arc<Font<'static>>> {
        let path = Path::new(family);
        let found = if path.is_file() {
            Some(path.to_path_buf())
        } else {
            find_system_font(family).or_else(|| {
                generic_candidates(key)
                    .iter()
                    .find_map(|candidate| find_system_font(candidate))
            })
        }?;
        match self.load_file(family, &found) {
            Ok(()) => self
                .fonts
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .get(key)
                .cloned(),
            Err(err) => {
                log::warn!("failed to load font {}: {err}", found.display());
                None
            }
        }
    }
}

fn generic_candidates(family: &str) -> &'static [&'static str] {
    match family {
        "monospace" | "mono" | "fixed" => &[
            "DejaVuSansMono",
            "LiberationMono-Regular",
            "NotoSansMono-Regular",
            "consola",
            "Menlo",
            "cour",
        ],
        "sans-serif" | "sans" => &[
            "DejaVuSans",
            "LiberationSans-Regular",
            "NotoSans-Regular",
            "arial",
            "Helvetica",
        ],
        "serif" => &[
            "DejaVuSerif",
            "LiberationSerif-Regular",
            "NotoSerif-Regular",
            "times",
        ],
        _ => &[],
    }
}

fn font_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![
        PathBuf::from("/usr/share/fonts"),
        PathBuf::from("/usr/local/share/fonts"),
        PathBuf::from("/Library/Fonts"),
        PathBuf::from("/System/Library/Fonts"),
        PathBuf::from(r"C:\Windows\Fonts"),
    ];
    if let Some(home) = std::env::var_os("HOME") {
        let home = PathBuf::from(home);
        dirs.push(home.join(".fonts"));
        dirs.push(home.join(".local/share/fonts"));
    }
    dirs
}

fn find_system_font(family: &str) -> Option<PathBuf> {
    let wanted = family.replace(' ', "").to_lowercase();
    font_dirs()
        .iter()
        .find_map(|dir| search_dir(dir, &wanted, SEARCH_DEPTH))
}

fn search_dir(dir: &Path, wanted: &str, depth: usize) -> Option<PathBuf> {
    let entries = fs::read_dir(dir).ok()?;
    let mut nested = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            nested.push(path);
            continue;
        }
        let is_font = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| matches!(ext.to_lowercase().as_str(), "ttf" | "otf"))
            .unwrap_or(false);
        let stem = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map(|stem| stem.replace(' ', "").to_lowercase());
        if is_font && stem.as_deref() == Some(wanted) {
            return Some(path);
        }
    }
    if depth == 0 {
        return None;
    }
    nested
        .iter()
        .find_map(|path| search_dir(path, wanted, depth - 1))
}

/// Font part of a canvas' drawing state.
#[derive(Clone, Default)]
pub(crate) struct FontState {
    pub(crate) spec: FontSpec,
    face: Option<Arc<Font<'static>>>,
}

impl Canvas {
    pub fn font(&self) -> &FontSpec {
        &self.font.spec
    }

    /// Selects the text font. Fails, leaving the state unchanged, if the
    /// family cannot be resolved.
    pub fn set_font(&mut self, size: f32, family: &str, color: Color) -> Result<(), DrawError> {
        let face = font_book()
            .resolve(family)
            .ok_or_else(|| DrawError::FontUnavailable {
                family: family.to_string(),
            })?;
        self.font = FontState {
            spec: FontSpec::new(size, family, color),
            face: Some(face),
        };
        Ok(())
    }

    /// Draws `text` with its top-left corner at `(x, y)`. Newlines start a new line.
    pub fn text(&mut self, x: i32, y: i32, text: &str) -> Result<(), DrawError> {
        let face = match &self.font.face {
            Some(face) => Arc::clone(face),
            None => {
                let face = font_book().resolve(&self.font.spec.family).ok_or_else(|| {
                    DrawError::FontUnavailable {
                        family: self.font.spec.family.clone(),
                    }
                })?;
                self.font.face = Some(Arc::clone(&face));
                face
            }
        };
        let color = self.font.spec.color;
        let scale = Scale::uniform(self.font.spec.size);
        let v_metrics = face.v_metrics(scale);
        let line_height = v_metrics.ascent - v_metrics.descent + v_metrics.line_gap;
        for (row, line) in text.lines().enumerate() {
            let baseline = y as f32 + v_metrics.ascent + line_height * row as f32;
            for glyph in face.layout(line, scale, point(x as f32, baseline)) {
                let Some(bb) = glyph.pixel_bounding_box() else {
                    continue;
                };
                glyph.draw(|gx, gy, coverage| {
                    if coverage >= COVERAGE_THRESHOLD {
                        self.touch(bb.min.x + gx as i32, bb.min.y + gy as i32, color);
                    }
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_family_is_rejected_and_state_kept() {
        let mut canvas = Canvas::new(32, 32).unwrap();
        let before = canvas.font().clone();
        let err = canvas
            .set_font(12.0, "no-such-family-for-easel-tests", Color::RED)
            .unwrap_err();
        assert!(matches!(err, DrawError::FontUnavailable { .. }));
        assert_eq!(canvas.font(), &before);
    }

    #[test]
    fn text_is_anchored_below_its_origin() {
        let mut canvas = Canvas::new(200, 80).unwrap();
        if canvas.set_font(24.0, "sans-serif", Color::BLUE).is_err() {
            // No system font to render with.
            return;
        }
        canvas.text(4, 10, "Easel\nfonts").unwrap();
        assert!(canvas.touched_count() > 0);
        for y in 0..80 {
            for x in 0..200 {
                if canvas.is_touched(x, y) {
                    assert!(y >= 8, "glyph pixel above the origin at ({x}, {y})");
                    assert_eq!(canvas.color_at(x, y), Some(Color::BLUE.to_rgba()));
                }
            }
        }
        let second_line = (0..200).any(|x| (40..80).any(|y| canvas.is_touched(x, y)));
        assert!(second_line);
    }

    #[test]
    fn failed_lookups_are_remembered() {
        let book = FontBook::new();
        assert!(book.resolve("No-Such-Family-For-Easel-Cache").is_none());
        assert!(book
            .missing
            .read()
            .unwrap()
            .contains("no-such-family-for-easel-cache"));
        assert!(book.resolve("no-such-family-for-easel-cache").is_none());

        assert!(book
            .register("no-such-family-for-easel-cache", vec![1, 2, 3])
            .is_err());
        assert_eq!(book.missing.read().unwrap().len(), 1);
    }

    #[test]
    fn invalid_font_bytes_are_rejected() {
        let err = register_font("broken", vec![0, 1, 2, 3]).unwrap_err();
        assert!(matches!(err, FontError::Invalid { .. }));
    }
}
