//! Font discovery: a process-wide, build-once index of font files by file stem.
//!
//! The index is built on the first name lookup and never invalidated. It is only consulted by the
//! text collaborators; effects and compositing never touch it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use crate::foundation::error::{KinetextError, KinetextResult};

/// Extra font directories, separated like `PATH`.
pub const FONT_DIRS_ENV: &str = "KINETEXT_FONT_DIRS";

/// Names tried, in order, when no font is requested.
pub const FALLBACK_FONTS: &[&str] = &["Arial Bold", "Impact", "Arial", "DejaVu Sans Bold", "Helvetica"];

const FONT_EXTENSIONS: &[&str] = &["ttf", "otf", "ttc"];

const ALIASES: &[(&str, &[&str])] = &[
    ("arial", &["arial", "arialmt"]),
    ("arial bold", &["arialbd", "arial-bold", "arial_bold", "arialmt-bold"]),
    ("arial black", &["ariblk", "arial-black"]),
    ("impact", &["impact"]),
    ("times new roman", &["times", "timesnewroman", "timesnewromanpsmt"]),
    ("times new roman bold", &["timesbd", "timesnewromanps-boldmt"]),
    ("courier new", &["cour", "couriernew"]),
    ("courier new bold", &["courbd", "couriernew-bold"]),
    ("comic sans ms", &["comic", "comicsansms"]),
    ("verdana", &["verdana"]),
    ("verdana bold", &["verdanabd", "verdana-bold"]),
    ("tahoma", &["tahoma"]),
    ("tahoma bold", &["tahomabd", "tahoma-bold"]),
    ("georgia", &["georgia"]),
    ("georgia bold", &["georgiabd", "georgia-bold"]),
    ("trebuchet ms", &["trebuc", "trebuchetms"]),
    ("segoe ui", &["segoeui"]),
    ("segoe ui bold", &["segoeuib", "segoeui-bold"]),
    ("calibri", &["calibri"]),
    ("calibri bold", &["calibrib", "calibri-bold"]),
    ("consolas", &["consola", "consolas"]),
    ("dejavu sans", &["dejavusans"]),
    ("dejavu sans bold", &["dejavusans-bold"]),
    ("liberation sans", &["liberationsans-regular", "liberationsans"]),
    ("liberation sans bold", &["liberationsans-bold"]),
    ("helvetica", &["helvetica"]),
    ("helvetica bold", &["helvetica-bold"]),
    ("roboto", &["roboto-regular", "roboto"]),
    ("roboto bold", &["roboto-bold"]),
    ("noto sans", &["notosans-regular", "notosans"]),
    ("noto sans bold", &["notosans-bold"]),
];

/// What the caller asked for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FontRequest {
    /// Walk [`FALLBACK_FONTS`], then the system default sans-serif face.
    Default,
    /// Family-style name such as `"Impact"` or `"Arial Bold"`.
    Name(String),
    /// Explicit font file.
    Path(PathBuf),
}

impl FontRequest {
    /// Paths are recognized by a separator or a font file extension.
    pub fn parse(spec: Option<&str>) -> Self {
        let Some(spec) = spec.map(str::trim).filter(|s| !s.is_empty()) else {
            return Self::Default;
        };
        let lower = spec.to_ascii_lowercase();
        let has_ext = [".ttf", ".otf", ".ttc", ".woff"]
            .iter()
            .any(|ext| lower.ends_with(ext));
        if spec.contains(std::path::MAIN_SEPARATOR) || spec.contains('/') || has_ext {
            Self::Path(PathBuf::from(spec))
        } else {
            Self::Name(spec.to_string())
        }
    }
}

/// Font bytes ready for shaping and rasterization.
#[derive(Clone, Debug)]
pub struct LoadedFont {
    /// Where the bytes came from (file path or family name).
    pub source: String,
    pub data: Arc<Vec<u8>>,
}

/// Lowercase file stem → font path, first file found wins.
#[derive(Debug, Default)]
pub struct FontIndex {
    entries: Vec<(String, PathBuf)>,
    by_stem: HashMap<String, usize>,
}

static GLOBAL_INDEX: OnceLock<FontIndex> = OnceLock::new();

impl FontIndex {
    /// The process-wide index, built on first use.
    pub fn global() -> &'static FontIndex {
        GLOBAL_INDEX.get_or_init(|| {
            let index = Self::build(&default_font_dirs(), cfg!(target_os = "linux"));
            tracing::debug!(fonts = index.len(), "font index built");
            index
        })
    }

    /// Walk `dirs` recursively; optionally also ingest `fc-list` output.
    pub fn build(dirs: &[PathBuf], use_fc_list: bool) -> Self {
        let mut index = Self::default();
        for dir in dirs {
            index.walk(dir);
        }
        if use_fc_list {
            index.ingest_fc_list();
        }
        index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Register one file; returns `false` when the stem is already taken or the file is not a font.
    pub fn insert(&mut self, path: &Path) -> bool {
        let Some(stem) = font_stem(path) else {
            return false;
        };
        if self.by_stem.contains_key(&stem) {
            return false;
        }
        self.by_stem.insert(stem.clone(), self.entries.len());
        self.entries.push((stem, path.to_path_buf()));
        true
    }

    /// Resolve a human-friendly name to a font file.
    ///
    /// Lookup order: exact stem, stem with separators removed, alias table, substring.
    pub fn find(&self, name: &str) -> Option<&Path> {
        let key = name.trim().to_lowercase();
        if let Some(&i) = self.by_stem.get(&key) {
            return Some(&self.entries[i].1);
        }

        let collapsed = collapse(&key, true);
        if let Some((_, path)) = self
            .entries
            .iter()
            .find(|(stem, _)| collapse(stem, true) == collapsed)
        {
            return Some(path);
        }

        if let Some((_, stems)) = ALIASES.iter().find(|(alias, _)| *alias == key) {
            for stem in *stems {
                if let Some(&i) = self.by_stem.get(*stem) {
                    return Some(&self.entries[i].1);
                }
                let alias_c = collapse(stem, false);
                if let Some((_, path)) = self
                    .entries
                    .iter()
                    .find(|(s, _)| collapse(s, false) == alias_c)
                {
                    return Some(path);
                }
            }
        }

        if collapsed.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|(stem, _)| collapse(stem, false).contains(&collapsed))
            .map(|(_, path)| path.as_path())
    }

    fn walk(&mut self, dir: &Path) {
        let Ok(read) = std::fs::read_dir(dir) else {
            return;
        };
        let mut children: Vec<PathBuf> = read.filter_map(|e| e.ok().map(|e| e.path())).collect();
        children.sort();
        for path in children {
            if path.is_dir() {
                self.walk(&path);
            } else {
                self.insert(&path);
            }
        }
    }

    fn ingest_fc_list(&mut self) {
        let output = std::process::Command::new("fc-list")
            .args(["--format", "%{file}\\n"])
            .output();
        let Ok(output) = output else {
            return;
        };
        if !output.status.success() {
            return;
        }
        let text = String::from_utf8_lossy(&output.stdout);
        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            self.insert(Path::new(line));
        }
    }
}

fn font_stem(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    if !FONT_EXTENSIONS.contains(&ext.as_str()) {
        return None;
    }
    Some(path.file_stem()?.to_str()?.to_lowercase())
}

fn collapse(s: &str, spaces: bool) -> String {
    s.chars()
        .filter(|&c| c != '-' && c != '_' && !(spaces && c == ' '))
        .collect()
}

/// Per-OS font directories plus anything listed in [`FONT_DIRS_ENV`].
pub fn default_font_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Some(extra) = std::env::var_os(FONT_DIRS_ENV) {
        dirs.extend(std::env::split_paths(&extra));
    }
    let home = std::env::var_os("HOME").map(PathBuf::from);
    if cfg!(target_os = "windows") {
        let windir = std::env::var_os("WINDIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(r"C:\Windows"));
        dirs.push(windir.join("Fonts"));
        if let Some(local) = std::env::var_os("LOCALAPPDATA") {
            dirs.push(PathBuf::from(local).join("Microsoft").join("Windows").join("Fonts"));
        }
    } else if cfg!(target_os = "macos") {
        dirs.push(PathBuf::from("/System/Library/Fonts"));
        dirs.push(PathBuf::from("/Library/Fonts"));
        if let Some(home) = &home {
            dirs.push(home.join("Library/Fonts"));
        }
    } else {
        dirs.push(PathBuf::from("/usr/share/fonts"));
        dirs.push(PathBuf::from("/usr/local/share/fonts"));
        if let Some(home) = &home {
            dirs.push(home.join(".local/share/fonts"));
            dirs.push(home.join(".fonts"));
        }
    }
    dirs
}

fn read_font(path: &Path, request: &str) -> KinetextResult<LoadedFont> {
    let data = std::fs::read(path).map_err(|e| {
        tracing::debug!(path = %path.display(), error = %e, "font read failed");
        KinetextError::font_not_found(request)
    })?;
    Ok(LoadedFont {
        source: path.display().to_string(),
        data: Arc::new(data),
    })
}

/// Resolve a request against `index`.
///
/// Explicit names and paths that cannot be read fail with `FontNotFound`. A default request walks
/// [`FALLBACK_FONTS`] and then asks the system for its default sans-serif face; only when that also
/// fails is `FontNotFound` returned.
pub fn resolve_font_in(index: &FontIndex, request: &FontRequest) -> KinetextResult<LoadedFont> {
    match request {
        FontRequest::Path(path) => read_font(path, &path.display().to_string()),
        FontRequest::Name(name) => {
            let path = index
                .find(name)
                .ok_or_else(|| KinetextError::font_not_found(name.clone()))?;
            read_font(path, name)
        }
        FontRequest::Default => {
            for name in FALLBACK_FONTS {
                if let Some(path) = index.find(name)
                    && let Ok(font) = read_font(path, name)
                {
                    return Ok(font);
                }
            }
            tracing::warn!("no fallback font found; using the system default face");
            system_default_font()
                .ok_or_else(|| KinetextError::font_not_found("system default sans-serif"))
        }
    }
}

/// [`resolve_font_in`] against the process-wide index.
pub fn resolve_font(request: &FontRequest) -> KinetextResult<LoadedFont> {
    resolve_font_in(FontIndex::global(), request)
}

fn system_default_font() -> Option<LoadedFont> {
    use parley::fontique::{Collection, CollectionOptions, GenericFamily, SourceCache};

    let mut collection = Collection::new(CollectionOptions::default());
    let mut source_cache = SourceCache::default();
    let family_id = collection
        .generic_families(GenericFamily::SansSerif)
        .next()?;
    let family = collection.family(family_id)?;
    let font = family.default_font()?;
    let blob = font.load(Some(&mut source_cache))?;
    Some(LoadedFont {
        source: family.name().to_string(),
        data: Arc::new(blob.data().to_vec()),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/text/font.rs"]
mod tests;
