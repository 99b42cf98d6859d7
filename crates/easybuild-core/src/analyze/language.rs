//! Source language classification.

use std::path::Path;

use rustc_hash::FxHashMap;

/// Languages the analyzer knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    C,
    Cpp,
    Asm,
}

impl Language {
    /// Human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::C => "C",
            Self::Cpp => "C++",
            Self::Asm => "assembly",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Immutable mapping from lower-case file extension to [`Language`].
#[derive(Debug, Clone)]
pub struct LanguageTable {
    extensions: FxHashMap<&'static str, Language>,
}

impl Default for LanguageTable {
    fn default() -> Self {
        let mut extensions = FxHashMap::default();
        let mut install = |language: Language, exts: &[&'static str]| {
            for ext in exts {
                extensions.insert(*ext, language);
            }
        };
        install(Language::C, &["c"]);
        install(Language::Cpp, &["cc", "cpp", "cxx", "c++"]);
        install(Language::Asm, &["s", "asm", "nas"]);

        Self { extensions }
    }
}

impl LanguageTable {
    /// Classify a path by its extension, ignoring case.
    pub fn classify(&self, path: &Path) -> Option<Language> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        self.extensions.get(ext.as_str()).copied()
    }
}
