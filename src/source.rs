use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Input not found: {0}")]
    NotFound(String),

    #[error("Failed to read {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Something that can hand the chunker a document's text.
///
/// Decoding happens here; the chunker only ever sees `&str`.
pub trait TextSource: Send + Sync {
    /// Display name used in logs and output records
    fn name(&self) -> &str;

    fn read_text(&self) -> Result<String, SourceError>;
}

/// A document on disk
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    name: String,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.to_string_lossy().into_owned();
        Self { path, name }
    }

    /// Name the file relative to the directory it was found under
    fn relative_to(path: PathBuf, root: &Path) -> Self {
        let name = path
            .strip_prefix(root)
            .unwrap_or(&path)
            .to_string_lossy()
            .into_owned();
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TextSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_text(&self) -> Result<String, SourceError> {
        let bytes = std::fs::read(&self.path).map_err(|source| SourceError::Io {
            name: self.name.clone(),
            source,
        })?;
        Ok(decode(&self.name, bytes))
    }
}

/// Standard input, read once
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinSource;

impl TextSource for StdinSource {
    fn name(&self) -> &str {
        "<stdin>"
    }

    fn read_text(&self) -> Result<String, SourceError> {
        let mut bytes = Vec::new();
        std::io::stdin()
            .read_to_end(&mut bytes)
            .map_err(|source| SourceError::Io {
                name: self.name().to_string(),
                source,
            })?;
        Ok(decode(self.name(), bytes))
    }
}

/// Text already held in memory
#[derive(Debug, Clone)]
pub struct StringSource {
    name: String,
    text: String,
}

impl StringSource {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

impl TextSource for StringSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_text(&self) -> Result<String, SourceError> {
        Ok(self.text.clone())
    }
}

/// Valid UTF-8 is used as-is; anything else is decoded lossily
fn decode(name: &str, bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            warn!(source = name, "input is not valid UTF-8, decoding lossily");
            String::from_utf8_lossy(err.as_bytes()).into_owned()
        }
    }
}

/// Directories never worth descending into
const IGNORED_DIRS: [&str; 10] = [
    ".git",
    ".svn",
    ".hg",
    "target",
    "node_modules",
    "__pycache__",
    ".venv",
    "venv",
    "build",
    "dist",
];

/// Extensions treated as plain text when walking a directory
const TEXT_EXTENSIONS: [&str; 10] = [
    "txt", "text", "md", "markdown", "rst", "adoc", "org", "csv", "log", "html",
];

/// Check if a path should be skipped while walking
pub fn should_ignore(path: &Path) -> bool {
    path.components().any(|component| {
        component
            .as_os_str()
            .to_str()
            .is_some_and(|part| IGNORED_DIRS.contains(&part))
    })
}

/// Whether a walked file looks like prose worth chunking
pub fn is_text_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| TEXT_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Expand input paths into file sources.
///
/// Files named explicitly are always taken; directories are walked in file
/// name order, keeping only text files outside ignored directories.
pub fn collect_sources(paths: &[PathBuf]) -> Result<Vec<FileSource>, SourceError> {
    let mut sources = Vec::new();

    for path in paths {
        if path.is_file() {
            sources.push(FileSource::new(path.clone()));
            continue;
        }

        if !path.is_dir() {
            return Err(SourceError::NotFound(path.display().to_string()));
        }

        debug!(root = %path.display(), "scanning directory");
        let before = sources.len();

        for entry in WalkDir::new(path)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !should_ignore(e.path().strip_prefix(path).unwrap_or(e.path())))
        {
            let entry = entry?;
            if entry.file_type().is_file() && is_text_file(entry.path()) {
                sources.push(FileSource::relative_to(entry.into_path(), path));
            }
        }

        debug!(
            root = %path.display(),
            files = sources.len() - before,
            "directory scan complete"
        );
    }

    Ok(sources)
}
