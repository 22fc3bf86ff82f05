use arcstr::ArcStr;
use codespan::FileId;
use indexmap::IndexMap;

use std::path::{Path, PathBuf};

use super::error::IncludeError;
use crate::{Files, Source};

/// Owns every source buffer seen by one translation unit.
///
/// Files read through `#include` are cached by resolved path, so including
/// a header twice reads it from disk once.
pub struct FileManager {
    /// Directories tried, in order, after the including file's own directory.
    pub search_path: Vec<PathBuf>,
    files: Files,
    cache: IndexMap<PathBuf, FileId>,
}

impl Default for FileManager {
    fn default() -> Self {
        Self::new()
    }
}

impl FileManager {
    pub fn new() -> Self {
        Self {
            search_path: Vec::new(),
            files: Files::new(),
            cache: IndexMap::new(),
        }
    }

    pub fn with_search_path<I: IntoIterator<Item = PathBuf>>(mut self, dirs: I) -> Self {
        self.search_path.extend(dirs);
        self
    }

    pub fn add_source(&mut self, name: &str, source: Source) -> FileId {
        self.files.add(name, source)
    }

    pub fn source(&self, id: FileId) -> &Source {
        self.files.source(id)
    }

    pub fn files(&self) -> &Files {
        &self.files
    }

    pub fn into_files(self) -> Files {
        self.files
    }

    fn find_include_path(&self, filename: &Path, current_path: &Path) -> Result<PathBuf, IncludeError> {
        if filename.as_os_str().is_empty() {
            return Err(IncludeError::EmptyInclude);
        }

        let not_found = || {
            Err(IncludeError::FileNotFound(
                filename.to_string_lossy().to_string(),
            ))
        };

        // absolute path, ignore everything except the filename
        // e.g `#include "/usr/local/include/stdio.h"`
        if filename.is_absolute() {
            return if filename.exists() {
                Ok(filename.to_owned())
            } else {
                not_found()
            };
        }

        // local include: #include "dict.h"
        let relative_path = current_path.parent().unwrap_or_else(|| Path::new(""));
        let resolved = relative_path.join(filename);
        if resolved.exists() {
            return Ok(resolved);
        }

        for path in &self.search_path {
            let buf = path.join(filename);
            if buf.exists() {
                return Ok(buf);
            }
        }

        not_found()
    }

    /// Resolve `filename` as written in `#include "filename"` inside the
    /// file at `current_path`, reading it into the database if needed.
    pub fn include_path(
        &mut self,
        filename: &Path,
        current_path: &Path,
    ) -> Result<(ArcStr, FileId), IncludeError> {
        let path = self.find_include_path(filename, current_path)?;
        if let Some(&id) = self.cache.get(&path) {
            return Ok((self.files.source(id).code.clone(), id));
        }

        log::debug!("reading include file {}", path.display());
        let code = ArcStr::from(
            std::fs::read_to_string(&path).map_err(|err| IncludeError::IO(err.to_string()))?,
        );
        let name = path.to_string_lossy().to_string();
        let id = self.files.add(
            name,
            Source {
                code: code.clone(),
                path: path.clone(),
            },
        );
        self.cache.insert(path, id);

        Ok((code, id))
    }
}
