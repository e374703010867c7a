//! JSON file session store

use crate::Result;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tlv_core::{SessionParams, SessionStore};
use tracing::debug;

const DEFAULT_FILE_NAME: &str = "timeline_params.json";

/// Persists [`SessionParams`] as a small JSON document on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store named `timeline_params.json` inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(DEFAULT_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Option<SessionParams>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let params: SessionParams = serde_json::from_reader(BufReader::new(file))?;
        debug!(path = %self.path.display(), ?params, "session params loaded");
        Ok(Some(params))
    }

    fn write(&self, params: &SessionParams) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        // the temp file is removed on drop unless persisted over the target
        let mut tmp = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer(&mut writer, params)?;
            writer.flush()?;
        }
        tmp.persist(&self.path).map_err(|e| e.error)?;
        debug!(path = %self.path.display(), ?params, "session params saved");
        Ok(())
    }
}

impl SessionStore for JsonFileStore {
    fn load(&self) -> tlv_core::Result<Option<SessionParams>> {
        Ok(self.read()?)
    }

    fn save(&mut self, params: &SessionParams) -> tlv_core::Result<()> {
        Ok(self.write(params)?)
    }
}
