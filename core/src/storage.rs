use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::model::task::Task;
use crate::store::TaskStore;

const FORMAT_VERSION: u32 = 1;
const DEFAULT_FILE_NAME: &str = "tasks.json";

/// On-disk envelope. Versioned so a schema change is a detectable `Format`
/// error instead of a silently misread file.
#[derive(Serialize, Deserialize)]
struct TaskFile {
    version: u32,
    tasks: Vec<Task>,
}

/// Default data file, `~/.nudge/tasks.json`. Creates the directory on first
/// use.
pub fn default_data_file() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or(Error::NoHomeDir)?;
    let dir = home.join(".nudge");
    fs::create_dir_all(&dir).map_err(|source| Error::Io {
        path: dir.clone(),
        source,
    })?;
    Ok(dir.join(DEFAULT_FILE_NAME))
}

impl TaskStore {
    /// Writes the whole task sequence to `path`, replacing any existing
    /// file. The content goes to a temp file first and is renamed into
    /// place, so a later load sees either the old sequence or the new one,
    /// never a partial write.
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = TaskFile {
            version: FORMAT_VERSION,
            tasks: self.list().to_vec(),
        };
        let json = serde_json::to_string_pretty(&file).map_err(|e| Error::Format {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let io_err = |source| Error::Io {
            path: path.to_path_buf(),
            source,
        };

        let tmp = path.with_extension("tmp");
        {
            let mut out = File::create(&tmp).map_err(io_err)?;
            out.write_all(json.as_bytes()).map_err(io_err)?;
            out.sync_all().map_err(io_err)?;
        }
        fs::rename(&tmp, path).map_err(io_err)?;

        debug!(path = %path.display(), tasks = file.tasks.len(), "saved task file");
        Ok(())
    }

    /// Replaces the in-memory sequence with the file's content.
    /// All-or-nothing: on any failure the store is left as it was.
    pub fn load(&mut self, path: &Path) -> Result<()> {
        let content = fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                Error::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                Error::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let file: TaskFile = serde_json::from_str(&content).map_err(|e| Error::Format {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        if file.version != FORMAT_VERSION {
            return Err(Error::Format {
                path: path.to_path_buf(),
                reason: format!("unsupported schema version {}", file.version),
            });
        }

        debug!(path = %path.display(), tasks = file.tasks.len(), "loaded task file");
        self.replace_all(file.tasks);
        Ok(())
    }
}
