//! Reads and writes `user-config.json`.

use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use crate::{ConfigError, UserConfig};

/// File name of the persisted config inside the app data directory.
pub const CONFIG_FILE_NAME: &str = "user-config.json";

/// Owns the config file location and the last loaded or saved value.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    current: Option<UserConfig>,
}

impl ConfigStore {
    /// Creates a store backed by an explicit file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            current: None,
        }
    }

    /// Creates a store for `<dir>/user-config.json`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(CONFIG_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The cached config from the last successful `load` or `save`.
    pub fn current(&self) -> Option<&UserConfig> {
        self.current.as_ref()
    }

    /// Loads the config from disk.
    ///
    /// A missing file is the first-run case and yields `Ok(None)`.
    /// Unparseable content is returned as [`ConfigError::Parse`].
    pub fn load(&mut self) -> Result<Option<UserConfig>, ConfigError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no user config found");
                self.current = None;
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let config: UserConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: self.path.clone(),
                source,
            })?;

        tracing::debug!(
            path = %self.path.display(),
            user = %config.github_username,
            "user config loaded"
        );
        self.current = Some(config.clone());
        Ok(Some(config))
    }

    /// Writes `config` as pretty-printed JSON, replacing any existing file.
    ///
    /// The document is written to a sibling temp file and renamed into
    /// place, so readers never observe a truncated file under the real name.
    pub fn save(&mut self, config: UserConfig) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&config).map_err(ConfigError::Serialize)?;
        let tmp = PendingFile::write(self.temp_path(), json.as_bytes())?;
        tmp.persist(&self.path)?;

        tracing::debug!(path = %self.path.display(), "user config saved");
        self.current = Some(config);
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| CONFIG_FILE_NAME.into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

/// A temp file that is removed on drop unless renamed into place.
struct PendingFile {
    path: PathBuf,
    persisted: bool,
}

impl PendingFile {
    /// Writes `contents` to `path` with owner-only permissions.
    fn write(path: PathBuf, contents: &[u8]) -> io::Result<Self> {
        let pending = Self {
            path,
            persisted: false,
        };
        fs::write(&pending.path, contents)?;
        set_permissions_0600(&pending.path);
        Ok(pending)
    }

    fn persist(mut self, target: &Path) -> io::Result<()> {
        fs::rename(&self.path, target)?;
        self.persisted = true;
        Ok(())
    }
}

impl Drop for PendingFile {
    fn drop(&mut self) {
        if !self.persisted {
            let _ = fs::remove_file(&self.path);
        }
    }
}

fn set_permissions_0600(path: &Path) {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o600));
    }
    #[cfg(not(unix))]
    {
        let _ = path;
    }
}
