use crate::error::{CommonError, CommonResult};
use mailbuilder_blocks::EmailData;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// File system abstraction for template loading and testing
pub trait FileSystem {
    /// Check if a file exists
    fn exists(&self, path: &Path) -> bool;

    /// Read a whole file as UTF-8
    fn read_to_string(&self, path: &Path) -> CommonResult<String>;

    /// Write a whole file, creating parent directories as needed
    fn write(&mut self, path: &Path, contents: &str) -> CommonResult<()>;
}

/// Real file system implementation
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_to_string(&self, path: &Path) -> CommonResult<String> {
        Ok(std::fs::read_to_string(path)?)
    }

    fn write(&mut self, path: &Path, contents: &str) -> CommonResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, contents)?;
        Ok(())
    }
}

/// In-memory file system for testing
#[derive(Debug, Default)]
pub struct MockFileSystem {
    pub files: HashMap<PathBuf, String>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        self.files.insert(path.into(), contents.into());
    }

    pub fn get(&self, path: &Path) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn read_to_string(&self, path: &Path) -> CommonResult<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| CommonError::NotFound(path.display().to_string()))
    }

    fn write(&mut self, path: &Path, contents: &str) -> CommonResult<()> {
        self.files.insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }
}

/// Load a saved template from `path`
pub fn load_email_data(fs: &dyn FileSystem, path: &Path) -> CommonResult<EmailData> {
    if !fs.exists(path) {
        return Err(CommonError::NotFound(path.display().to_string()));
    }
    let source = fs.read_to_string(path)?;
    let data = EmailData::from_json(&source)?;
    tracing::debug!(path = %path.display(), blocks = data.blocks.len(), "loaded template");
    Ok(data)
}

/// Save a template to `path` as pretty-printed JSON
pub fn save_email_data(fs: &mut dyn FileSystem, path: &Path, data: &EmailData) -> CommonResult<()> {
    let json = data.to_json_pretty()?;
    fs.write(path, &json)?;
    tracing::debug!(path = %path.display(), bytes = json.len(), "saved template");
    Ok(())
}
