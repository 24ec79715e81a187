//! Common test utilities for runtime integration tests

use gatescript_runtime::{Host, HostError, ScriptRegistry, SpecialFolder};
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// In-memory host with a fake file system and environment
#[derive(Debug, Default)]
pub struct FakeHost {
    pub files: HashSet<PathBuf>,
    pub dirs: Mutex<HashSet<PathBuf>>,
    pub env: HashMap<String, String>,
    pub folders: HashMap<String, PathBuf>,
    pub current_dir: Option<PathBuf>,
    pub os_name: String,
    pub task_sequence: bool,
    pub read_only: bool,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: &str) -> Self {
        self.files.insert(PathBuf::from(path));
        self
    }

    pub fn with_dir(self, path: &str) -> Self {
        self.dirs.lock().unwrap().insert(PathBuf::from(path));
        self
    }

    pub fn with_env(mut self, name: &str, value: &str) -> Self {
        self.env.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_folder(mut self, folder: SpecialFolder, path: &str) -> Self {
        self.folders.insert(format!("{:?}", folder), PathBuf::from(path));
        self
    }

    pub fn with_current_dir(mut self, path: &str) -> Self {
        self.current_dir = Some(PathBuf::from(path));
        self
    }

    pub fn with_os_name(mut self, name: &str) -> Self {
        self.os_name = name.to_string();
        self
    }

    pub fn in_task_sequence(mut self) -> Self {
        self.task_sequence = true;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn into_registry(self) -> ScriptRegistry {
        ScriptRegistry::with_builtins(Arc::new(self))
    }
}

impl Host for FakeHost {
    fn is_file(&self, path: &Path) -> bool {
        self.files.contains(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.lock().unwrap().contains(path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), HostError> {
        if self.read_only {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only").into());
        }
        self.dirs.lock().unwrap().insert(path.to_path_buf());
        Ok(())
    }

    fn env_var(&self, name: &str) -> Option<String> {
        self.env.get(name).cloned()
    }

    fn current_dir(&self) -> Result<PathBuf, HostError> {
        self.current_dir
            .clone()
            .ok_or_else(|| HostError::NotAvailable("current directory".to_string()))
    }

    fn os_name(&self) -> String {
        self.os_name.clone()
    }

    fn special_folder(&self, folder: SpecialFolder) -> Result<PathBuf, HostError> {
        self.folders
            .get(&format!("{:?}", folder))
            .cloned()
            .ok_or_else(|| HostError::NotAvailable(format!("{:?}", folder)))
    }

    fn is_64bit_os(&self) -> bool {
        true
    }

    fn is_task_sequence(&self) -> bool {
        self.task_sequence
    }
}
