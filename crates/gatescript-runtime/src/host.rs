//! Host collaborators
//!
//! Built-in variables and functions reach the file system and process
//! environment only through [`Host`], so tests can substitute a fake.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable present while running inside a task sequence
pub const DEFAULT_TASK_SEQUENCE_VARIABLE: &str = "_SMSTSPackageName";

/// Well-known install locations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialFolder {
    ProgramFiles,
    ProgramFilesX86,
    CommonAppData,
    /// Install directory of the product being deployed
    InstallDirectory,
    Temp,
}

/// Host lookup error
#[derive(Error, Debug)]
pub enum HostError {
    /// The host cannot provide the requested value
    #[error("Not available on this host: {0}")]
    NotAvailable(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Operating-system services used by built-in variables and functions
pub trait Host: Send + Sync {
    fn is_file(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    fn create_dir_all(&self, path: &Path) -> Result<(), HostError>;

    fn env_var(&self, name: &str) -> Option<String>;

    fn current_dir(&self) -> Result<PathBuf, HostError>;

    /// Short operating system name, e.g. `windows` or `linux`
    fn os_name(&self) -> String;

    /// Resolve a well-known folder; may fail on hosts that do not have it
    fn special_folder(&self, folder: SpecialFolder) -> Result<PathBuf, HostError>;

    fn is_64bit_os(&self) -> bool;

    /// Whether the process runs inside an OS deployment task sequence
    fn is_task_sequence(&self) -> bool;
}

/// Host backed by the real file system and process environment
#[derive(Debug, Clone)]
pub struct SystemHost {
    install_directory: Option<PathBuf>,
    task_sequence_variable: String,
}

impl Default for SystemHost {
    fn default() -> Self {
        Self {
            install_directory: None,
            task_sequence_variable: DEFAULT_TASK_SEQUENCE_VARIABLE.to_string(),
        }
    }
}

impl SystemHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the product install directory reported for `InstallDirectory`
    pub fn with_install_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.install_directory = Some(path.into());
        self
    }

    /// Set the environment variable whose presence marks a task sequence
    pub fn with_task_sequence_variable(mut self, name: impl Into<String>) -> Self {
        self.task_sequence_variable = name.into();
        self
    }

    fn env_folder(&self, name: &str) -> Result<PathBuf, HostError> {
        self.env_var(name)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| HostError::NotAvailable(format!("environment variable {}", name)))
    }
}

impl Host for SystemHost {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), HostError> {
        std::fs::create_dir_all(path)?;
        Ok(())
    }

    fn env_var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn current_dir(&self) -> Result<PathBuf, HostError> {
        Ok(std::env::current_dir()?)
    }

    fn os_name(&self) -> String {
        std::env::consts::OS.to_string()
    }

    fn special_folder(&self, folder: SpecialFolder) -> Result<PathBuf, HostError> {
        match folder {
            SpecialFolder::ProgramFiles => self.env_folder("ProgramFiles"),
            SpecialFolder::ProgramFilesX86 => self
                .env_folder("ProgramFiles(x86)")
                .or_else(|_| self.env_folder("ProgramFiles")),
            SpecialFolder::CommonAppData => self.env_folder("ProgramData"),
            SpecialFolder::InstallDirectory => self
                .install_directory
                .clone()
                .ok_or_else(|| HostError::NotAvailable("install directory".to_string())),
            SpecialFolder::Temp => Ok(std::env::temp_dir()),
        }
    }

    fn is_64bit_os(&self) -> bool {
        // A 32-bit process on 64-bit Windows sees PROCESSOR_ARCHITEW6432
        cfg!(target_pointer_width = "64") || self.env_var("PROCESSOR_ARCHITEW6432").is_some()
    }

    fn is_task_sequence(&self) -> bool {
        self.env_var(&self.task_sequence_variable).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_directory_not_configured() {
        let host = SystemHost::new();
        let err = host
            .special_folder(SpecialFolder::InstallDirectory)
            .unwrap_err();
        assert!(matches!(err, HostError::NotAvailable(_)));
    }

    #[test]
    fn test_install_directory_configured() {
        let host = SystemHost::new().with_install_directory("/opt/product");
        assert_eq!(
            host.special_folder(SpecialFolder::InstallDirectory).unwrap(),
            PathBuf::from("/opt/product")
        );
    }

    #[test]
    fn test_temp_folder_always_available() {
        let host = SystemHost::new();
        assert_eq!(
            host.special_folder(SpecialFolder::Temp).unwrap(),
            std::env::temp_dir()
        );
    }

    #[test]
    fn test_task_sequence_marker_missing() {
        let host = SystemHost::new().with_task_sequence_variable("GATESCRIPT_TEST_UNSET_MARKER");
        assert!(!host.is_task_sequence());
    }

    #[test]
    fn test_file_system_checks() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("present.txt");
        std::fs::write(&file, "x").unwrap();

        let host = SystemHost::new();
        assert!(host.is_file(&file));
        assert!(!host.is_dir(&file));
        assert!(host.is_dir(dir.path()));

        let nested = dir.path().join("a").join("b");
        host.create_dir_all(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn test_create_dir_failure_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("blocker");
        std::fs::write(&file, "x").unwrap();

        let err = SystemHost::new()
            .create_dir_all(&file.join("child"))
            .unwrap_err();
        assert!(matches!(err, HostError::Io(_)));
    }

    #[test]
    fn test_process_facts() {
        let host = SystemHost::new();
        assert_eq!(host.current_dir().unwrap(), std::env::current_dir().unwrap());
        assert_eq!(host.os_name(), std::env::consts::OS);
    }
}
