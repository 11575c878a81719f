use anyhow::{anyhow, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// CsvConnection resolves per-user data directories under one base directory
#[derive(Debug, Clone)]
pub struct CsvConnection {
    base_directory: PathBuf,
}

impl CsvConnection {
    /// Create a new CSV connection with a base directory
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
            info!("Created data directory: {}", base_path.display());
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Directory holding one user's files
    pub fn user_directory(&self, username: &str) -> PathBuf {
        self.base_directory.join(safe_directory_name(username))
    }

    /// Same as [`user_directory`](Self::user_directory), creating it if needed
    pub fn ensure_user_directory(&self, username: &str) -> Result<PathBuf> {
        let user_dir = self.user_directory(username);
        if !user_dir.exists() {
            fs::create_dir_all(&user_dir)?;
            debug!("Created user directory: {}", user_dir.display());
        }
        Ok(user_dir)
    }
}

/// `~/Documents/Fluid Check`, using HOME or USERPROFILE
pub fn default_data_directory() -> Result<PathBuf> {
    let home_dir = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| anyhow!("Could not determine home directory"))?;

    Ok(PathBuf::from(home_dir).join("Documents").join("Fluid Check"))
}

/// Turn a username into a file-system safe directory name.
///
/// The name is a readable slug (lowercase ASCII, everything else mapped to
/// `_`, runs collapsed) followed by the hex encoding of the exact username,
/// so distinct usernames never share a directory.
pub fn safe_directory_name(username: &str) -> String {
    format!("{}-{}", readable_slug(username), hex_encode(username))
}

fn readable_slug(username: &str) -> String {
    let mut slug = String::with_capacity(username.len());
    for c in username.trim().chars() {
        let mapped = if c.is_ascii_alphanumeric() {
            c.to_ascii_lowercase()
        } else {
            '_'
        };
        if mapped == '_' && slug.ends_with('_') {
            continue;
        }
        slug.push(mapped);
    }

    let trimmed = slug.trim_matches('_');
    if trimmed.is_empty() {
        "user".to_string()
    } else {
        trimmed.to_string()
    }
}

fn hex_encode(text: &str) -> String {
    text.bytes().map(|byte| format!("{:02x}", byte)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_safe_directory_name() {
        assert_eq!(safe_directory_name("ana"), "ana-616e61");
        assert_eq!(safe_directory_name("Ana Lopez"), "ana_lopez-416e61204c6f70657a");
        assert_eq!(safe_directory_name("../etc"), "etc-2e2e2f657463");
        assert_eq!(safe_directory_name("!!!"), "user-212121");
    }

    #[test]
    fn test_distinct_usernames_get_distinct_directories() {
        let temp_dir = TempDir::new().unwrap();
        let connection = CsvConnection::new(temp_dir.path()).unwrap();
        let names = ["Ana", "ana", "ana.lopez", "ana lopez", "李", "王", "José", "Jos", " ana"];

        let dirs: std::collections::HashSet<PathBuf> =
            names.iter().map(|name| connection.user_directory(name)).collect();

        assert_eq!(dirs.len(), names.len());
        for dir in &dirs {
            assert_eq!(dir.parent(), Some(temp_dir.path()));
        }
    }

    #[test]
    fn test_new_creates_base_directory() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("nested").join("data");

        let connection = CsvConnection::new(&base).unwrap();

        assert!(base.exists());
        assert_eq!(connection.base_directory(), base.as_path());
    }

    #[test]
    fn test_ensure_user_directory() {
        let temp_dir = TempDir::new().unwrap();
        let connection = CsvConnection::new(temp_dir.path()).unwrap();

        let dir = connection.ensure_user_directory("Ana Lopez").unwrap();

        assert!(dir.exists());
        assert_eq!(dir, temp_dir.path().join("ana_lopez-416e61204c6f70657a"));
    }
}
