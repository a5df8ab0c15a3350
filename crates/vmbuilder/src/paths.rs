use std::{
    env,
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

#[cfg(unix)]
use std::os::unix::fs::{DirBuilderExt, OpenOptionsExt, PermissionsExt};

pub fn config_dir() -> PathBuf {
    if let Ok(dir) = env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(dir);
    }
    if let Ok(home) = env::var("HOME") {
        return PathBuf::from(home).join(".config");
    }
    dirs::config_dir().unwrap_or_else(|| PathBuf::from("."))
}

pub fn default_config_path() -> PathBuf {
    config_dir().join("vmbuilder").join("config.json")
}

/// Creates `path` and any missing parents as 0700. Directories that already
/// exist keep their mode.
pub fn ensure_dir_secure(path: &Path) -> io::Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(0o700);
    builder.create(path)
}

pub fn write_private_file(path: &Path, content: &str) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.create(true).truncate(true).write(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path)?;
    #[cfg(unix)]
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;

    file.write_all(content.as_bytes())
}

#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{default_config_path, ENV_LOCK};

    #[test]
    fn default_config_path_follows_xdg_config_home() {
        let _guard = ENV_LOCK.lock().expect("env lock poisoned");
        let old = std::env::var_os("XDG_CONFIG_HOME");
        std::env::set_var("XDG_CONFIG_HOME", "/tmp/vmbuilder-xdg");

        let path = default_config_path();

        match old {
            Some(value) => std::env::set_var("XDG_CONFIG_HOME", value),
            None => std::env::remove_var("XDG_CONFIG_HOME"),
        }
        assert_eq!(
            path,
            PathBuf::from("/tmp/vmbuilder-xdg/vmbuilder/config.json")
        );
    }

    #[test]
    #[cfg(unix)]
    fn private_file_and_dir_permissions() -> anyhow::Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let root = tempfile::tempdir()?;
        let dir = root.path().join("nested");
        super::ensure_dir_secure(&dir)?;
        let file = dir.join("config.json");
        super::write_private_file(&file, "{}")?;

        assert_eq!(std::fs::read_to_string(&file)?, "{}");
        assert_eq!(
            std::fs::metadata(&file)?.permissions().mode() & 0o777,
            0o600
        );
        assert_eq!(std::fs::metadata(&dir)?.permissions().mode() & 0o777, 0o700);
        Ok(())
    }

    #[test]
    #[cfg(unix)]
    fn existing_dir_keeps_its_mode() -> anyhow::Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let root = tempfile::tempdir()?;
        let project = root.path().join("project");
        std::fs::create_dir(&project)?;
        std::fs::set_permissions(&project, std::fs::Permissions::from_mode(0o755))?;

        super::ensure_dir_secure(&project)?;

        assert_eq!(
            std::fs::metadata(&project)?.permissions().mode() & 0o777,
            0o755
        );
        Ok(())
    }
}
