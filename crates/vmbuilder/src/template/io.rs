use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use log::info;

use crate::config::Config;
use crate::paths::{ensure_dir_secure, write_private_file};
use crate::template::{trim_fragment, TemplateKind};

pub fn read_template(path: &Path) -> Result<String> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read template: {}", path.display()))?;
    Ok(trim_fragment(&data))
}

/// Writes the built-in templates to the paths `config` points at.
/// Existing files are kept unless `force` is set. Returns the written paths.
pub fn write_builtin_templates(config: &Config, force: bool) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for kind in TemplateKind::ALL {
        let path = config.template_path(kind);
        if path.exists() && !force {
            continue;
        }
        if let Some(parent) = path.parent() {
            ensure_dir_secure(parent)
                .with_context(|| format!("failed to create directory: {}", parent.display()))?;
        }
        write_private_file(&path, kind.builtin_text())
            .with_context(|| format!("failed to write template: {}", path.display()))?;
        info!("wrote template {}", path.display());
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use anyhow::Result;

    use crate::config::Config;
    use crate::template::io::{read_template, write_builtin_templates};
    use crate::template::TemplateKind;

    #[test]
    fn read_template_drops_trailing_line_breaks() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("field.txt");
        fs::write(&path, "    {Property type} {Field name};\r\n\r\n")?;

        assert_eq!(read_template(&path)?, "    {Property type} {Field name};");
        Ok(())
    }

    #[test]
    fn read_template_reports_path_on_failure() {
        let error = read_template(std::path::Path::new("/definitely/missing/class.txt"))
            .expect_err("must fail");
        assert!(error.to_string().contains("failed to read template"));
        assert!(error.to_string().contains("class.txt"));
    }

    #[test]
    fn write_builtin_templates_respects_force() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut config = Config::default();
        config.base_dir = dir.path().to_path_buf();

        let written = write_builtin_templates(&config, false)?;
        assert_eq!(written.len(), TemplateKind::ALL.len());

        let class_path = config.template_path(TemplateKind::Class);
        fs::write(&class_path, "custom")?;

        assert!(write_builtin_templates(&config, false)?.is_empty());
        assert_eq!(fs::read_to_string(&class_path)?, "custom");

        let rewritten = write_builtin_templates(&config, true)?;
        assert_eq!(rewritten.len(), TemplateKind::ALL.len());
        assert_eq!(
            fs::read_to_string(&class_path)?,
            TemplateKind::Class.builtin_text()
        );
        Ok(())
    }

    #[test]
    #[cfg(unix)]
    fn templates_share_the_config_permissions() -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir()?;
        let mut config = Config::default();
        config.base_dir = dir.path().to_path_buf();
        write_builtin_templates(&config, false)?;

        let class_path = config.template_path(TemplateKind::Class);
        let templates_dir = class_path.parent().expect("template dir");
        assert_eq!(fs::metadata(&class_path)?.permissions().mode() & 0o777, 0o600);
        assert_eq!(
            fs::metadata(templates_dir)?.permissions().mode() & 0o777,
            0o700
        );
        Ok(())
    }
}
