use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    process::Command,
};

use anyhow::{bail, Context, Result};
use log::info;

use crate::config::ExportConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sink {
    Stdout,
    File(PathBuf),
    Editor,
}

pub fn deliver(text: &str, class_name: &str, sink: &Sink, export: &ExportConfig) -> Result<()> {
    match sink {
        Sink::Stdout => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
        Sink::File(path) => write_output(path, text),
        Sink::Editor => {
            let editor = resolve_editor(
                export.editor.as_deref(),
                std::env::var("VISUAL").ok(),
                std::env::var("EDITOR").ok(),
            );
            let path = scratch_path(class_name);
            write_output(&path, text)?;
            open_in_editor(&editor, &path)
        }
    }
}

pub fn write_output(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))?;
    info!("wrote {}", path.display());
    Ok(())
}

/// Picks the editor command: config, then `$VISUAL`, then `$EDITOR`, then
/// the platform default.
pub fn resolve_editor(
    configured: Option<&str>,
    visual: Option<String>,
    editor: Option<String>,
) -> String {
    configured
        .map(str::to_string)
        .into_iter()
        .chain(visual)
        .chain(editor)
        .find(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default_editor().to_string())
}

fn default_editor() -> &'static str {
    if cfg!(windows) {
        "notepad"
    } else {
        "vi"
    }
}

fn scratch_path(class_name: &str) -> PathBuf {
    let stem: String = class_name
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || *ch == '_')
        .collect();
    let stem = if stem.is_empty() { "ViewModel".to_string() } else { stem };
    std::env::temp_dir().join(format!("{stem}.cs"))
}

/// Runs `editor` (a program plus optional arguments) on `path` and waits.
pub fn open_in_editor(editor: &str, path: &Path) -> Result<()> {
    let mut parts = editor.split_whitespace();
    let Some(program) = parts.next() else {
        bail!("editor command must not be empty");
    };

    // Inherit stdio so terminal editors stay interactive.
    let status = Command::new(program)
        .args(parts)
        .arg(path)
        .status()
        .with_context(|| format!("failed to run {editor} {}", path.display()))?;

    if !status.success() {
        bail!("{editor} exited with status {status}");
    }

    info!("opened {} in {editor}", path.display());
    Ok(())
}
