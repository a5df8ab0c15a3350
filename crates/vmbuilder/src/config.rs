use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::paths::{default_config_path, ensure_dir_secure, write_private_file};
use crate::template::{
    io::write_builtin_templates,
    merge::MergeFieldCatalog,
    validation::{validate_catalog, validate_type_data},
    TemplateKind,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub type_data: TypeData,
    pub naming: Naming,
    pub merge_fields: MergeFieldCatalog,
    pub templates: TemplatePaths,
    #[serde(default)]
    pub export: ExportConfig,
    /// Directory relative template paths resolve against.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeData {
    pub command_implementation_type: String,
    pub property_types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Naming {
    pub view_suffix: String,
    pub view_model_suffix: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default)]
    pub editor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplatePaths {
    pub class: PathBuf,
    pub namespace: PathBuf,
    pub constructor: PathBuf,
    pub field_declaration: PathBuf,
    pub property_declaration: PathBuf,
    pub property_changed: PathBuf,
    pub command_property: PathBuf,
    pub generic_command_property: PathBuf,
    pub execute_initialization: PathBuf,
    pub can_execute_initialization: PathBuf,
    pub generic_execute_initialization: PathBuf,
    pub generic_can_execute_initialization: PathBuf,
    pub execute_method: PathBuf,
    pub can_execute_method: PathBuf,
    pub generic_execute_method: PathBuf,
    pub generic_can_execute_method: PathBuf,
}

impl Config {
    /// Loads `explicit` if given. Otherwise loads the default location,
    /// creating it together with the built-in templates when missing.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        let path = default_config_path();
        if !path.exists() {
            Self::init(&path, false)
                .with_context(|| format!("failed to write config: {}", path.display()))?;
        }
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        let mut cfg = serde_json::from_str::<Config>(&data)
            .with_context(|| format!("invalid config file: {}", path.display()))?;

        validate_type_data(&cfg.type_data)?;
        validate_catalog(&cfg.merge_fields)?;

        cfg.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        cfg.type_data.resolve_command_types();
        Ok(cfg)
    }

    /// Writes the default config to `path` and the built-in templates next to
    /// it. Existing files survive unless `force` is set.
    pub fn init(path: &Path, force: bool) -> Result<Vec<PathBuf>> {
        let mut cfg = Config::default();
        cfg.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let mut written = Vec::new();
        if force || !path.exists() {
            cfg.save(path)?;
            info!("wrote config {}", path.display());
            written.push(path.to_path_buf());
        }
        written.extend(write_builtin_templates(&cfg, force)?);
        Ok(written)
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            ensure_dir_secure(parent)?;
        }
        let data = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        write_private_file(path, &data)
    }

    pub fn template_path(&self, kind: TemplateKind) -> PathBuf {
        let path = self.templates.path(kind);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

impl TypeData {
    /// Replaces every `ICommand` in the offered types with the configured
    /// implementation type, nested occurrences included.
    pub fn resolve_command_types(&mut self) {
        let command_type = self.command_implementation_type.clone();
        for entry in &mut self.property_types {
            if entry.contains("ICommand") {
                *entry = entry.replace("ICommand", &command_type);
            }
        }
    }
}

impl Default for TypeData {
    fn default() -> Self {
        let property_types = [
            "string",
            "int",
            "bool",
            "double",
            "decimal",
            "DateTime",
            "object",
            "ObservableCollection<T>",
            "ICommand(Action)",
            "ICommand(Action, Func<bool>)",
            "ICommand<T>(Action<T>)",
            "ICommand<T>(Action<T>, Func<T, bool>)",
        ];
        TypeData {
            command_implementation_type: "RelayCommand".to_string(),
            property_types: property_types.iter().map(|ty| ty.to_string()).collect(),
        }
    }
}

impl Default for Naming {
    fn default() -> Self {
        Naming {
            view_suffix: "View".to_string(),
            view_model_suffix: "ViewModel".to_string(),
        }
    }
}

impl TemplatePaths {
    pub fn path(&self, kind: TemplateKind) -> &Path {
        match kind {
            TemplateKind::Class => &self.class,
            TemplateKind::Namespace => &self.namespace,
            TemplateKind::Constructor => &self.constructor,
            TemplateKind::FieldDeclaration => &self.field_declaration,
            TemplateKind::PropertyDeclaration => &self.property_declaration,
            TemplateKind::PropertyChanged => &self.property_changed,
            TemplateKind::CommandProperty => &self.command_property,
            TemplateKind::GenericCommandProperty => &self.generic_command_property,
            TemplateKind::ExecuteInitialization => &self.execute_initialization,
            TemplateKind::CanExecuteInitialization => &self.can_execute_initialization,
            TemplateKind::GenericExecuteInitialization => &self.generic_execute_initialization,
            TemplateKind::GenericCanExecuteInitialization => {
                &self.generic_can_execute_initialization
            }
            TemplateKind::ExecuteMethod => &self.execute_method,
            TemplateKind::CanExecuteMethod => &self.can_execute_method,
            TemplateKind::GenericExecuteMethod => &self.generic_execute_method,
            TemplateKind::GenericCanExecuteMethod => &self.generic_can_execute_method,
        }
    }
}

impl Default for TemplatePaths {
    fn default() -> Self {
        let at = |kind: TemplateKind| Path::new("templates").join(kind.file_name());
        TemplatePaths {
            class: at(TemplateKind::Class),
            namespace: at(TemplateKind::Namespace),
            constructor: at(TemplateKind::Constructor),
            field_declaration: at(TemplateKind::FieldDeclaration),
            property_declaration: at(TemplateKind::PropertyDeclaration),
            property_changed: at(TemplateKind::PropertyChanged),
            command_property: at(TemplateKind::CommandProperty),
            generic_command_property: at(TemplateKind::GenericCommandProperty),
            execute_initialization: at(TemplateKind::ExecuteInitialization),
            can_execute_initialization: at(TemplateKind::CanExecuteInitialization),
            generic_execute_initialization: at(TemplateKind::GenericExecuteInitialization),
            generic_can_execute_initialization: at(TemplateKind::GenericCanExecuteInitialization),
            execute_method: at(TemplateKind::ExecuteMethod),
            can_execute_method: at(TemplateKind::CanExecuteMethod),
            generic_execute_method: at(TemplateKind::GenericExecuteMethod),
            generic_can_execute_method: at(TemplateKind::GenericCanExecuteMethod),
        }
    }
}
