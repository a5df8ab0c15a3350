pub mod io;
pub mod merge;
pub mod validation;

use anyhow::Result;

use crate::config::Config;

/// Logical purpose of one template fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TemplateKind {
    Class,
    Namespace,
    Constructor,
    FieldDeclaration,
    PropertyDeclaration,
    PropertyChanged,
    CommandProperty,
    GenericCommandProperty,
    ExecuteInitialization,
    CanExecuteInitialization,
    GenericExecuteInitialization,
    GenericCanExecuteInitialization,
    ExecuteMethod,
    CanExecuteMethod,
    GenericExecuteMethod,
    GenericCanExecuteMethod,
}

impl TemplateKind {
    pub const COUNT: usize = 16;

    // Order matches the discriminants, `TemplateSet` indexes by them.
    pub const ALL: [TemplateKind; Self::COUNT] = [
        TemplateKind::Class,
        TemplateKind::Namespace,
        TemplateKind::Constructor,
        TemplateKind::FieldDeclaration,
        TemplateKind::PropertyDeclaration,
        TemplateKind::PropertyChanged,
        TemplateKind::CommandProperty,
        TemplateKind::GenericCommandProperty,
        TemplateKind::ExecuteInitialization,
        TemplateKind::CanExecuteInitialization,
        TemplateKind::GenericExecuteInitialization,
        TemplateKind::GenericCanExecuteInitialization,
        TemplateKind::ExecuteMethod,
        TemplateKind::CanExecuteMethod,
        TemplateKind::GenericExecuteMethod,
        TemplateKind::GenericCanExecuteMethod,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            TemplateKind::Class => "class.txt",
            TemplateKind::Namespace => "namespace.txt",
            TemplateKind::Constructor => "constructor.txt",
            TemplateKind::FieldDeclaration => "field_declaration.txt",
            TemplateKind::PropertyDeclaration => "property_declaration.txt",
            TemplateKind::PropertyChanged => "property_changed.txt",
            TemplateKind::CommandProperty => "command_property.txt",
            TemplateKind::GenericCommandProperty => "command_t_property.txt",
            TemplateKind::ExecuteInitialization => "command_action_init.txt",
            TemplateKind::CanExecuteInitialization => "command_action_func_init.txt",
            TemplateKind::GenericExecuteInitialization => "command_t_action_init.txt",
            TemplateKind::GenericCanExecuteInitialization => "command_t_action_func_init.txt",
            TemplateKind::ExecuteMethod => "command_on_execute.txt",
            TemplateKind::CanExecuteMethod => "command_can_execute.txt",
            TemplateKind::GenericExecuteMethod => "command_t_on_execute.txt",
            TemplateKind::GenericCanExecuteMethod => "command_t_can_execute.txt",
        }
    }

    /// Default C#/WPF text shipped with the binary.
    pub fn builtin_text(self) -> &'static str {
        match self {
            TemplateKind::Class => include_str!("../templates/class.txt"),
            TemplateKind::Namespace => include_str!("../templates/namespace.txt"),
            TemplateKind::Constructor => include_str!("../templates/constructor.txt"),
            TemplateKind::FieldDeclaration => include_str!("../templates/field_declaration.txt"),
            TemplateKind::PropertyDeclaration => {
                include_str!("../templates/property_declaration.txt")
            }
            TemplateKind::PropertyChanged => include_str!("../templates/property_changed.txt"),
            TemplateKind::CommandProperty => include_str!("../templates/command_property.txt"),
            TemplateKind::GenericCommandProperty => {
                include_str!("../templates/command_t_property.txt")
            }
            TemplateKind::ExecuteInitialization => {
                include_str!("../templates/command_action_init.txt")
            }
            TemplateKind::CanExecuteInitialization => {
                include_str!("../templates/command_action_func_init.txt")
            }
            TemplateKind::GenericExecuteInitialization => {
                include_str!("../templates/command_t_action_init.txt")
            }
            TemplateKind::GenericCanExecuteInitialization => {
                include_str!("../templates/command_t_action_func_init.txt")
            }
            TemplateKind::ExecuteMethod => include_str!("../templates/command_on_execute.txt"),
            TemplateKind::CanExecuteMethod => include_str!("../templates/command_can_execute.txt"),
            TemplateKind::GenericExecuteMethod => {
                include_str!("../templates/command_t_on_execute.txt")
            }
            TemplateKind::GenericCanExecuteMethod => {
                include_str!("../templates/command_t_can_execute.txt")
            }
        }
    }
}

/// Every template text, loaded once and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSet {
    texts: [String; TemplateKind::COUNT],
}

impl TemplateSet {
    pub fn builtin() -> Self {
        let mut texts: [String; TemplateKind::COUNT] = Default::default();
        for kind in TemplateKind::ALL {
            texts[kind as usize] = trim_fragment(kind.builtin_text());
        }
        Self { texts }
    }

    pub fn load(config: &Config) -> Result<Self> {
        let mut texts: [String; TemplateKind::COUNT] = Default::default();
        for kind in TemplateKind::ALL {
            texts[kind as usize] = io::read_template(&config.template_path(kind))?;
        }
        Ok(Self { texts })
    }

    pub fn get(&self, kind: TemplateKind) -> &str {
        &self.texts[kind as usize]
    }
}

/// A fragment's trailing line breaks are not part of it.
pub(crate) fn trim_fragment(text: &str) -> String {
    text.trim_end_matches(['\r', '\n']).to_string()
}
