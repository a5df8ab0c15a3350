use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::error::GenerateError;
use crate::export::Sink;
use crate::model::PropertyDescriptor;

#[derive(Parser, Debug)]
#[command(
    name = "vmbuilder",
    version,
    about = "Generate MVVM ViewModel boilerplate from templates"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Config file (default: ~/.config/vmbuilder/config.json)")]
    pub config: Option<PathBuf>,

    #[arg(short, long, action = ArgAction::Count, global = true, help = "Raise log level (-v info, -vv debug)")]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(about = "Write the default config and template files")]
    Init {
        #[arg(long, help = "Overwrite existing files")]
        force: bool,
    },
    #[command(about = "Build a ViewModel from a list of properties")]
    Generate {
        #[arg(long, default_value = "", help = "ViewModel class name")]
        name: String,
        #[arg(long)]
        namespace: Option<String>,
        #[arg(
            short = 'p',
            long = "property",
            value_name = "NAME:TYPE",
            value_parser = parse_property
        )]
        properties: Vec<PropertyDescriptor>,
        #[arg(long, value_name = "FILE", help = "JSON array of {\"name\", \"type\"} objects")]
        from_json: Option<PathBuf>,
        #[arg(long, help = "Fail on properties that cannot be generated")]
        strict: bool,
        #[command(flatten)]
        output: OutputArgs,
    },
    #[command(about = "Build a ViewModel from the bindings of a XAML view")]
    Extract {
        #[arg(long, value_name = "FILE", help = "XAML file (default: stdin)")]
        input: Option<PathBuf>,
        #[arg(long)]
        namespace: Option<String>,
        #[arg(long, help = "Fail on properties that cannot be generated")]
        strict: bool,
        #[command(flatten)]
        output: OutputArgs,
    },
    #[command(about = "List the property types offered by the config")]
    Types,
}

#[derive(Args, Debug, Default)]
pub struct OutputArgs {
    #[arg(short, long, value_name = "FILE", conflicts_with = "editor")]
    pub output: Option<PathBuf>,
    #[arg(long, help = "Open the result in $VISUAL/$EDITOR")]
    pub editor: bool,
}

impl OutputArgs {
    pub fn sink(&self) -> Sink {
        match (&self.output, self.editor) {
            (Some(path), _) => Sink::File(path.clone()),
            (None, true) => Sink::Editor,
            (None, false) => Sink::Stdout,
        }
    }
}

/// Parses `Name:Type`. The type may itself contain `:`.
pub fn parse_property(input: &str) -> Result<PropertyDescriptor, GenerateError> {
    let invalid = || GenerateError::InvalidPropertySpec(input.to_string());
    let (name, type_text) = input.split_once(':').ok_or_else(invalid)?;
    let (name, type_text) = (name.trim(), type_text.trim());
    if name.is_empty() || type_text.is_empty() {
        return Err(invalid());
    }
    Ok(PropertyDescriptor::new(name, type_text))
}
