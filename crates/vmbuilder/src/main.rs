mod assemble;
mod classify;
mod cli;
mod config;
mod error;
mod export;
mod extract;
mod model;
mod paths;
mod template;

use std::{
    fs,
    io::{self, Read},
    path::Path,
};

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use crate::{
    assemble::ViewModelBuilder,
    cli::{Cli, Command},
    config::Config,
    export::{deliver, Sink},
    extract::extract_bindings,
    model::PropertyDescriptor,
    paths::default_config_path,
    template::TemplateSet,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config_path = cli.config.as_deref();

    match cli.command {
        Command::Init { force } => {
            let path = config_path
                .map(Path::to_path_buf)
                .unwrap_or_else(default_config_path);
            let written = Config::init(&path, force)?;
            if written.is_empty() {
                println!("nothing written, {} already exists", path.display());
            }
            for path in written {
                println!("{}", path.display());
            }
            Ok(())
        }
        Command::Types => {
            let config = Config::load(config_path)?;
            for property_type in &config.type_data.property_types {
                println!("{property_type}");
            }
            Ok(())
        }
        Command::Generate {
            name,
            namespace,
            properties,
            from_json,
            strict,
            output,
        } => {
            let config = Config::load(config_path)?;
            let mut all = match from_json {
                Some(path) => read_properties(&path)?,
                None => Vec::new(),
            };
            all.extend(properties);
            let request = Request {
                properties: &all,
                class_name: &name,
                namespace: namespace.as_deref(),
                strict,
                sink: output.sink(),
            };
            generate(&config, &request)
        }
        Command::Extract {
            input,
            namespace,
            strict,
            output,
        } => {
            let config = Config::load(config_path)?;
            let markup = read_markup(input.as_deref())?;
            let extraction = extract_bindings(&markup, &config);
            if extraction.properties.is_empty() {
                warn!("no bindings found in the markup");
            }
            let request = Request {
                properties: &extraction.properties,
                class_name: &extraction.class_name,
                namespace: namespace.as_deref(),
                strict,
                sink: output.sink(),
            };
            generate(&config, &request)
        }
    }
}

struct Request<'a> {
    properties: &'a [PropertyDescriptor],
    class_name: &'a str,
    namespace: Option<&'a str>,
    strict: bool,
    sink: Sink,
}

fn generate(config: &Config, request: &Request<'_>) -> Result<()> {
    let templates = TemplateSet::load(config)?;
    let assembly = ViewModelBuilder::new(config, &templates)?
        .strict(request.strict)
        .assemble(request.properties, request.class_name, request.namespace)?;

    for skipped in &assembly.skipped {
        warn!("skipped `{}`: {}", skipped.property.name, skipped.error);
    }
    if !assembly.unresolved.is_empty() {
        warn!(
            "generated source still contains merge fields: {}",
            assembly.unresolved.join(", ")
        );
    }

    info!(
        "generated {} from {} properties ({} skipped)",
        assembly.class_name,
        request.properties.len(),
        assembly.skipped.len()
    );
    deliver(
        &assembly.source,
        &assembly.class_name,
        &request.sink,
        &config.export,
    )
}

fn read_properties(path: &Path) -> Result<Vec<PropertyDescriptor>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read properties: {}", path.display()))?;
    serde_json::from_str(&data)
        .with_context(|| format!("invalid properties file: {}", path.display()))
}

fn read_markup(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read markup: {}", path.display())),
        None => {
            let mut markup = String::new();
            io::stdin()
                .read_to_string(&mut markup)
                .context("failed to read markup from stdin")?;
            Ok(markup)
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .try_init();
}
