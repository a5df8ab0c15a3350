use std::collections::HashSet;

use anyhow::{bail, Result};

use crate::config::TypeData;
use crate::template::merge::MergeFieldCatalog;

pub fn validate_catalog(catalog: &MergeFieldCatalog) -> Result<()> {
    let mut seen = HashSet::new();
    for (field, token) in catalog.tokens() {
        if token.trim().is_empty() {
            bail!("merge field `{}` must not be empty", field.key());
        }
        if !seen.insert(token) {
            bail!("merge field token `{token}` is used more than once");
        }
    }

    // A token nested inside another would make substitution order observable.
    for (outer_field, outer) in catalog.tokens() {
        for (inner_field, inner) in catalog.tokens() {
            if outer_field != inner_field && outer.contains(inner) {
                bail!(
                    "merge field `{}` ({inner}) overlaps `{}` ({outer})",
                    inner_field.key(),
                    outer_field.key()
                );
            }
        }
    }

    Ok(())
}

pub fn validate_type_data(type_data: &TypeData) -> Result<()> {
    let command_type = &type_data.command_implementation_type;
    if command_type.trim().is_empty() {
        bail!("command_implementation_type must not be empty");
    }
    if command_type.chars().any(char::is_whitespace) {
        bail!("command_implementation_type must not contain whitespace");
    }
    Ok(())
}
