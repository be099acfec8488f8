//! Profile command handlers

use anyhow::{bail, Result};

use super::{saved, Shelf};
use crate::output::Output;

/// Show the reader's display name
pub fn show(library: &Shelf, output: &Output) -> Result<()> {
    output.print_profile(library.profile());
    Ok(())
}

/// Change the reader's display name
pub fn set(library: &mut Shelf, name: String, output: &Output) -> Result<()> {
    let Some(updated) = library.set_user_name(name) else {
        bail!("Name cannot be empty");
    };
    let profile = saved(updated, output);

    output.success(&format!("Name set to {}", profile));
    Ok(())
}
