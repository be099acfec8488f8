//! Stats command handler

use anyhow::Result;

use super::Shelf;
use crate::output::Output;

/// Show reading statistics
pub fn show(library: &Shelf, output: &Output) -> Result<()> {
    output.print_stats(library.profile(), &library.stats());
    Ok(())
}
