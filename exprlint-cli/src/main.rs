//! Standalone CLI wrapper around the `exprlint` library crate.

use anyhow::Result;

fn main() -> Result<()> {
    let code = exprlint::entry_point::run_with_args(std::env::args().skip(1).collect())?;
    std::process::exit(code);
}
