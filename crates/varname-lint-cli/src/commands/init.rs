//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# varname-lint configuration

[analyzer]
# Module directory or file to check (default: current directory)
# root = "./modules/network"

# Glob patterns to exclude from analysis
exclude = [
    "**/.terraform/**",
]

# Also check .tf files in subdirectories
recursive = false

# Every `var.<name>` assigned to an attribute in a data or resource block
# must end with that attribute's name, e.g. `name = var.instance_name`.
[rules.variable-suffix]
enabled = true
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new("varname-lint.toml"), force)?;

    println!("Created varname-lint.toml");
    println!("\nNext steps:");
    println!("  1. Edit varname-lint.toml to configure the analyzer");
    println!("  2. Run: varname-lint check");

    Ok(())
}

fn write_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;
    Ok(())
}
