use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::debug;

const DEFAULT_OUT: &str = ".cloudloom/stack.json";

pub fn handle(config: Option<&Path>, out: Option<&Path>) -> anyhow::Result<()> {
    let params = match super::load(config) {
        Ok(params) => params,
        Err(e) => {
            eprintln!("{}", "✗ configuration error".red().bold());
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    };

    let naming = cloudloom_core::naming_for(&params)?;
    let manifest = cloudloom_core::synthesize(&params, &naming)?;

    let out = out
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT));
    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        debug!(dir = %parent.display(), "Creating manifest directory");
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&out, manifest.to_json()?)?;

    println!(
        "{} {}",
        "✓ manifest written to".green().bold(),
        out.display().to_string().cyan()
    );
    println!();
    super::print_summary(&manifest.resources);
    Ok(())
}
