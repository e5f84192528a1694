use colored::Colorize;
use std::path::Path;

pub fn handle(config: Option<&Path>) -> anyhow::Result<()> {
    println!("{}", "Validating deployment configuration...".blue());

    let params = match super::load(config) {
        Ok(params) => params,
        Err(e) => {
            eprintln!();
            eprintln!("{}", "✗ configuration error".red().bold());
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    };

    // A dry synthesis catches everything validation alone would miss.
    let naming = cloudloom_core::naming_for(&params)?;
    match cloudloom_core::synthesize(&params, &naming) {
        Ok(manifest) => {
            println!("{}", "✓ deployment configuration is valid".green().bold());
            println!();
            println!("Deployment: {}", params.deployment_id.cyan());
            println!("Region:     {}", params.region);
            println!(
                "Zones:      {}",
                params.availability_zones.join(", ")
            );
            println!("Suffix:     {}", naming.suffix().cyan());
            println!();
            super::print_summary(&manifest.resources);
            Ok(())
        }
        Err(e) => {
            eprintln!();
            eprintln!("{}", "✗ synthesis failed".red().bold());
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    }
}
