//! Persona listing command handler.

use anyhow::Result;

use crate::config::ConfigManager;
use crate::persona::{PRESETS, sorted_custom_keys};
use crate::ui::Style;

/// Prints preset and custom personas to stdout.
pub fn print_personas() -> Result<()> {
    let manager = ConfigManager::new()?;
    let config = manager.load_or_default();

    println!("{}", Style::header("Preset personas"));
    for preset in PRESETS {
        println!(
            "  {}  {}",
            Style::value(preset.key),
            Style::secondary(preset.description)
        );
    }
    println!();

    let custom_keys = sorted_custom_keys(&config.personas);
    if !custom_keys.is_empty() {
        println!("{}", Style::header("Custom personas"));
        for key in custom_keys {
            let description = config
                .personas
                .get(key)
                .map_or("", |p| p.description.as_str());
            println!("  {}  {}", Style::value(key), Style::secondary(description));
        }
        println!();
    }

    println!(
        "{}",
        Style::hint(format!(
            "Add custom personas under [personas.<key>] in {}",
            manager.config_path().display()
        ))
    );

    Ok(())
}
