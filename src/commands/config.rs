use crate::cli::ConfigAction;
use crate::settings::SettingsStore;
use anyhow::Result;
use std::path::PathBuf;

pub fn run(action: &ConfigAction, store: &mut SettingsStore) -> Result<()> {
    match action {
        ConfigAction::Show => {
            println!("{}", serde_json::to_string_pretty(store.settings())?);
        }
        ConfigAction::Get { key } => {
            let settings = store.settings();
            match key.as_str() {
                "preview_enabled" => println!("{}", settings.preview_enabled),
                "default_output_dir" => {
                    println!("{}", display_dir(settings.default_output_dir.as_ref()))
                }
                "last_used_dir" => println!("{}", display_dir(settings.last_used_dir.as_ref())),
                _ => anyhow::bail!("Unknown settings key: {}", key),
            }
        }
        ConfigAction::Set { key, value } => match key.as_str() {
            "preview_enabled" => {
                let enabled = value
                    .parse::<bool>()
                    .map_err(|_| anyhow::anyhow!("Expected true or false, got {:?}", value))?;
                store.set_preview_enabled(enabled)?;
            }
            "default_output_dir" => {
                // An empty value clears the override.
                let dir = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
                store.set_default_output_dir(dir)?;
            }
            "last_used_dir" => {
                store.set_last_used_dir(PathBuf::from(value))?;
            }
            _ => anyhow::bail!("Unknown settings key: {}", key),
        },
    }

    Ok(())
}

fn display_dir(dir: Option<&PathBuf>) -> String {
    dir.map(|d| d.display().to_string()).unwrap_or_default()
}
