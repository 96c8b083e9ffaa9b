//! Configuration commands.

use clap::Subcommand;
use tasko_core::storage::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value by dot-separated key
    Get {
        /// Key, e.g. `timer.focus_duration_min`
        key: String,
    },
    /// Set a config value by dot-separated key
    Set {
        /// Key, e.g. `blocking.enabled`
        key: String,
        /// New value
        value: String,
    },
    /// Print the whole configuration
    List,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let cfg = Config::load_or_default();
            match cfg.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown config key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut cfg = Config::load_or_default();
            cfg.set(&key, &value)?;
            println!("{key} = {value}");
        }
        ConfigAction::List => {
            let cfg = Config::load_or_default();
            println!("{}", serde_json::to_string_pretty(&cfg)?);
        }
    }

    Ok(())
}
