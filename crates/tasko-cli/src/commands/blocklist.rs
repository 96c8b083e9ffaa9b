//! Blocked-resource management commands.

use clap::Subcommand;
use tasko_core::blocklist::{active_block_update, BlockedResource, ResourceKind};
use tasko_core::storage::{Config, Database};

#[derive(Subcommand)]
pub enum BlocklistAction {
    /// Add a resource to block during focused work
    Add {
        /// URL or hostname to block
        url: String,
        /// Display name (defaults to the URL)
        #[arg(long)]
        name: Option<String>,
        /// Resource kind: website or application (default: website)
        #[arg(long, default_value = "website")]
        kind: String,
    },
    /// List blocked resources
    List,
    /// Delete a blocked resource
    Delete {
        /// Resource ID
        id: String,
    },
    /// Print the update the blocking extension would receive right now
    Active,
}

pub fn run(action: BlocklistAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        BlocklistAction::Add { url, name, kind } => {
            let kind = kind.parse::<ResourceKind>()?;
            let name = name.unwrap_or_else(|| url.clone());
            let resource = BlockedResource::new(url, name, kind);
            db.add_blocked_resource(&resource)?;
            eprintln!("Blocked resource created: {}", resource.id);
            println!("{}", serde_json::to_string_pretty(&resource)?);
        }
        BlocklistAction::List => {
            let resources = db.list_blocked_resources()?;
            println!("{}", serde_json::to_string_pretty(&resources)?);
        }
        BlocklistAction::Delete { id } => {
            if db.delete_blocked_resource(&id)? {
                eprintln!("Blocked resource deleted: {id}");
            } else {
                return Err(format!("no blocked resource with id {id}").into());
            }
        }
        BlocklistAction::Active => {
            let tasks = db.list_tasks()?;
            let resources = db.list_blocked_resources()?;
            let mut update = active_block_update(&tasks, &resources);
            if !Config::load_or_default().blocking.enabled {
                update.is_blocking = false;
                update.resources.clear();
            }
            println!("{}", serde_json::to_string_pretty(&update)?);
        }
    }

    Ok(())
}
