//! Category management commands.

use clap::Subcommand;
use tasko_core::storage::Database;
use tasko_core::Category;

#[derive(Subcommand)]
pub enum CategoryAction {
    /// Add a category
    Add {
        /// Category name
        name: String,
        /// Display color (hex)
        #[arg(long, default_value = "#8b5cf6")]
        color: String,
    },
    /// List categories
    List,
    /// Delete a category
    Delete {
        /// Category ID
        id: String,
    },
}

pub fn run(action: CategoryAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        CategoryAction::Add { name, color } => {
            let category = Category::new(name, color);
            db.add_category(&category)?;
            eprintln!("Category created: {}", category.id);
            println!("{}", serde_json::to_string_pretty(&category)?);
        }
        CategoryAction::List => {
            let categories = db.list_categories()?;
            println!("{}", serde_json::to_string_pretty(&categories)?);
        }
        CategoryAction::Delete { id } => {
            if db.delete_category(&id)? {
                eprintln!("Category deleted: {id}");
            } else {
                return Err(format!("no category with id {id}").into());
            }
        }
    }

    Ok(())
}
