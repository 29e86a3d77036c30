//! `nippou category ...`: category edits on the working buffer.

use crate::cmd::{EditOutcome, render_outcome, session_result};
use crate::output::{OutputMode, fail};
use crate::validate;
use crate::workspace;
use clap::{ArgGroup, Args, Subcommand};
use std::path::Path;

#[derive(Subcommand, Debug)]
pub enum CategoryCommand {
    #[command(
        about = "Append a new category",
        after_help = "EXAMPLES:\n    # Add a category; its id is derived from the name\n    nippou category add \"Side Project\""
    )]
    Add(AddCategoryArgs),

    #[command(
        about = "Delete a category and its items",
        after_help = "EXAMPLES:\n    nippou category delete courses"
    )]
    Delete(CategoryIdArgs),

    #[command(
        about = "Rename a category (id is kept)",
        after_help = "EXAMPLES:\n    nippou category rename work \"本業\""
    )]
    Rename(RenameCategoryArgs),

    #[command(
        about = "Reorder a category",
        after_help = "EXAMPLES:\n    # Swap with the previous category\n    nippou category move study --up\n\n    # Move to the first position\n    nippou category move house --to 1"
    )]
    Move(MoveCategoryArgs),
}

#[derive(Args, Debug)]
pub struct AddCategoryArgs {
    /// Display name.
    pub name: String,
}

#[derive(Args, Debug)]
pub struct CategoryIdArgs {
    /// Category id.
    pub id: String,
}

#[derive(Args, Debug)]
pub struct RenameCategoryArgs {
    /// Category id.
    pub id: String,
    /// New display name.
    pub name: String,
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("target").required(true).args(["up", "down", "to"])))]
pub struct MoveCategoryArgs {
    /// Category id.
    pub id: String,

    /// Swap with the previous category.
    #[arg(long)]
    pub up: bool,

    /// Swap with the next category.
    #[arg(long)]
    pub down: bool,

    /// Move to a 1-based position; past the end means last.
    #[arg(long, value_name = "POS")]
    pub to: Option<usize>,
}

pub fn run_category(
    command: &CategoryCommand,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let mut session = workspace::open_session(project_root, output)?;

    let outcome = match command {
        CategoryCommand::Add(args) => {
            if let Err(err) = validate::validate_name(&args.name) {
                return fail(output, &err.to_cli_error());
            }
            let id = session_result(output, session.add_category(&args.name))?;
            EditOutcome::new("category.add", &id, format!("Added category {id}"))
        }
        CategoryCommand::Delete(args) => {
            let removed = session_result(output, session.delete_category(&args.id))?;
            EditOutcome::new(
                "category.delete",
                &args.id,
                format!("Deleted category {} ({} items)", args.id, removed.items.len()),
            )
        }
        CategoryCommand::Rename(args) => {
            if let Err(err) = validate::validate_name(&args.name) {
                return fail(output, &err.to_cli_error());
            }
            session_result(output, session.rename_category(&args.id, &args.name))?;
            EditOutcome::new(
                "category.rename",
                &args.id,
                format!("Renamed category {} to {}", args.id, args.name.trim()),
            )
        }
        CategoryCommand::Move(args) => {
            let moved = if args.up {
                session_result(output, session.move_category_by(&args.id, -1))?
            } else if args.down {
                session_result(output, session.move_category_by(&args.id, 1))?
            } else {
                let pos = args.to.unwrap_or(1);
                let index = match validate::validate_position(pos) {
                    Ok(index) => index,
                    Err(err) => return fail(output, &err.to_cli_error()),
                };
                if index + 1 >= session.config().categories.len() {
                    session_result(output, session.drop_category_at_end(&args.id))?
                } else {
                    session_result(output, session.drop_category(&args.id, index))?
                }
            };
            let position = session
                .config()
                .category(&args.id)
                .map_or(0, |c| c.order);
            let message = if moved {
                format!("Moved category {} to position {position}", args.id)
            } else {
                format!("Category {} already at position {position}", args.id)
            };
            EditOutcome::new("category.move", &args.id, message).changed(moved)
        }
    };

    workspace::write_session(project_root, &session)?;
    render_outcome(output, &outcome)
}
