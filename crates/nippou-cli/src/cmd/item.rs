//! `nippou item ...`: item edits on the working buffer.

use crate::cmd::{EditOutcome, render_outcome, session_result};
use crate::output::{OutputMode, fail};
use crate::validate;
use crate::workspace;
use clap::{ArgGroup, Args, Subcommand, ValueEnum};
use nippou_core::model::ItemKind;
use nippou_core::session::EditSession;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Check,
    Count,
    Streak,
}

impl KindArg {
    fn into_kind(self, suffix: Option<&str>) -> ItemKind {
        match self {
            Self::Check => ItemKind::Check,
            Self::Count => ItemKind::Count {
                suffix: suffix.map(ToString::to_string),
            },
            Self::Streak => ItemKind::Streak,
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Check => "check",
            Self::Count => "count",
            Self::Streak => "streak",
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ItemCommand {
    #[command(
        about = "Append an item to a category",
        after_help = "EXAMPLES:\n    # Plain checkbox\n    nippou item add exercise \"Stretching\"\n\n    # Count with a unit\n    nippou item add exercise \"Push-ups\" --type count --suffix 回"
    )]
    Add(AddItemArgs),

    #[command(about = "Delete an item", after_help = "EXAMPLES:\n    nippou item delete courses natsu")]
    Delete(ItemRefArgs),

    #[command(
        about = "Rename an item (id is kept)",
        after_help = "EXAMPLES:\n    nippou item rename study duo \"Duolingo (German)\""
    )]
    Rename(RenameItemArgs),

    #[command(
        about = "Change an item's type",
        after_help = "EXAMPLES:\n    nippou item type study license streak\n    nippou item type exercise radio count --suffix 分"
    )]
    Type(SetTypeArgs),

    #[command(
        about = "Reorder an item or move it to another category",
        after_help = "EXAMPLES:\n    # Swap with the next item\n    nippou item move work bo-e --down\n\n    # Move into another category (appended)\n    nippou item move house housework --to-category exercise\n\n    # Move into another category at position 1\n    nippou item move house housework --to-category exercise --to 1"
    )]
    Move(MoveItemArgs),
}

#[derive(Args, Debug)]
pub struct AddItemArgs {
    /// Category id.
    pub category: String,
    /// Display name.
    pub name: String,
    /// Item type.
    #[arg(long = "type", value_enum, default_value = "check")]
    pub kind: KindArg,
    /// Unit suffix for count items.
    #[arg(long)]
    pub suffix: Option<String>,
}

#[derive(Args, Debug)]
pub struct ItemRefArgs {
    /// Category id.
    pub category: String,
    /// Item id.
    pub item: String,
}

#[derive(Args, Debug)]
pub struct RenameItemArgs {
    /// Category id.
    pub category: String,
    /// Item id.
    pub item: String,
    /// New display name.
    pub name: String,
}

#[derive(Args, Debug)]
pub struct SetTypeArgs {
    /// Category id.
    pub category: String,
    /// Item id.
    pub item: String,
    /// New type.
    #[arg(value_enum)]
    pub kind: KindArg,
    /// Unit suffix for count items.
    #[arg(long)]
    pub suffix: Option<String>,
}

#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("target")
        .required(true)
        .multiple(true)
        .args(["up", "down", "to", "to_category"])
))]
pub struct MoveItemArgs {
    /// Category id.
    pub category: String,
    /// Item id.
    pub item: String,

    /// Swap with the previous item.
    #[arg(long, conflicts_with_all = ["down", "to", "to_category"])]
    pub up: bool,

    /// Swap with the next item.
    #[arg(long, conflicts_with_all = ["to", "to_category"])]
    pub down: bool,

    /// 1-based destination position; past the end appends.
    #[arg(long, value_name = "POS")]
    pub to: Option<usize>,

    /// Destination category id (appends unless --to is given).
    #[arg(long, value_name = "CATEGORY")]
    pub to_category: Option<String>,
}

fn run_move(
    session: &mut EditSession,
    args: &MoveItemArgs,
    output: OutputMode,
) -> anyhow::Result<EditOutcome> {
    let destination = args.to_category.as_deref().unwrap_or(&args.category);
    let (moved, landed) = if args.up || args.down {
        let delta = if args.up { -1 } else { 1 };
        let moved = session_result(output, session.move_item_by(&args.category, &args.item, delta))?;
        (moved, args.item.clone())
    } else {
        let result = match args.to {
            Some(pos) => {
                let index = match validate::validate_position(pos) {
                    Ok(index) => index,
                    Err(err) => return fail(output, &err.to_cli_error()),
                };
                session_result(
                    output,
                    session.drop_item(&args.category, &args.item, destination, index),
                )?
            }
            None => session_result(
                output,
                session.drop_item_at_end(&args.category, &args.item, destination),
            )?,
        };
        result.map_or_else(|| (false, args.item.clone()), |id| (true, id))
    };

    let position = session
        .config()
        .category(destination)
        .and_then(|c| c.item(&landed))
        .map_or(0, |i| i.order);
    let message = if moved && landed == args.item {
        format!("Moved item {} to {destination} position {position}", args.item)
    } else if moved {
        format!(
            "Moved item {} to {destination} position {position} as {landed} (id taken)",
            args.item
        )
    } else {
        format!("Item {} already at {destination} position {position}", args.item)
    };
    Ok(EditOutcome::new("item.move", destination, message)
        .with_item(landed)
        .changed(moved))
}

pub fn run_item(command: &ItemCommand, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let mut session = workspace::open_session(project_root, output)?;

    let outcome = match command {
        ItemCommand::Add(args) => {
            if let Err(err) = validate::validate_name(&args.name)
                .and_then(|()| validate::validate_suffix(args.kind.as_str(), args.suffix.as_deref()))
            {
                return fail(output, &err.to_cli_error());
            }
            let kind = args.kind.into_kind(args.suffix.as_deref());
            let id = session_result(output, session.add_item(&args.category, &args.name, kind))?;
            EditOutcome::new("item.add", &args.category, format!("Added item {}/{id}", args.category))
                .with_item(id)
        }
        ItemCommand::Delete(args) => {
            let removed = session_result(output, session.delete_item(&args.category, &args.item))?;
            EditOutcome::new(
                "item.delete",
                &args.category,
                format!("Deleted item {}/{} ({})", args.category, args.item, removed.name),
            )
            .with_item(&args.item)
        }
        ItemCommand::Rename(args) => {
            if let Err(err) = validate::validate_name(&args.name) {
                return fail(output, &err.to_cli_error());
            }
            session_result(
                output,
                session.rename_item(&args.category, &args.item, &args.name),
            )?;
            EditOutcome::new(
                "item.rename",
                &args.category,
                format!("Renamed item {}/{} to {}", args.category, args.item, args.name.trim()),
            )
            .with_item(&args.item)
        }
        ItemCommand::Type(args) => {
            if let Err(err) = validate::validate_suffix(args.kind.as_str(), args.suffix.as_deref()) {
                return fail(output, &err.to_cli_error());
            }
            let kind = args.kind.into_kind(args.suffix.as_deref());
            let label = kind.to_string();
            session_result(
                output,
                session.set_item_kind(&args.category, &args.item, kind),
            )?;
            EditOutcome::new(
                "item.type",
                &args.category,
                format!("Set {}/{} to {label}", args.category, args.item),
            )
            .with_item(&args.item)
        }
        ItemCommand::Move(args) => run_move(&mut session, args, output)?,
    };

    workspace::write_session(project_root, &session)?;
    render_outcome(output, &outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(subcommand)]
        command: ItemCommand,
    }

    fn parse_move(args: &[&str]) -> Result<MoveItemArgs, clap::Error> {
        let mut argv = vec!["test", "move"];
        argv.extend_from_slice(args);
        Wrapper::try_parse_from(argv).map(|w| match w.command {
            ItemCommand::Move(args) => args,
            other => panic!("unexpected command: {other:?}"),
        })
    }

    #[test]
    fn add_defaults_to_check() {
        let w = Wrapper::parse_from(["test", "add", "work", "Inbox zero"]);
        match w.command {
            ItemCommand::Add(args) => {
                assert_eq!(args.kind, KindArg::Check);
                assert!(args.suffix.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn add_count_with_suffix() {
        let w = Wrapper::parse_from(["test", "add", "exercise", "Push-ups", "--type", "count", "--suffix", "回"]);
        match w.command {
            ItemCommand::Add(args) => {
                assert_eq!(
                    args.kind.into_kind(args.suffix.as_deref()),
                    ItemKind::Count { suffix: Some("回".into()) }
                );
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn move_needs_a_target() {
        assert!(parse_move(&["work", "bo-e"]).is_err());
    }

    #[test]
    fn move_across_with_position() {
        let args = parse_move(&["house", "housework", "--to-category", "exercise", "--to", "1"])
            .expect("parse");
        assert_eq!(args.to_category.as_deref(), Some("exercise"));
        assert_eq!(args.to, Some(1));
    }

    #[test]
    fn neighbour_moves_exclude_absolute_targets() {
        assert!(parse_move(&["work", "bo-e", "--up", "--to", "2"]).is_err());
        assert!(parse_move(&["work", "bo-e", "--down", "--to-category", "house"]).is_err());
        assert!(parse_move(&["work", "bo-e", "--up", "--down"]).is_err());
        assert!(parse_move(&["work", "bo-e", "--down"]).is_ok());
    }

    #[test]
    fn kind_arg_maps_to_item_kind() {
        assert_eq!(KindArg::Streak.into_kind(None), ItemKind::Streak);
        assert_eq!(KindArg::Check.into_kind(Some("x")), ItemKind::Check);
    }
}
