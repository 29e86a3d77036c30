//! `nippou show`: print the working configuration.

use crate::output::{OutputMode, pretty_section, render, render_mode};
use crate::workspace;
use clap::Args;
use nippou_core::model::{Configuration, ItemKind};
use nippou_core::view::render_view;
use std::io::{self, Write};
use std::path::Path;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Print the rendering shape (`title`/`label`) instead of the stored shape.
    #[arg(long)]
    pub render: bool,
}

fn kind_text(kind: &ItemKind) -> String {
    match kind.suffix() {
        Some(suffix) => format!("{kind}:{suffix}"),
        None => kind.to_string(),
    }
}

fn write_text(config: &Configuration, w: &mut dyn Write) -> io::Result<()> {
    for category in &config.categories {
        writeln!(w, "{}\t{}", category.id, category.name)?;
        for item in &category.items {
            writeln!(
                w,
                "{}/{}\t{}\t{}",
                category.id,
                item.id,
                kind_text(&item.kind),
                item.name
            )?;
        }
    }
    Ok(())
}

fn write_pretty(config: &Configuration, w: &mut dyn Write) -> io::Result<()> {
    if config.categories.is_empty() {
        return writeln!(w, "(no categories)");
    }
    for category in &config.categories {
        pretty_section(w, &format!("{}. {} [{}]", category.order, category.name, category.id))?;
        if category.items.is_empty() {
            writeln!(w, "   (empty)")?;
        }
        for item in &category.items {
            writeln!(
                w,
                "   {}. {} [{}] {}",
                item.order,
                item.name,
                item.id,
                kind_text(&item.kind)
            )?;
        }
        writeln!(w)?;
    }
    Ok(())
}

pub fn run_show(args: &ShowArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let session = workspace::open_session(project_root, output)?;
    let config = session.config();

    if args.render {
        let view = render_view(config);
        return render(output, &view, |v, w| {
            writeln!(w, "{}", serde_json::to_string_pretty(v)?)
        });
    }

    render_mode(output, config, write_text, write_pretty)
}
