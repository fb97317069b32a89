use std::{
    io::{self, Write},
    path::Path,
};

use colored::Colorize;
use log::{debug, trace};

use crate::types::{PushManifest, ResourceType};

fn type_label(resource_type: Option<ResourceType>) -> String {
    match resource_type {
        Some(ResourceType::Document) => "document".magenta().to_string(),
        Some(ResourceType::Script) => "script".yellow().to_string(),
        Some(ResourceType::Style) => "style".cyan().to_string(),
        Some(ResourceType::Image) => "image".green().to_string(),
        Some(ResourceType::Font) => "font".blue().to_string(),
        None => "untyped".dimmed().to_string(),
    }
}

fn destination(written_to: Option<&Path>) -> String {
    match written_to {
        Some(path) => format!("Written to {}", path.display().to_string().blue()),
        None => format!("Not written {}", "(dry run)".dimmed()),
    }
}

/// `written_to` is `None` when the manifest was only printed.
pub fn print_empty_manifest_message<W: Write>(
    writer: &mut W,
    written_to: Option<&Path>,
) -> io::Result<()> {
    debug!("Manifest has no resources to push");
    writeln!(
        writer,
        "{} Nothing to push. {}",
        "✓".green().bold(),
        destination(written_to)
    )?;
    writer.flush()?;
    Ok(())
}

pub fn print_manifest_tree<W: Write>(
    writer: &mut W,
    manifest: &PushManifest,
    written_to: Option<&Path>,
) -> io::Result<()> {
    debug!("Printing manifest tree for {} entries", manifest.len());

    writeln!(
        writer,
        "{} Push manifest ({} entries, {} resources)\n",
        "●".bright_blue(),
        manifest.len().to_string().cyan(),
        manifest.resource_count().to_string().cyan()
    )?;

    for (entry_url, collection) in manifest.iter() {
        trace!("Printing entry: {} with {} resources", entry_url, collection.len());
        writeln!(
            writer,
            "{} ({} resources)",
            entry_url.bright_white().bold(),
            collection.len().to_string().cyan()
        )?;

        for (idx, (resource_url, entry)) in collection.iter().enumerate() {
            let is_last = idx == collection.len() - 1;
            let prefix = if is_last { "└──" } else { "├──" };
            writeln!(
                writer,
                "{}  {} [{}]",
                prefix.dimmed(),
                resource_url,
                type_label(entry.resource_type)
            )?;
        }

        writeln!(writer)?;
    }

    writeln!(writer, "{}", "─".repeat(60).dimmed())?;
    writeln!(writer, "{}", destination(written_to))?;
    writer.flush()?;
    Ok(())
}
