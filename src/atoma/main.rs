use atoma::api::{AtomaApi, CmdMessage, MessageLevel};
use atoma::config::AtomaConfig;
use atoma::document::SaveFormat;
use atoma::error::{AtomaError, Result};
use atoma::index::DisplayNode;
use atoma::model::Theme;
use atoma::store::fs::{default_root, FileStore};
use chrono::{DateTime, Utc};
use clap::Parser;
use colored::*;
use unicode_width::UnicodeWidthChar;

mod args;
mod interactive;
use args::{Cli, Commands};

const CONTENT_WIDTH: usize = 72;
const LINK_MARKER: &str = "↪";

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct AppContext {
    api: AtomaApi<FileStore>,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut ctx = init_context()?;

    match cli.command {
        Some(Commands::Add {
            content,
            under,
            level,
        }) => handle_add(&mut ctx, &content, under.as_deref(), level),
        Some(Commands::List) => handle_list(&ctx),
        Some(Commands::Edit) => interactive::run(&mut ctx.api),
        Some(Commands::Indent { selector }) => {
            print_result(ctx.api.indent(&selector)?);
            Ok(())
        }
        Some(Commands::Outdent { selector }) => {
            print_result(ctx.api.outdent(&selector)?);
            Ok(())
        }
        Some(Commands::Task { selector }) => {
            print_result(ctx.api.toggle_task(&selector)?);
            Ok(())
        }
        Some(Commands::Done { selector }) => {
            print_result(ctx.api.toggle_completed(&selector)?);
            Ok(())
        }
        Some(Commands::Note { selector, text }) => {
            print_result(ctx.api.note(&selector, text.as_deref())?);
            Ok(())
        }
        Some(Commands::Link { selector, yes }) => handle_link(&mut ctx, &selector, yes),
        Some(Commands::Delete { selector }) => {
            print_result(ctx.api.delete(&selector)?);
            Ok(())
        }
        Some(Commands::Export { format }) => handle_export(&ctx, &format),
        Some(Commands::Import { file }) => {
            print_result(ctx.api.import(&file)?);
            Ok(())
        }
        Some(Commands::Clear { yes }) => handle_clear(&mut ctx, yes),
        Some(Commands::Theme { name }) => handle_theme(&mut ctx, name.as_deref()),
        None => handle_list(&ctx),
    }
}

fn init_context() -> Result<AppContext> {
    let root = default_root()?;
    let config = AtomaConfig::load(&root).unwrap_or_default();
    let store = FileStore::new(root);
    let api = AtomaApi::new(store, config.export_dir());
    Ok(AppContext { api })
}

fn handle_add(
    ctx: &mut AppContext,
    content: &str,
    under: Option<&str>,
    level: Option<usize>,
) -> Result<()> {
    print_result(ctx.api.add(content, under, level)?);
    Ok(())
}

fn handle_list(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.list()?;
    print_nodes(&result.listed_nodes);
    if let (Some(theme), Some(saved_at)) = (result.theme, result.saved_at) {
        print_status(result.listed_nodes.len(), theme, saved_at);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_link(ctx: &mut AppContext, selector: &str, yes: bool) -> Result<()> {
    if !yes
        && !confirm("This exports the current list and switches to the branched one. Continue?")?
    {
        println!("{}", "Cancelled.".dimmed());
        return Ok(());
    }
    print_result(ctx.api.link(selector)?);
    Ok(())
}

fn handle_export(ctx: &AppContext, format: &str) -> Result<()> {
    let format = parse_format(format)?;
    print_result(ctx.api.export(format)?);
    Ok(())
}

fn handle_clear(ctx: &mut AppContext, yes: bool) -> Result<()> {
    if !yes && !confirm("Delete every node? This cannot be undone.")? {
        println!("{}", "Cancelled.".dimmed());
        return Ok(());
    }
    print_result(ctx.api.clear()?);
    Ok(())
}

fn handle_theme(ctx: &mut AppContext, name: Option<&str>) -> Result<()> {
    let theme = match name {
        Some(name) => Some(
            name.parse::<Theme>()
                .map_err(AtomaError::Api)?,
        ),
        None => None,
    };
    print_result(ctx.api.theme(theme)?);
    Ok(())
}

fn parse_format(s: &str) -> Result<SaveFormat> {
    match s.to_lowercase().as_str() {
        "md" | "markdown" => Ok(SaveFormat::Markdown),
        "html" | "htm" => Ok(SaveFormat::Html),
        "json" => Ok(SaveFormat::Json),
        other => Err(AtomaError::Api(format!(
            "Unknown format '{}'; expected md, html or json",
            other
        ))),
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    use std::io::Write;
    print!("{} [y/N] ", prompt);
    std::io::stdout().flush().map_err(AtomaError::Io)?;

    let mut input = String::new();
    std::io::stdin()
        .read_line(&mut input)
        .map_err(AtomaError::Io)?;
    Ok(matches!(input.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn print_result(result: atoma::commands::CmdResult) {
    print_nodes(&result.listed_nodes);
    print_messages(&result.messages);
}

fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

fn print_nodes(nodes: &[DisplayNode]) {
    for dn in nodes {
        let indent = "  ".repeat(dn.node.level);

        let marker = if dn.node.is_task {
            if dn.node.is_completed {
                "[x] ".green().to_string()
            } else {
                "[ ] ".yellow().to_string()
            }
        } else {
            String::new()
        };

        let content = truncate_to_width(&dn.node.content, CONTENT_WIDTH);
        let content = if dn.node.is_completed {
            content.dimmed().strikethrough().to_string()
        } else {
            content.normal().to_string()
        };

        let link = if dn.node.is_linked {
            format!(" {}", LINK_MARKER.cyan())
        } else {
            String::new()
        };

        println!(
            "{} {}- {}{}{}",
            format!("{:>3}.", dn.index).dimmed(),
            indent,
            marker,
            content,
            link
        );

        if dn.node.has_note() {
            for line in dn.node.note.trim().lines() {
                println!("     {}  {}", indent, format!("> {}", line).dimmed());
            }
        }
    }
}

fn print_status(count: usize, theme: Theme, saved_at: DateTime<Utc>) {
    println!(
        "{}",
        format!(
            "{} nodes · theme {} · saved {}",
            count,
            theme,
            format_time_ago(saved_at)
        )
        .dimmed()
    );
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let formatter = timeago::Formatter::new();
    formatter.convert(duration.to_std().unwrap_or_default())
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}
