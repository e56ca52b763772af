//! memo: command-line host for `memo_core`.
//!
//! # Responsibility
//! - Map one CLI invocation to one session intent.
//! - Own file I/O for backups; core stays storage-agnostic.
//! - Flush any pending save before exiting.

use clap::{Parser, Subcommand};
use log::warn;
use memo_core::{
    format_display_date, init_logging, Debouncer, FilterMode, MemoConfig, MemoSession, NoteChange, NoteGateway,
    SqliteKvStorage, SystemClock, Theme,
};
use std::error::Error;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

type Session = MemoSession<SqliteKvStorage, Debouncer>;

#[derive(Parser)]
#[command(name = "memo")]
#[command(version, about = "Local note-taking store")]
struct Cli {
    /// Slot database path (overrides MEMO_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a note and make it active
    New {
        #[arg(short, long)]
        title: Option<String>,
    },

    /// List visible notes, pinned first
    List {
        /// Which notes to show: all or pinned
        #[arg(short, long, default_value = "all")]
        filter: FilterMode,

        /// Case-insensitive search over title, content and tags
        #[arg(short, long, default_value = "")]
        search: String,
    },

    /// Print one note
    Show { id: String },

    /// Replace title and/or content
    Edit {
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        content: Option<String>,
    },

    /// Add a tag
    Tag { id: String, tag: String },

    /// Remove a tag
    Untag { id: String, tag: String },

    /// Toggle the pinned flag
    Pin { id: String },

    /// Delete a note
    Delete { id: String },

    /// Write a dated JSON backup
    Export {
        /// Output directory
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },

    /// Replace all notes with a JSON backup
    Import {
        file: PathBuf,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show or change the theme (light, dark, toggle)
    Theme { value: Option<String> },

    /// Health check
    Ping,
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if let Commands::Ping = cli.command {
        println!("memo_core ping={}", memo_core::ping());
        println!("memo_core version={}", memo_core::core_version());
        return Ok(());
    }

    let mut config = MemoConfig::from_env();
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(dir) = config.log_dir_under(&std::env::current_dir()?) {
        match dir.to_str() {
            Some(dir) => init_logging(&config.log_level, dir)?,
            None => eprintln!("warning: log directory is not valid UTF-8; file logging disabled"),
        }
    }

    let mut session = open_session(&config)?;
    let result = dispatch(&mut session, cli.command);
    if let Err(err) = session.flush() {
        warn!("event=cli_flush module=cli status=error error={err}");
        return Err(err.into());
    }
    result
}

fn open_session(config: &MemoConfig) -> Result<Session, Box<dyn Error>> {
    let storage = SqliteKvStorage::open(&config.db_path)?;
    let gateway = NoteGateway::with_keys(storage, &config.notes_key, &config.theme_key);
    Ok(MemoSession::open(
        gateway,
        Debouncer::new(),
        Box::new(SystemClock),
        config.save_delay,
    ))
}

fn dispatch(session: &mut Session, command: Commands) -> Result<(), Box<dyn Error>> {
    match command {
        Commands::New { title } => {
            let id = session.new_note();
            if let Some(title) = title {
                session.set_title(title);
            }
            println!("{id}");
        }
        Commands::List { filter, search } => {
            session.set_filter(filter);
            session.set_search(search);
            cmd_list(session);
        }
        Commands::Show { id } => cmd_show(session, &id)?,
        Commands::Edit { id, title, content } => {
            require_note(session, &id)?;
            if let Some(title) = title {
                session.edit(&id, NoteChange::SetTitle(title));
            }
            if let Some(content) = content {
                session.edit(&id, NoteChange::SetContent(content));
            }
        }
        Commands::Tag { id, tag } => {
            require_note(session, &id)?;
            session.edit(&id, NoteChange::AddTag(tag));
        }
        Commands::Untag { id, tag } => {
            require_note(session, &id)?;
            session.edit(&id, NoteChange::RemoveTag(tag));
        }
        Commands::Pin { id } => {
            require_note(session, &id)?;
            session.edit(&id, NoteChange::TogglePin);
        }
        Commands::Delete { id } => {
            require_note(session, &id)?;
            session.delete(&id);
            if let Some(active) = session.active_id() {
                println!("active={active}");
            }
        }
        Commands::Export { dir } => cmd_export(session, &dir)?,
        Commands::Import { file, yes } => cmd_import(session, &file, yes)?,
        Commands::Theme { value } => cmd_theme(session, value.as_deref())?,
        Commands::Ping => {}
    }
    Ok(())
}

fn cmd_list(session: &Session) {
    let items = session.visible_items();
    if items.is_empty() {
        println!("(no notes)");
        return;
    }
    for item in items {
        let marker = if item.is_active { '*' } else { ' ' };
        let pin = if item.pinned { " [pinned]" } else { "" };
        println!(
            "{marker} {}  {}{pin}\n    {}  {}",
            item.id, item.display_title, item.updated_label, item.snippet
        );
    }
}

fn cmd_show(session: &Session, id: &str) -> Result<(), Box<dyn Error>> {
    let note = require_note(session, id)?;
    println!("id: {}", note.id);
    println!("title: {}", note.title);
    println!("tags: {}", note.tags.join(", "));
    println!("pinned: {}", note.pinned);
    println!("created: {}", format_display_date(&note.created_at));
    println!("updated: {}", format_display_date(&note.updated_at));
    println!();
    println!("{}", note.content);
    Ok(())
}

fn cmd_export(session: &Session, dir: &Path) -> Result<(), Box<dyn Error>> {
    let document = session.export()?;
    let path = dir.join(session.export_file_name());
    fs::write(&path, document)?;
    println!("exported {} notes to {}", session.notes().len(), path.display());
    Ok(())
}

fn cmd_import(session: &mut Session, file: &Path, yes: bool) -> Result<(), Box<dyn Error>> {
    let text = fs::read_to_string(file)?;
    let pending = session.prepare_import(&text)?;

    if !yes
        && !confirm(&format!(
            "Replace {} existing notes with {} imported notes?",
            session.notes().len(),
            pending.len()
        ))?
    {
        println!("import cancelled");
        return Ok(());
    }

    let count = session.confirm_import(pending);
    println!("imported; {count} notes");
    Ok(())
}

fn cmd_theme(session: &mut Session, value: Option<&str>) -> Result<(), Box<dyn Error>> {
    let theme = match value {
        None => session.theme(),
        Some("toggle") => session.toggle_theme()?,
        Some(raw) => {
            let theme = raw.parse::<Theme>()?;
            session.set_theme(theme)?;
            theme
        }
    };
    println!("{theme}");
    Ok(())
}

fn require_note<'s>(session: &'s Session, id: &str) -> Result<&'s memo_core::Note, Box<dyn Error>> {
    session
        .find(id)
        .ok_or_else(|| format!("note not found: {id}").into())
}

fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
