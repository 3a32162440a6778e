mod cli;
mod column_menu;
mod confirm;
mod datasets;
mod debounce;
mod detail;
mod feed;
mod filter;
mod float;
mod hint;
mod paths;
mod screen;
mod source;
mod state;
mod storage;
mod table;
mod theme;

use crate::{
    cli::Args,
    state::App,
    storage::{FileStore, KeyValueStore, MemoryStore},
};
use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    ExecutableCommand,
    event::{DisableMouseCapture, EnableMouseCapture},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use simplelog::{Config, WriteLogger};
use std::{fs::File, io::stdout, sync::Arc};

fn init_logging(args: &Args) -> Result<()> {
    let path = args.log_path()?;
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    }
    let file = File::create(&path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    WriteLogger::init(args.log_level.filter(), Config::default(), file)
        .context("logger already initialized")?;
    Ok(())
}

fn open_store(args: &Args) -> Result<Arc<dyn KeyValueStore>> {
    Ok(match args.store_path()? {
        Some(path) => {
            let store = FileStore::open(path);
            log::info!("column layouts stored in {}", store.path().display());
            Arc::new(store)
        }
        None => {
            log::info!("column layouts kept in memory");
            Arc::new(MemoryStore::new())
        }
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    if let Err(e) = args.validate() {
        eprintln!("\n{e}");
        std::process::exit(1);
    }
    init_logging(&args)?;
    let store = open_store(&args)?;
    let mut app = App::new(&args, store)?;

    // --- setup terminal
    let mut out = stdout();
    out.execute(EnterAlternateScreen)?;
    if !args.no_mouse {
        out.execute(EnableMouseCapture)?;
    }
    enable_raw_mode()?;
    let mut term = Terminal::new(CrosstermBackend::new(out))?;
    term.clear()?;

    let res = app.run(&mut term);

    // --- restore terminal
    disable_raw_mode()?;
    let backend = term.backend_mut();
    if !args.no_mouse {
        backend.execute(DisableMouseCapture)?;
    }
    backend.execute(LeaveAlternateScreen)?;
    term.show_cursor()?;

    if let Err(e) = &res {
        log::error!("terminated with error: {e:#}");
    }
    res
}
