pub mod app;
pub mod event;
pub mod layout;
pub mod starfield;

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc::error::TryRecvError;
use tracing::{debug, warn};

use crate::app::{AppContext, Result};
use crate::domain::FeedQuery;
use crate::feed::{FeedMessage, FetchWorker};

use self::app::{Command, TuiApp};
use self::event::{AppEvent, EventHandler};

type Tui = Terminal<CrosstermBackend<Stdout>>;

pub async fn run(ctx: Arc<AppContext>, query: FeedQuery) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, ctx, query).await;
    restore_terminal(&mut terminal)?;
    result
}

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_app(terminal: &mut Tui, ctx: Arc<AppContext>, query: FeedQuery) -> Result<()> {
    let mut tui_app = TuiApp::new(query);
    let event_handler = EventHandler::new(Duration::from_millis(100));
    let (worker, mut completions) = FetchWorker::new(ctx.fetcher());

    // Initial load
    if let Some(request) = tui_app.send(FeedMessage::Reload) {
        worker.spawn(request);
    }

    loop {
        terminal.draw(|frame| layout::render(frame, &mut tui_app, &ctx.config.colors))?;

        // Polling blocks for up to one tick; keep it off the runtime workers.
        let next = tokio::task::block_in_place(|| event_handler.next())?;
        match next {
            AppEvent::Key(key) => {
                match tui_app.handle_key(key, &ctx.config.keybindings) {
                    Command::None => {}
                    Command::Fetch(request) => {
                        worker.spawn(request);
                    }
                    Command::OpenUrl(url) => {
                        if let Err(e) = open::that(&url) {
                            warn!("Failed to open {}: {}", url, e);
                            tui_app.set_status(format!("Failed to open browser: {}", e));
                        }
                    }
                }
            }
            AppEvent::Tick => {
                tui_app.tick = tui_app.tick.wrapping_add(1);
            }
        }

        loop {
            match completions.try_recv() {
                Ok(msg) => {
                    if let Some(request) = tui_app.send(msg) {
                        worker.spawn(request);
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    debug!("Fetch channel closed");
                    break;
                }
            }
        }

        if tui_app.should_quit {
            break;
        }
    }

    Ok(())
}
