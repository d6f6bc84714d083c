use crossterm::event::{KeyCode, KeyEvent};

use crate::config::KeybindingConfig;
use crate::domain::{FeedQuery, Photo};
use crate::feed::{FeedMachine, FeedMessage, FeedState, FetchRequest};
use crate::tui::event::Action;

/// Longest sol the input box accepts.
const MAX_SOL_DIGITS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Browse,
    EditSol,
    /// Enlarged view of the selected photo.
    Viewing,
}

/// What the event loop has to do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    None,
    Fetch(FetchRequest),
    OpenUrl(String),
}

impl From<Option<FetchRequest>> for Command {
    fn from(request: Option<FetchRequest>) -> Self {
        request.map(Command::Fetch).unwrap_or(Command::None)
    }
}

pub struct TuiApp {
    pub feed: FeedMachine,
    pub mode: Mode,
    pub selected: usize,
    pub sol_input: String,
    pub status_message: Option<String>,
    pub should_quit: bool,
    pub tick: u64,
    // Grid geometry from the last render
    pub grid_columns: usize,
    pub grid_offset: usize,
}

impl TuiApp {
    pub fn new(query: FeedQuery) -> Self {
        Self {
            feed: FeedMachine::new(query),
            mode: Mode::Browse,
            selected: 0,
            sol_input: String::new(),
            status_message: None,
            should_quit: false,
            tick: 0,
            grid_columns: 1,
            grid_offset: 0,
        }
    }

    pub fn feed_state(&self) -> &FeedState {
        self.feed.state()
    }

    pub fn selected_photo(&self) -> Option<&Photo> {
        self.feed.state().photos.get(self.selected)
    }

    /// Forward a message to the feed, resetting the cursor on query changes.
    pub fn send(&mut self, msg: FeedMessage) -> Option<FetchRequest> {
        let before = self.feed.query();
        let request = self.feed.update(msg);
        if self.feed.query() != before || request.is_some_and(|r| r.page == 1) {
            self.selected = 0;
            self.grid_offset = 0;
        }
        request
    }

    pub fn handle_key(&mut self, key: KeyEvent, bindings: &KeybindingConfig) -> Command {
        if self.mode == Mode::EditSol {
            return self.handle_sol_key(key);
        }

        let action = bindings.get_action(&key);
        match self.mode {
            Mode::Viewing => self.handle_viewing(action),
            _ => self.handle_browse(action),
        }
    }

    fn handle_browse(&mut self, action: Action) -> Command {
        match action {
            Action::Quit => self.should_quit = true,
            Action::MoveUp => self.move_vertical(-1),
            Action::MoveDown => self.move_vertical(1),
            Action::MoveLeft => self.move_horizontal(-1),
            Action::MoveRight => self.move_horizontal(1),
            Action::NextRover => {
                let rover = self.feed.query().rover.next();
                return self.send(FeedMessage::SelectRover(rover)).into();
            }
            Action::PrevRover => {
                let rover = self.feed.query().rover.prev();
                return self.send(FeedMessage::SelectRover(rover)).into();
            }
            Action::EditSol => {
                self.sol_input = self.feed.query().sol.to_string();
                self.mode = Mode::EditSol;
            }
            Action::OpenPhoto => {
                if self.selected_photo().is_some() {
                    self.mode = Mode::Viewing;
                }
            }
            Action::LoadMore => return self.send(FeedMessage::LoadMore).into(),
            Action::Retry => {
                if !self.feed.can_retry() {
                    self.set_status("Nothing to retry".to_string());
                    return Command::None;
                }
                return self.send(FeedMessage::Retry).into();
            }
            Action::Reload => return self.send(FeedMessage::Reload).into(),
            Action::OpenInBrowser => {
                if let Some(photo) = self.selected_photo() {
                    return Command::OpenUrl(photo.img_src.clone());
                }
            }
            Action::Close => self.clear_status(),
            Action::None => {}
        }
        Command::None
    }

    fn handle_viewing(&mut self, action: Action) -> Command {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Close | Action::OpenPhoto => self.mode = Mode::Browse,
            Action::MoveLeft | Action::MoveUp => self.move_horizontal(-1),
            Action::MoveRight | Action::MoveDown => self.move_horizontal(1),
            Action::OpenInBrowser => {
                if let Some(photo) = self.selected_photo() {
                    return Command::OpenUrl(photo.img_src.clone());
                }
            }
            _ => {}
        }
        Command::None
    }

    fn handle_sol_key(&mut self, key: KeyEvent) -> Command {
        match key.code {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                if self.sol_input.len() < MAX_SOL_DIGITS {
                    self.sol_input.push(c);
                }
            }
            KeyCode::Backspace => {
                self.sol_input.pop();
            }
            KeyCode::Esc => {
                self.mode = Mode::Browse;
                self.sol_input.clear();
            }
            KeyCode::Enter => {
                self.mode = Mode::Browse;
                let sol = FeedQuery::parse_sol(&self.sol_input);
                self.sol_input.clear();
                return self.send(FeedMessage::SelectSol(sol)).into();
            }
            _ => {}
        }
        Command::None
    }

    fn move_horizontal(&mut self, delta: isize) {
        let len = self.feed.state().photos.len();
        if len == 0 {
            return;
        }
        self.selected = self
            .selected
            .saturating_add_signed(delta)
            .min(len - 1);
    }

    fn move_vertical(&mut self, delta: isize) {
        let len = self.feed.state().photos.len();
        if len == 0 {
            return;
        }
        let step = self.grid_columns.max(1) as isize * delta;
        let target = self.selected as isize + step;
        if (0..len as isize).contains(&target) {
            self.selected = target as usize;
        } else if delta > 0 {
            // Partial last row: land on the last card.
            let last_row = (len - 1) / self.grid_columns.max(1);
            if self.selected / self.grid_columns.max(1) < last_row {
                self.selected = len - 1;
            }
        }
    }

    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }
}
