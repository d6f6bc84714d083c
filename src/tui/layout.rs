use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::config::ColorConfig;
use crate::domain::Photo;
use crate::feed::FeedPhase;
use crate::tui::app::{Mode, TuiApp};
use crate::tui::starfield::Starfield;

const CARD_WIDTH: u16 = 32;
const CARD_HEIGHT: u16 = 6;
const SPINNER: [char; 4] = ['◐', '◓', '◑', '◒'];

pub fn render(frame: &mut Frame, app: &mut TuiApp, colors: &ColorConfig) {
    frame.render_widget(Starfield::new(app.tick, colors.star), frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Title and selectors
            Constraint::Min(CARD_HEIGHT),
            Constraint::Length(1), // Feed footer
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0], colors);
    render_body(frame, app, chunks[1], colors);
    render_footer(frame, app, chunks[2], colors);
    render_status_bar(frame, app, chunks[3], colors);

    if app.mode == Mode::Viewing {
        let area = frame.area();
        if let Some(photo) = app.selected_photo() {
            render_photo_modal(frame, photo, area, colors);
        }
    }
}

fn render_header(frame: &mut Frame, app: &TuiApp, area: Rect, colors: &ColorConfig) {
    let query = app.feed.query();
    let editing = app.mode == Mode::EditSol;

    let sol_text = if editing {
        format!("[{}_]", app.sol_input)
    } else {
        format!("[{}]", query.sol)
    };
    let sol_style = if editing {
        Style::default()
            .fg(colors.active_border)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };

    let lines = vec![
        Line::from(Span::styled(
            "Mars Rover Gallery",
            Style::default()
                .fg(colors.card_title)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::raw("Rover: "),
            Span::styled(
                format!("◀ {} ▶", query.rover),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("   Sol: "),
            Span::styled(sol_text, sol_style),
            Span::styled(
                format!(
                    "   Day {} of mission (max: {})",
                    query.sol,
                    query.rover.max_sol_hint()
                ),
                Style::default().fg(colors.card_meta),
            ),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(colors.inactive_border));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_body(frame: &mut Frame, app: &mut TuiApp, area: Rect, colors: &ColorConfig) {
    let state = app.feed_state();

    if state.photos.is_empty() {
        let message = match state.phase {
            FeedPhase::Idle | FeedPhase::LoadingInitial | FeedPhase::LoadingMore => {
                let spin = SPINNER[(app.tick as usize / 2) % SPINNER.len()];
                Text::from(format!("{} Loading photos...", spin))
            }
            FeedPhase::Errored | FeedPhase::Empty | FeedPhase::Ready => {
                let error = state.error.as_deref().unwrap_or("No photos.");
                let hint = if app.feed.can_retry() {
                    "Press r to retry"
                } else {
                    "Press e to pick another sol or Tab for another rover"
                };
                Text::from(vec![
                    Line::from(Span::styled(error, Style::default().fg(colors.error_fg))),
                    Line::from(""),
                    Line::from(hint),
                ])
            }
        };
        render_centered_message(frame, message, area);
        return;
    }

    render_grid(frame, app, area, colors);
}

fn render_centered_message(frame: &mut Frame, text: Text, area: Rect) {
    let height = (text.lines.len() as u16).min(area.height);
    let top = area.y + area.height.saturating_sub(height) / 2;
    let rect = Rect::new(area.x, top, area.width, height);
    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(text).alignment(Alignment::Center),
        rect,
    );
}

fn render_grid(frame: &mut Frame, app: &mut TuiApp, area: Rect, colors: &ColorConfig) {
    let columns = (area.width / CARD_WIDTH).max(1) as usize;
    let visible_rows = (area.height / CARD_HEIGHT).max(1) as usize;
    app.grid_columns = columns;

    // Keep the selected row on screen.
    let selected_row = app.selected / columns;
    if selected_row < app.grid_offset {
        app.grid_offset = selected_row;
    } else if selected_row >= app.grid_offset + visible_rows {
        app.grid_offset = selected_row + 1 - visible_rows;
    }

    let card_width = area.width / columns as u16;
    let photos = &app.feed.state().photos;
    let first = app.grid_offset * columns;
    let last = (first + visible_rows * columns).min(photos.len());

    for (i, photo) in photos.iter().enumerate().take(last).skip(first) {
        let slot = i - first;
        let rect = Rect::new(
            area.x + (slot % columns) as u16 * card_width,
            area.y + (slot / columns) as u16 * CARD_HEIGHT,
            card_width,
            CARD_HEIGHT.min(area.height),
        );
        render_card(frame, photo, rect, i == app.selected, colors);
    }
}

fn render_card(frame: &mut Frame, photo: &Photo, area: Rect, selected: bool, colors: &ColorConfig) {
    let (border_style, title_style) = if selected {
        (
            Style::default().fg(colors.selection_bg),
            Style::default()
                .bg(colors.selection_bg)
                .fg(colors.selection_fg)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        (
            Style::default().fg(colors.inactive_border),
            Style::default().fg(colors.card_title),
        )
    };

    let lines = vec![
        Line::from(Span::styled(photo.camera.full_name.clone(), Style::default())),
        Line::from(Span::styled(
            format!("Sol: {}  {}", photo.sol, photo.short_date()),
            Style::default().fg(colors.card_meta),
        )),
        Line::from(Span::styled(
            format!("#{} {}", photo.id, photo.camera.name),
            Style::default().fg(colors.card_meta),
        )),
    ];

    let block = Block::default()
        .title(Span::styled(format!(" {} ", photo.rover.name), title_style))
        .borders(Borders::ALL)
        .border_style(border_style);

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_footer(frame: &mut Frame, app: &TuiApp, area: Rect, colors: &ColorConfig) {
    let state = app.feed_state();
    if state.photos.is_empty() {
        return;
    }

    let mut spans = vec![Span::raw(format!(
        " {} photos, page {} ",
        state.photos.len(),
        state.page
    ))];

    if let Some(banner) = state.banner() {
        spans.push(Span::styled(
            format!(" {} (r: retry) ", banner),
            Style::default().fg(colors.banner_fg).bg(colors.banner_bg),
        ));
        spans.push(Span::raw(" "));
    }

    let tail = if state.phase == FeedPhase::LoadingMore {
        "Loading..."
    } else if state.has_more {
        "n: Load more"
    } else {
        "End of photos for this sol"
    };
    spans.push(Span::styled(tail, Style::default().fg(colors.card_meta)));

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_photo_modal(frame: &mut Frame, photo: &Photo, area: Rect, colors: &ColorConfig) {
    let rect = centered_rect(70, 60, area);
    let label = Style::default().fg(colors.metadata_label);

    let field = |name: &str, value: String| {
        Line::from(vec![Span::styled(format!("{}: ", name), label), Span::raw(value)])
    };

    let lines = vec![
        field(
            "Camera",
            format!("{} ({})", photo.camera.full_name, photo.camera.name),
        ),
        field("Sol", photo.sol.to_string()),
        field("Earth Date", photo.long_date()),
        Line::from(vec![
            Span::styled("Rover Status: ", label),
            Span::styled(photo.rover.status.clone(), rover_status_style(photo, colors)),
        ]),
        field("Photo ID", photo.id.to_string()),
        Line::from(""),
        Line::from(vec![
            Span::styled("Image: ", label),
            Span::styled(
                photo.img_src.clone(),
                Style::default().fg(colors.metadata_link),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "o: Open image  ←/→: Previous/next  Esc: Close",
            Style::default().fg(colors.card_meta),
        )),
    ];

    let block = Block::default()
        .title(format!(" {} ", photo.rover.name))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.modal_border));

    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        rect,
    );
}

fn rover_status_style(photo: &Photo, colors: &ColorConfig) -> Style {
    if photo.rover.is_active() {
        Style::default().fg(colors.rover_active)
    } else {
        Style::default().fg(colors.rover_inactive)
    }
}

fn render_status_bar(frame: &mut Frame, app: &TuiApp, area: Rect, colors: &ColorConfig) {
    let status = if app.mode == Mode::EditSol {
        "Type a sol  Enter:Apply  Esc:Cancel".to_string()
    } else if let Some(ref msg) = app.status_message {
        msg.clone()
    } else {
        "hjkl:Move  Enter:View  Tab:Rover  e:Sol  n:More  r:Retry  o:Open  q:Quit".to_string()
    };

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(status).style(Style::default().fg(colors.status_fg).bg(colors.status_bg)),
        area,
    );
}

/// A rectangle of `percent_x` by `percent_y` centered in `area`.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = area.width * percent_x / 100;
    let height = area.height * percent_y / 100;
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
