//! Torrentium TUI - Actor-based file sharing dashboard
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering of store snapshots
//! - Store Actor (Tokio) - reducer, notification expiry, progress simulation

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};

use torrentium::app::{AppState, Store, StoreActor, StoreHandle};
use torrentium::config::Config;
use torrentium::constants::{APP_NAME, APP_VERSION, LOG_FILE_NAME};
use torrentium::messages::ui_events::{key_to_ui_event, InputMode, Page};
use torrentium::mock;
use torrentium::models::Transfer;
use torrentium::query::{position_of, DashboardStats, PeerPartitions, SortOrder};
use torrentium::ui::{self, centered_rect, format_bytes, format_speed, progress_bar, Palette};
use torrentium::view::ViewState;

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging to file
    let file_appender = tracing_appender::rolling::never(".", LOG_FILE_NAME);
    let (non_blocking, _log_guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    let config = Config::from_env();
    tracing::info!(version = APP_VERSION, ?config, "Starting {}", APP_NAME);

    // Spawn store actor
    let store = Store::restore(AppState::new(), config.cache());
    let (handle, actor_task) = StoreActor::spawn(store, config.actor_settings());

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_ui_loop(&mut terminal, &handle).await;

    handle.shutdown();
    if let Err(e) = actor_task.await {
        tracing::error!(error = %e, "Store actor panicked");
    }
    result
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(terminal: &mut Terminal<impl Backend>, handle: &StoreHandle) -> anyhow::Result<()> {
    let mut view = ViewState::default();

    loop {
        // Draw the latest snapshot
        let state = handle.snapshot();
        terminal.draw(|f| draw_ui(f, &state, &view))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(key, view.page, view.input_mode, view.show_help) {
                    if !view.handle(event, handle) {
                        break;
                    }
                }
            }
        }
    }

    tracing::info!("Shutting down");
    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &AppState, view: &ViewState) {
    let palette = Palette::for_theme(state.theme);
    let area = f.area();
    f.render_widget(Block::default().style(palette.base()), area);

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tab bar
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let titles: Vec<&str> = Page::ALL.iter().map(|p| p.title()).collect();
    f.render_widget(ui::render_tabs(&titles, view.page.index(), &palette), main_chunks[0]);

    match view.page {
        Page::Home => draw_home(f, state, &palette, main_chunks[1]),
        Page::Download => draw_download(f, state, view, &palette, main_chunks[1]),
        Page::Upload => draw_upload(f, state, view, &palette, main_chunks[1]),
        Page::Network => draw_network(f, state, view, &palette, main_chunks[1]),
        Page::History => draw_history(f, state, view, &palette, main_chunks[1]),
        Page::Leaderboard => draw_leaderboard(f, state, view, &palette, main_chunks[1]),
        Page::Profile => draw_profile(f, state, view, &palette, main_chunks[1]),
    }

    draw_status_bar(f, view, &palette, main_chunks[2]);
    draw_toasts(f, state, &palette, area);

    if view.show_help {
        draw_help_popup(f, &palette, area);
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('~');
    out
}

fn transfer_item<'a>(t: &Transfer, palette: &Palette, show_health: bool) -> ListItem<'a> {
    let mut spans = vec![
        Span::raw(format!("{:<34} ", truncate(&t.name, 34))),
        Span::styled(format!("{:<12}", t.status.as_str()), Style::default().fg(palette.status(t.status))),
        Span::raw(format!(
            "{} {:>5.1}%  {:>10}  {:>12}",
            progress_bar(t.progress, 20),
            t.progress,
            format_bytes(t.size),
            format_speed(t.speed)
        )),
    ];
    if show_health {
        let health = t.health();
        spans.push(Span::styled(
            format!("  {:<9}", health.as_str()),
            Style::default().fg(palette.health(health)),
        ));
        spans.push(Span::styled(
            format!("{} seeds, {} peers", t.seeds, t.peers),
            Style::default().fg(palette.muted),
        ));
    }
    ListItem::new(Line::from(spans))
}

#[allow(clippy::too_many_arguments)]
fn draw_transfer_list(
    f: &mut Frame,
    rows: &[&Transfer],
    selected: Option<usize>,
    show_health: bool,
    title: &str,
    empty: &str,
    palette: &Palette,
    area: Rect,
) {
    let block = palette.block(title.to_string(), selected.is_some());
    if rows.is_empty() {
        let text = Paragraph::new(Span::styled(empty.to_string(), Style::default().fg(palette.muted)))
            .block(block);
        f.render_widget(text, area);
        return;
    }

    let items: Vec<ListItem> = rows.iter().map(|t| transfer_item(t, palette, show_health)).collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().fg(palette.accent).bold())
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    list_state.select(selected);
    f.render_stateful_widget(list, area, &mut list_state);
}

fn draw_home(f: &mut Frame, state: &AppState, palette: &Palette, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(3)])
        .split(area);

    let stats = DashboardStats::of(state);
    let label = |text: &'static str| Span::styled(text, Style::default().fg(palette.muted));
    let lines = vec![
        Line::from(vec![
            Span::raw("Welcome back, "),
            Span::styled(state.user.username.clone(), Style::default().fg(palette.accent).bold()),
        ]),
        Line::from(""),
        Line::from(vec![label("Active uploads     "), Span::raw(stats.active_uploads.to_string())]),
        Line::from(vec![label("Active downloads   "), Span::raw(stats.active_downloads.to_string())]),
        Line::from(vec![label("Peers online       "), Span::raw(stats.online_peers.to_string())]),
        Line::from(vec![
            label("Trust score        "),
            Span::styled(stats.trust_score.to_string(), Style::default().fg(palette.trust(stats.trust_score))),
        ]),
        Line::from(vec![
            label("Shared / fetched   "),
            Span::raw(format!("{} / {}", stats.total_shared, stats.total_downloaded)),
        ]),
    ];
    f.render_widget(Paragraph::new(lines).block(palette.block(" Dashboard ", false)), chunks[0]);

    let recent: Vec<&Transfer> = state.transfers.iter().take(5).collect();
    draw_transfer_list(f, &recent, None, false, " Recent Activity ", "No transfers yet", palette, chunks[1]);
}

fn draw_download(f: &mut Frame, state: &AppState, view: &ViewState, palette: &Palette, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    let editing = view.input_mode == InputMode::Editing;
    let content = if editing || !view.input.is_empty() {
        view.input.as_str()
    } else {
        "Press 'a' and enter a .torrent file name"
    };
    f.render_widget(ui::render_input(content, " Add Torrent ", editing, palette), chunks[0]);

    let rows = view.transfer_rows(state);
    draw_transfer_list(
        f,
        &rows,
        Some(view.selected),
        true,
        " Active Downloads (space: pause/resume) ",
        "No active downloads",
        palette,
        chunks[1],
    );
}

fn draw_upload(f: &mut Frame, state: &AppState, view: &ViewState, palette: &Palette, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    let editing = view.input_mode == InputMode::Editing;
    let content = if editing || !view.input.is_empty() {
        view.input.as_str()
    } else {
        "Press 'a' and enter the path of a file to share"
    };
    f.render_widget(ui::render_input(content, " Add File ", editing, palette), chunks[0]);

    let rows = view.transfer_rows(state);
    draw_transfer_list(
        f,
        &rows,
        Some(view.selected),
        false,
        " Upload Queue (u: upload all  d: remove  c: clear finished) ",
        "Queue is empty",
        palette,
        chunks[1],
    );
}

fn draw_network(f: &mut Frame, state: &AppState, view: &ViewState, palette: &Palette, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    let code = match &view.invite_code {
        Some(code) => Span::styled(code.clone(), Style::default().fg(palette.accent).bold()),
        None => Span::styled("Press 'g' to generate an invite code", Style::default().fg(palette.muted)),
    };
    f.render_widget(Paragraph::new(code).block(palette.block(" Your Invite Code ", false)), chunks[0]);

    let editing = view.input_mode == InputMode::Editing;
    f.render_widget(ui::render_input(&view.input, " Redeem Code (a) ", editing, palette), chunks[1]);

    let parts = PeerPartitions::of(&state.peers);
    let title = format!(
        " Peers - {} online, {} offline, {} blocked (b: block/unblock) ",
        parts.online.len(),
        parts.offline.len(),
        parts.blocked.len()
    );
    let items: Vec<ListItem> = view
        .peer_rows(state)
        .iter()
        .map(|p| {
            let (marker, color) = if p.is_blocked {
                ("x", palette.error)
            } else if p.is_online {
                ("*", palette.success)
            } else {
                ("-", palette.muted)
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", marker), Style::default().fg(color)),
                Span::raw(format!("{:<20} ", truncate(&p.username, 20))),
                Span::styled(format!("trust {:>3}", p.trust_score), Style::default().fg(palette.trust(p.trust_score))),
                Span::styled(
                    format!("  last seen {}", p.last_seen.format("%Y-%m-%d %H:%M")),
                    Style::default().fg(palette.muted),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(palette.block(title, !editing))
        .highlight_style(Style::default().fg(palette.accent).bold())
        .highlight_symbol("> ");
    let mut list_state = ListState::default();
    list_state.select(Some(view.selected));
    f.render_stateful_widget(list, chunks[2], &mut list_state);
}

fn draw_history(f: &mut Frame, state: &AppState, view: &ViewState, palette: &Palette, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    let editing = view.input_mode == InputMode::Editing;
    let filter = view.history.status.map_or("all", |s| s.as_str());
    let order = match view.history.order {
        SortOrder::Asc => "asc",
        SortOrder::Desc => "desc",
    };
    let title = format!(
        " Search (/) | status: {} (f) | sort: {} {} (s/o) ",
        filter,
        view.history.sort_by.as_str(),
        order
    );
    f.render_widget(ui::render_input(&view.history.search, &title, editing, palette), chunks[0]);

    let rows = view.transfer_rows(state);
    draw_transfer_list(
        f,
        &rows,
        Some(view.selected),
        false,
        " History (space: pause/resume  r: retry  d: delete) ",
        "No transfers match",
        palette,
        chunks[1],
    );
}

fn draw_leaderboard(f: &mut Frame, state: &AppState, view: &ViewState, palette: &Palette, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    let editing = view.input_mode == InputMode::Editing;
    let entries = mock::leaderboard();
    let rows = view.leaderboard.apply(&entries);
    let rank = position_of(&rows, &state.user.username)
        .map(|r| format!("#{}", r))
        .unwrap_or_else(|| String::from("unranked"));
    let title = format!(
        " Search (/) | {} (f) | your rank: {} ",
        view.leaderboard.category.label(),
        rank
    );
    f.render_widget(ui::render_input(&view.leaderboard.search, &title, editing, palette), chunks[0]);

    let items: Vec<ListItem> = rows
        .iter()
        .map(|e| {
            let style = if e.username == state.user.username {
                Style::default().fg(palette.accent).bold()
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:>3}. {:<20}", e.rank, truncate(&e.username, 20)), style),
                Span::raw(format!("{:>4} badges  ", e.badge_count)),
                Span::styled(format!("trust {:>3}", e.trust_score), Style::default().fg(palette.trust(e.trust_score))),
                Span::raw(format!("  {:>6} shared", e.total_shared)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(palette.block(" Leaderboard ", !editing))
        .highlight_style(Style::default().fg(palette.accent).bold())
        .highlight_symbol("> ");
    let mut list_state = ListState::default();
    list_state.select(Some(view.selected));
    f.render_stateful_widget(list, chunks[1], &mut list_state);
}

fn draw_profile(f: &mut Frame, state: &AppState, view: &ViewState, palette: &Palette, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(7), Constraint::Min(3)])
        .split(area);

    let editing = view.input_mode == InputMode::Editing;
    let name = if editing { view.input.as_str() } else { state.user.username.as_str() };
    f.render_widget(ui::render_input(name, " Username (e: edit) ", editing, palette), chunks[0]);

    let user = &state.user;
    let label = |text: &'static str| Span::styled(text, Style::default().fg(palette.muted));
    let details = vec![
        Line::from(vec![label("Peer ID          "), Span::raw(user.peer_id.clone())]),
        Line::from(vec![
            label("Trust score      "),
            Span::styled(user.trust_score.to_string(), Style::default().fg(palette.trust(user.trust_score))),
        ]),
        Line::from(vec![label("Files shared     "), Span::raw(user.total_shared.to_string())]),
        Line::from(vec![label("Files downloaded "), Span::raw(user.total_downloaded.to_string())]),
        Line::from(vec![label("Theme            "), Span::raw(state.theme.as_str())]),
    ];
    f.render_widget(Paragraph::new(details).block(palette.block(" Profile ", false)), chunks[1]);

    let badges: Vec<Line> = mock::BADGES
        .iter()
        .map(|badge| {
            if user.badges.contains(*badge) {
                Line::from(Span::styled(format!("[x] {}", badge), Style::default().fg(palette.success)))
            } else {
                Line::from(Span::styled(format!("[ ] {}", badge), Style::default().fg(palette.muted)))
            }
        })
        .collect();
    let title = format!(" Badges {}/{} ", user.badges.len(), mock::BADGES.len());
    f.render_widget(
        Paragraph::new(badges).block(palette.block(title, false)).wrap(Wrap { trim: false }),
        chunks[2],
    );
}

/// Newest notifications stacked in the top-right corner
fn draw_toasts(f: &mut Frame, state: &AppState, palette: &Palette, area: Rect) {
    const WIDTH: u16 = 44;
    const HEIGHT: u16 = 3;

    let width = WIDTH.min(area.width);
    let fits = (area.height.saturating_sub(2) / HEIGHT) as usize;
    let mut y = area.y + 1;
    for note in state.notifications.iter().rev().take(fits) {
        let rect = Rect::new(area.x + area.width - width, y, width, HEIGHT);
        let color = palette.severity(note.severity);
        let toast = Paragraph::new(truncate(&note.message, width.saturating_sub(2) as usize)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .style(palette.base()),
        );
        f.render_widget(Clear, rect);
        f.render_widget(toast, rect);
        y += HEIGHT;
    }
}

fn draw_status_bar(f: &mut Frame, view: &ViewState, palette: &Palette, area: Rect) {
    let status = if view.input_mode == InputMode::Editing {
        " Enter:submit | ESC:cancel "
    } else {
        match view.page {
            Page::Home => " 1-7:pages | t:theme | x:dismiss | ?:help | q:quit ",
            Page::Download => " a:add torrent | space:pause/resume | ?:help | q:quit ",
            Page::Upload => " a:add file | u:upload all | d:remove | c:clear finished | ?:help ",
            Page::Network => " g:generate | a:redeem | b:block | ?:help | q:quit ",
            Page::History => " /:search | f:filter | s:sort | o:order | r:retry | d:delete ",
            Page::Leaderboard => " /:search | f:category | ?:help | q:quit ",
            Page::Profile => " e:edit username | t:theme | ?:help | q:quit ",
        }
    };

    f.render_widget(Paragraph::new(status).style(Style::default().fg(palette.muted)), area);
}

fn draw_help_popup(f: &mut Frame, palette: &Palette, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = r#"
 TORRENTIUM - Keyboard Shortcuts

 NAVIGATION
   1-7                Jump to page
   Tab / Shift+Tab    Next / previous page
   ↑ / ↓  (k / j)     Move selection

 TRANSFERS
   a                  Add torrent / file (Download, Upload)
   u                  Upload all queued files
   d                  Remove queued file (Upload)
   c                  Clear finished uploads
   space              Pause or resume
   r                  Retry failed transfer (History)
   d                  Delete from history

 NETWORK
   g                  Generate invite code
   a                  Redeem invite code
   b                  Block / unblock peer

 GENERAL
   /                  Search (History, Leaderboard)
   f / s / o          Filter / sort / order
   e                  Edit username (Profile)
   t                  Toggle theme
   x                  Dismiss notification
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let help = Paragraph::new(help_text)
        .block(palette.block(" Help ", true))
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}
