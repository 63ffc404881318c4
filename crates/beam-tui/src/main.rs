//! Beam TUI - terminal front-end for the Beam launcher.
//!
//! Connects to the launcher backend over its Unix socket and drives the
//! search-as-you-type surface: debounced queries, keyboard and pointer
//! navigation, execution feedback, and the notification history.

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyCode, KeyEvent,
        KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::StreamExt;
use ratatui::{Frame, Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use std::io;

mod app;
mod cli;
mod colors;
mod menu;
mod notify;
mod render;
mod search;
mod toast;

use app::{App, BackendReply, ExecutePlan};
use beam_rpc::{LauncherClient, Notification, SearchResult, socket_path};
use cli::{Cli, Commands};
use render::{HitMap, render_menu_popup, render_search_ui};
use search::IssuedSearch;

/// Shortcut recorded with the backend when onboarding completes.
const DEFAULT_SHORTCUT: &str = "Alt+Space";

fn ui(f: &mut Frame, app: &mut App) {
    render_search_ui(f, app);
    render_menu_popup(f, app);
}

fn spawn_search(client: &LauncherClient, tx: &mpsc::Sender<BackendReply>, issued: IssuedSearch) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let results = client.search(&issued.query).await;
        let _ = tx
            .send(BackendReply::Search {
                generation: issued.generation,
                results,
            })
            .await;
    });
}

fn spawn_execute(client: &LauncherClient, tx: &mpsc::Sender<BackendReply>, result: SearchResult) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let outcome = client.execute(&result.id).await;
        let _ = tx.send(BackendReply::Executed { result, outcome }).await;
    });
}

fn spawn_context_actions(
    client: &LauncherClient,
    tx: &mpsc::Sender<BackendReply>,
    target_id: String,
    anchor: (u16, u16),
) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let actions = client.context_actions(&target_id).await;
        let _ = tx
            .send(BackendReply::ContextActions {
                target_id,
                anchor,
                actions,
            })
            .await;
    });
}

fn spawn_context_action(
    client: &LauncherClient,
    tx: &mpsc::Sender<BackendReply>,
    target_id: String,
    action_id: String,
) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let outcome = client.execute_context_action(&target_id, &action_id).await;
        let _ = tx
            .send(BackendReply::ContextActionDone {
                target_id,
                action_id,
                outcome,
            })
            .await;
    });
}

/// Act on the current selection: calculator rows are copied locally, all
/// other results round-trip through the backend.
fn dispatch_execute(app: &mut App, client: &LauncherClient, tx: &mpsc::Sender<BackendReply>) {
    match app.execute_plan() {
        Some(ExecutePlan::CopyLocal { text }) => app.copy_result_value(&text),
        Some(ExecutePlan::Backend { result }) => spawn_execute(client, tx, result),
        None => {}
    }
}

fn handle_key(
    app: &mut App,
    client: &LauncherClient,
    tx: &mpsc::Sender<BackendReply>,
    key: KeyEvent,
) {
    // An open menu captures the keyboard; only Esc gets through.
    if app.menu.is_open() {
        if key.code == KeyCode::Esc {
            app.menu.close();
        }
        return;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Esc => {
            if app.notifications.panel_open() {
                app.notifications.close_panel();
            } else if app.input.is_empty() {
                // Second Esc dismisses the launcher. The hide request must
                // not hold up the quit on an unresponsive backend.
                let client = client.clone();
                tokio::spawn(async move {
                    if let Err(e) = client.hide_window().await {
                        tracing::warn!("hide window failed: {e}");
                    }
                });
                app.should_quit = true;
            } else {
                app.clear_input();
                spawn_search(client, tx, app.search.issue_default());
            }
        }
        KeyCode::Enter => dispatch_execute(app, client, tx),
        KeyCode::Down => app.select_next(),
        KeyCode::Up => app.select_previous(),
        KeyCode::Left => app.move_cursor_left(),
        KeyCode::Right => app.move_cursor_right(),
        KeyCode::Backspace => {
            app.delete_char();
            app.search.on_query_changed(&app.input);
        }
        KeyCode::Char('c') if ctrl => app.should_quit = true,
        KeyCode::Char(c) => {
            app.enter_char(c);
            app.search.on_query_changed(&app.input);
        }
        _ => {}
    }
}

fn handle_mouse(
    app: &mut App,
    client: &LauncherClient,
    tx: &mpsc::Sender<BackendReply>,
    mouse: MouseEvent,
) {
    let (column, row) = (mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::Moved => {
            app.toast.set_hovered(HitMap::hit(app.hit.toast, column, row));

            if HitMap::hit(app.hit.indicator, column, row) {
                app.notifications.open_on_hover();
            } else if app.notifications.panel_open()
                && !HitMap::hit(app.hit.panel, column, row)
                && !HitMap::hit(app.hit.footer, column, row)
            {
                app.notifications.close_panel();
            }

            // Hover moves the selection unless the menu is capturing input.
            if !app.menu.is_open()
                && let Some(index) = app.hit.result_at(column, row)
                && index != app.selected
            {
                app.select(index);
            }
        }
        MouseEventKind::Down(MouseButton::Left) => {
            if app.menu.is_open() {
                // The menu closes at click time; the action completes in the
                // background and reports through a toast.
                let picked = app.menu.action_at(column, row).map(|a| a.id.clone());
                let target = app.menu.state().map(|m| m.target_id.clone());
                app.menu.close();
                if let (Some(target_id), Some(action_id)) = (target, picked) {
                    spawn_context_action(client, tx, target_id, action_id);
                }
                return;
            }
            if HitMap::hit(app.hit.indicator, column, row) {
                app.notifications.toggle_panel();
                return;
            }
            if HitMap::hit(app.hit.panel_clear, column, row) {
                app.notifications.clear();
                return;
            }
            if HitMap::hit(app.hit.panel, column, row) {
                return;
            }
            if app.notifications.panel_open() {
                app.notifications.close_panel();
            }
            if let Some(index) = app.hit.result_at(column, row) {
                app.select(index);
                dispatch_execute(app, client, tx);
            }
        }
        MouseEventKind::Down(MouseButton::Right) => {
            if app.menu.is_open() {
                app.menu.close();
                return;
            }
            if let Some(index) = app.hit.result_at(column, row) {
                app.select(index);
                if let Some(result) = app.selected_result() {
                    spawn_context_actions(client, tx, result.id.clone(), (column, row));
                }
            }
        }
        _ => {}
    }
}

/// Sleep until `deadline`, or forever when there is none. Keeps optional
/// timers usable as `select!` arms.
async fn sleep_until_opt(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// Set up logging with file output. TUI must log to file since it uses the terminal for display.
fn setup_logging(debug_flag: bool) {
    let level = if debug_flag || cfg!(debug_assertions) {
        "debug"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let log_filename = format!("beam-tui-{timestamp}.log");
    let log_path = std::path::Path::new("/tmp").join(&log_filename);

    let symlink_path = std::path::Path::new("/tmp/beam-tui.log");
    let _ = std::fs::remove_file(symlink_path);
    let _ = std::os::unix::fs::symlink(&log_path, symlink_path);

    let file_appender = tracing_appender::rolling::never("/tmp", &log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    std::mem::forget(guard);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.debug);

    let socket = cli.socket.unwrap_or_else(socket_path);
    let (client, pushes) = match LauncherClient::connect_to(socket).await {
        Ok(pair) => pair,
        Err(e) => {
            eprintln!("Failed to connect to the beam backend: {e}");
            eprintln!();
            eprintln!("Make sure the backend is running:");
            eprintln!("  beam-daemon &");
            return Ok(());
        }
    };

    match cli.command {
        Some(Commands::Query { query }) => run_query(&client, &query).await?,
        Some(Commands::Tui) | None => run_tui(client, pushes).await?,
    }

    Ok(())
}

/// One-shot search against the backend, printed to stdout.
async fn run_query(client: &LauncherClient, query: &str) -> Result<()> {
    let results = client.search(query).await?;
    println!("Results for '{query}': {}", results.len());
    for (i, result) in results.iter().enumerate() {
        println!(
            "  {}. {} - {} [{}]",
            i + 1,
            result.title,
            result.subtitle,
            result.category
        );
    }
    Ok(())
}

// Event loop with setup/teardown - interaction logic lives in the handlers
#[allow(clippy::too_many_lines)]
async fn run_tui(client: LauncherClient, mut pushes: mpsc::Receiver<Notification>) -> Result<()> {
    match client.is_first_run().await {
        Ok(true) => {
            if let Err(e) = client.complete_onboarding(DEFAULT_SHORTCUT).await {
                tracing::warn!("failed to complete onboarding: {e}");
            }
        }
        Ok(false) => {}
        Err(e) => tracing::warn!("first-run check failed: {e}"),
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new();
    let (reply_tx, mut reply_rx) = mpsc::channel::<BackendReply>(64);

    // Populate the default result set before the first keystroke.
    spawn_search(&client, &reply_tx, app.search.issue_default());

    let mut event_stream = EventStream::new();
    let mut needs_render = true;

    loop {
        if needs_render {
            terminal.draw(|f| ui(f, &mut app))?;
            needs_render = false;
        }

        let search_deadline = app.search.deadline();
        let toast_deadline = app.toast.deadline();

        tokio::select! {
            Some(reply) = reply_rx.recv() => {
                app.handle_reply(reply);
                needs_render = true;
            }

            Some(notif) = pushes.recv() => {
                if let Some(status) = notif.as_index_status() {
                    app.handle_index_status(&status);
                    needs_render = true;
                }
            }

            () = sleep_until_opt(search_deadline) => {
                if let Some(issued) = app.search.take_due() {
                    spawn_search(&client, &reply_tx, issued);
                }
            }

            () = sleep_until_opt(toast_deadline) => {
                app.toast.dismiss_due();
                needs_render = true;
            }

            Some(event_result) = event_stream.next() => {
                let event = match event_result {
                    Ok(e) => e,
                    Err(e) => {
                        tracing::error!("Event stream error: {e}");
                        continue;
                    }
                };

                match event {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        needs_render = true;
                        handle_key(&mut app, &client, &reply_tx, key);
                    }
                    Event::Mouse(mouse) => {
                        needs_render = true;
                        handle_mouse(&mut app, &client, &reply_tx, mouse);
                    }
                    Event::Resize(_, _) => needs_render = true,
                    _ => {}
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}
