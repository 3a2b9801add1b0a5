//! Main entry point for the console.
//!
//! Ties the TUI components together: terminal setup and restoration,
//! channel creation for worker communication, the event loop with input
//! handling and rendering, and graceful shutdown.
//!
//! Startup order matters: the worker loads the category list before the
//! device list, so the first table render already has categories for the
//! picker. Either fetch may fail; the console then simply shows what it
//! has.

pub mod app;
pub mod input;
pub mod messages;
pub mod table;
pub mod ui;
pub mod worker;

pub use app::App;
pub use messages::{Command, GateEvent};
pub use worker::GateWorker;

use std::io::{self, stdout};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    ExecutableCommand,
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use tokio::sync::mpsc;

use sbergate_api::GateClient;

/// Set up the terminal for TUI rendering.
///
/// Enables raw mode, mouse capture, and switches to the alternate screen.
pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout());
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to its original state.
pub fn restore_terminal() -> Result<()> {
    stdout().execute(DisableMouseCapture)?;
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Run the console against the gateway at `base_url`.
pub async fn run(base_url: String) -> Result<()> {
    let client = GateClient::new(&base_url).context("invalid gateway URL")?;

    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>(32);
    let (event_tx, event_rx) = mpsc::channel::<GateEvent>(32);

    let worker = GateWorker::new(cmd_rx, event_tx, client);
    let worker_handle = tokio::spawn(worker.run());

    let mut app = App::new(base_url, cmd_tx.clone(), event_rx);

    let mut terminal = setup_terminal()?;

    // Kick off the load sequence: version, categories, then devices.
    let _ = cmd_tx.try_send(Command::LoadAll);

    let result = run_event_loop(&mut terminal, &mut app, &cmd_tx).await;

    let _ = cmd_tx.try_send(Command::Shutdown);
    restore_terminal()?;
    let _ = worker_handle.await;

    result
}

/// Main event loop.
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    command_tx: &mpsc::Sender<Command>,
) -> Result<()> {
    while !app.should_quit() {
        app.clean_expired_messages();

        terminal.draw(|frame| ui::draw(frame, app))?;

        // Poll for keyboard and mouse events with a timeout so worker
        // events keep flowing even when the operator is idle.
        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Press {
                        let action = input::handle_key(
                            key.code,
                            app.picker.is_some(),
                            app.pending_command.is_some(),
                        );
                        if let Some(cmd) = input::apply_action(app, action) {
                            let _ = command_tx.try_send(cmd);
                        }
                    }
                }
                Event::Mouse(mouse_event) => {
                    let action = input::handle_mouse(mouse_event);
                    if let Some(cmd) = input::apply_action(app, action) {
                        let _ = command_tx.try_send(cmd);
                    }
                }
                _ => {}
            }
        }

        // Non-blocking receive of worker events.
        while let Ok(event) = app.event_rx.try_recv() {
            app.handle_event(event);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyCode;

    #[test]
    fn input_handling_quit() {
        let action = input::handle_key(KeyCode::Char('q'), false, false);
        assert_eq!(action, input::Action::Quit);
    }

    #[test]
    fn input_handling_toggle() {
        let action = input::handle_key(KeyCode::Char(' '), false, false);
        assert_eq!(action, input::Action::ToggleEnabled);
    }

    #[test]
    fn terminal_functions_exist() {
        // Actual terminal tests require a real terminal.
        let _ = restore_terminal;
        let _ = setup_terminal;
    }
}
