//! Keyboard and mouse input handling.
//!
//! Keyboard events become high-level [`Action`]s which are then applied to
//! the application state.
//!
//! # Key Bindings
//!
//! | Key         | Action                      |
//! |-------------|-----------------------------|
//! | `q`         | Quit the console            |
//! | `r`         | Refetch devices             |
//! | `↓` / `j`   | Select next row             |
//! | `↑` / `k`   | Select previous row         |
//! | `Space`     | Toggle cloud exposure       |
//! | `Enter`     | Edit category               |
//! | `1`-`8`     | Sort by column (again: flip)|
//! | `x`         | Wipe gateway device DB      |
//! | `X`         | Terminate gateway           |
//! | `?`         | Toggle help                 |
//!
//! Clicking a column header sorts by that column, like the number keys.

use crossterm::event::{KeyCode, MouseButton, MouseEvent, MouseEventKind};

use super::app::{App, GateCommand};
use super::messages::Command;
use super::table::{self, Column};
use super::ui;

/// User actions that can be triggered by input events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Quit the console (the gateway keeps running).
    Quit,
    /// Refetch the device collection.
    Refresh,
    /// Select the next row.
    SelectNext,
    /// Select the previous row.
    SelectPrevious,
    /// Toggle `enabled` on the selected device.
    ToggleEnabled,
    /// Open the category picker for the selected device.
    EditCategory,
    /// Sort by a column; the active column again flips direction.
    SortBy(Column),
    /// Ask to wipe the gateway device database.
    WipeDatabase,
    /// Ask to terminate the gateway process.
    ExitGateway,
    /// Toggle the help overlay.
    ToggleHelp,
    /// Confirm the pending command.
    Confirm,
    /// Cancel the pending command or close an overlay.
    Cancel,
    /// Move down in the category picker.
    PickerNext,
    /// Move up in the category picker.
    PickerPrevious,
    /// Apply the picker choice.
    PickerSubmit,
    /// Close the picker without changes.
    PickerCancel,
    /// Mouse click at screen coordinates.
    MouseClick { x: u16, y: u16 },
    /// No action (unrecognized input).
    None,
}

/// Map a key code to an action.
///
/// Overlay states capture the keyboard: the picker takes navigation keys,
/// a pending confirmation takes only y/n.
pub fn handle_key(key: KeyCode, picker_open: bool, has_pending_confirmation: bool) -> Action {
    if picker_open {
        return match key {
            KeyCode::Down | KeyCode::Char('j') => Action::PickerNext,
            KeyCode::Up | KeyCode::Char('k') => Action::PickerPrevious,
            KeyCode::Enter => Action::PickerSubmit,
            KeyCode::Esc | KeyCode::Char('q') => Action::PickerCancel,
            _ => Action::None,
        };
    }

    if has_pending_confirmation {
        return match key {
            KeyCode::Char('y') | KeyCode::Char('Y') => Action::Confirm,
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Action::Cancel,
            _ => Action::None,
        };
    }

    match key {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('r') => Action::Refresh,
        KeyCode::Down | KeyCode::Char('j') => Action::SelectNext,
        KeyCode::Up | KeyCode::Char('k') => Action::SelectPrevious,
        KeyCode::Char(' ') => Action::ToggleEnabled,
        KeyCode::Enter => Action::EditCategory,
        KeyCode::Char(c @ '1'..='8') => {
            Action::SortBy(Column::ALL[(c as usize) - ('1' as usize)])
        }
        KeyCode::Char('x') => Action::WipeDatabase,
        KeyCode::Char('X') => Action::ExitGateway,
        KeyCode::Char('?') => Action::ToggleHelp,
        KeyCode::Esc => Action::Cancel,
        _ => Action::None,
    }
}

/// Map a mouse event to an action.
pub fn handle_mouse(event: MouseEvent) -> Action {
    if let MouseEventKind::Down(MouseButton::Left) = event.kind {
        Action::MouseClick {
            x: event.column,
            y: event.row,
        }
    } else {
        Action::None
    }
}

/// Apply an action to the app.
///
/// Returns a worker command to dispatch, for actions that need one. Edits
/// send their own update through the app's channel so the local mutation
/// and the network call stay ordered.
pub fn apply_action(app: &mut App, action: Action) -> Option<Command> {
    match action {
        Action::Quit => {
            app.quit();
            None
        }
        Action::Refresh => Some(Command::RefreshDevices),
        Action::SelectNext => {
            app.select_next();
            None
        }
        Action::SelectPrevious => {
            app.select_previous();
            None
        }
        Action::ToggleEnabled => {
            app.toggle_selected_enabled();
            None
        }
        Action::EditCategory => {
            app.open_category_picker();
            None
        }
        Action::SortBy(column) => {
            app.sort_by(column);
            None
        }
        Action::WipeDatabase => {
            app.request_command(GateCommand::WipeDatabase);
            None
        }
        Action::ExitGateway => {
            app.request_command(GateCommand::ExitGateway);
            None
        }
        Action::ToggleHelp => {
            app.show_help = !app.show_help;
            None
        }
        Action::Confirm => {
            app.confirm_pending_command();
            None
        }
        Action::Cancel => {
            app.cancel_pending_command();
            app.show_help = false;
            None
        }
        Action::PickerNext => {
            app.picker_next();
            None
        }
        Action::PickerPrevious => {
            app.picker_previous();
            None
        }
        Action::PickerSubmit => {
            app.apply_picker_choice();
            None
        }
        Action::PickerCancel => {
            app.close_picker();
            None
        }
        Action::MouseClick { x, y } => {
            // Only the header row is click-sensitive; rows are selected
            // with the keyboard.
            if y == ui::TABLE_HEADER_ROW {
                if let Some(column) = table::column_at(x) {
                    app.sort_by(column);
                }
            }
            None
        }
        Action::None => None,
    }
}
