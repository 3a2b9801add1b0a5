//! Application state for the console.
//!
//! The device collection and category list live here for the duration of
//! the session: created empty at startup, populated by the initial load
//! sequence, then mutated in place by operator edits or replaced wholesale
//! by a refetch. Edits are optimistic: local state changes first, the
//! matching update is fired afterwards and never rolled back.

use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use sbergate_api::{Device, DeviceMap, DevicePatch};

use super::messages::{Command, GateEvent};
use super::table::{self, Column};

/// How long transient status messages stay visible.
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(4);

/// Administrative gateway commands exposed by the console.
///
/// The identifier string itself is the wire payload; adding a variant here
/// is all it takes to expose a new gateway command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateCommand {
    /// Wipe the gateway's local device database.
    WipeDatabase,
    /// Terminate the gateway process.
    ExitGateway,
}

impl GateCommand {
    /// Wire identifier for the command.
    pub fn id(self) -> &'static str {
        match self {
            Self::WipeDatabase => "DB_delete",
            Self::ExitGateway => "exit",
        }
    }

    /// Confirmation prompt shown before dispatch.
    pub fn prompt(self) -> &'static str {
        match self {
            Self::WipeDatabase => "Wipe the gateway device database?",
            Self::ExitGateway => "Terminate the gateway process?",
        }
    }
}

/// State of the category picker overlay.
#[derive(Debug, Clone)]
pub struct CategoryPicker {
    /// Device being edited.
    pub device_id: String,
    /// Selectable categories; an unknown current value is first.
    pub options: Vec<String>,
    /// Highlighted option index.
    pub selected: usize,
}

/// Top-level state for the console UI.
pub struct App {
    /// Gateway base URL, shown in the chrome links.
    pub base_url: String,
    /// Sender for commands to the background worker.
    pub command_tx: mpsc::Sender<Command>,
    /// Receiver for events from the background worker.
    pub event_rx: mpsc::Receiver<GateEvent>,
    /// Gateway version; `None` renders as "unknown".
    pub version: Option<String>,
    /// Known assistant-side categories, sorted, read-only for the session.
    pub categories: Vec<String>,
    /// The device collection, keyed by entity id.
    pub devices: DeviceMap,
    /// Active sort column, if any.
    pub sort_key: Option<Column>,
    /// Sort direction for the active column.
    pub sort_ascending: bool,
    /// Selected row index into the sorted row-view.
    pub selected: usize,
    /// Category picker overlay, when open.
    pub picker: Option<CategoryPicker>,
    /// Command awaiting y/n confirmation, when any.
    pub pending_command: Option<GateCommand>,
    /// Whether the help overlay is shown.
    pub show_help: bool,
    /// Whether the first device fetch has landed.
    pub loaded: bool,
    status_message: Option<(String, Instant)>,
    should_quit: bool,
}

impl App {
    /// Create the application state.
    pub fn new(
        base_url: String,
        command_tx: mpsc::Sender<Command>,
        event_rx: mpsc::Receiver<GateEvent>,
    ) -> Self {
        Self {
            base_url,
            command_tx,
            event_rx,
            version: None,
            categories: Vec::new(),
            devices: DeviceMap::new(),
            sort_key: None,
            sort_ascending: true,
            selected: 0,
            picker: None,
            pending_command: None,
            show_help: false,
            loaded: false,
            status_message: None,
            should_quit: false,
        }
    }

    /// Banner text; "unknown" until the version query resolves.
    pub fn version_banner(&self) -> String {
        format!(
            "SberGate version: {}",
            self.version.as_deref().unwrap_or("unknown")
        )
    }

    /// Devices in display order under the current sort state.
    pub fn rows(&self) -> Vec<&Device> {
        table::sorted_rows(&self.devices, self.sort_key, self.sort_ascending)
    }

    /// The device under the selection cursor.
    pub fn selected_device(&self) -> Option<&Device> {
        self.rows().get(self.selected).copied()
    }

    pub fn select_next(&mut self) {
        let len = self.devices.len();
        if len > 0 && self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Re-sort by `column`: the active column again flips direction, a new
    /// column starts ascending.
    pub fn sort_by(&mut self, column: Column) {
        if self.sort_key == Some(column) {
            self.sort_ascending = !self.sort_ascending;
        } else {
            self.sort_key = Some(column);
            self.sort_ascending = true;
        }
    }

    /// Toggle cloud exposure for the selected device.
    ///
    /// Mutates local state first, then issues exactly one update. The local
    /// value stays even if the update later fails.
    pub fn toggle_selected_enabled(&mut self) {
        let Some(id) = self.selected_device().map(|d| d.id.clone()) else {
            return;
        };
        let Some(device) = self.devices.get_mut(&id) else {
            return;
        };
        device.enabled = !device.enabled;
        let patch = DevicePatch::enabled(device.enabled);
        let _ = self.command_tx.try_send(Command::UpdateDevice {
            device_id: id,
            patch,
        });
    }

    /// Open the category picker for the selected device.
    pub fn open_category_picker(&mut self) {
        let Some(device) = self.selected_device() else {
            return;
        };
        let (options, selected) =
            table::category_options(device.category.as_deref(), &self.categories);
        if options.is_empty() {
            self.set_status("No categories loaded");
            return;
        }
        self.picker = Some(CategoryPicker {
            device_id: device.id.clone(),
            options,
            selected,
        });
    }

    pub fn picker_next(&mut self) {
        if let Some(picker) = &mut self.picker {
            if picker.selected + 1 < picker.options.len() {
                picker.selected += 1;
            }
        }
    }

    pub fn picker_previous(&mut self) {
        if let Some(picker) = &mut self.picker {
            picker.selected = picker.selected.saturating_sub(1);
        }
    }

    /// Apply the picker choice: local mutation first, then one update.
    pub fn apply_picker_choice(&mut self) {
        let Some(picker) = self.picker.take() else {
            return;
        };
        let Some(choice) = picker.options.get(picker.selected).cloned() else {
            return;
        };
        if let Some(device) = self.devices.get_mut(&picker.device_id) {
            device.category = Some(choice.clone());
        }
        let _ = self.command_tx.try_send(Command::UpdateDevice {
            device_id: picker.device_id,
            patch: DevicePatch::category(choice),
        });
    }

    pub fn close_picker(&mut self) {
        self.picker = None;
    }

    /// Ask for confirmation before dispatching a gateway command.
    pub fn request_command(&mut self, command: GateCommand) {
        self.pending_command = Some(command);
    }

    /// Dispatch the pending command and show a status notice.
    pub fn confirm_pending_command(&mut self) {
        if let Some(command) = self.pending_command.take() {
            self.set_status(format!("Sent command: {}", command.id()));
            let _ = self.command_tx.try_send(Command::RunCommand {
                command: command.id().to_string(),
            });
        }
    }

    pub fn cancel_pending_command(&mut self) {
        self.pending_command = None;
    }

    /// Fold a worker event into local state.
    pub fn handle_event(&mut self, event: GateEvent) {
        match event {
            GateEvent::Version(version) => self.version = Some(version),
            GateEvent::Categories(categories) => self.categories = categories,
            GateEvent::Devices(devices) => {
                self.devices = devices;
                self.loaded = true;
                let len = self.devices.len();
                if len == 0 {
                    self.selected = 0;
                } else if self.selected >= len {
                    self.selected = len - 1;
                }
            }
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now()));
    }

    /// The transient status message, if one is still fresh.
    pub fn current_status_message(&self) -> Option<&str> {
        self.status_message
            .as_ref()
            .filter(|(_, at)| at.elapsed() < STATUS_MESSAGE_TTL)
            .map(|(msg, _)| msg.as_str())
    }

    pub fn clean_expired_messages(&mut self) {
        if let Some((_, at)) = &self.status_message {
            if at.elapsed() >= STATUS_MESSAGE_TTL {
                self.status_message = None;
            }
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}
