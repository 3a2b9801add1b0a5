//! Pure row-view computation for the device table.
//!
//! Column definitions, sorting, and picker-option building are plain
//! functions over the device collection so they can be tested without a
//! terminal. Rendering in [`super::ui`] only materializes what is computed
//! here.

use sbergate_api::{Device, DeviceMap};

/// Blank cells between adjacent columns.
pub const COLUMN_SPACING: u16 = 1;

/// Table columns in fixed display order.
///
/// The order is part of the contract: number keys and mouse hit-testing
/// both index into [`Column::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Enabled,
    Home,
    Room,
    Id,
    Name,
    EntityType,
    Category,
    States,
}

impl Column {
    /// All columns in display order.
    pub const ALL: [Column; 8] = [
        Column::Enabled,
        Column::Home,
        Column::Room,
        Column::Id,
        Column::Name,
        Column::EntityType,
        Column::Category,
        Column::States,
    ];

    /// Column header label, as the gateway's web page shows them.
    pub fn label(self) -> &'static str {
        match self {
            Self::Enabled => "Включено",
            Self::Home => "Дом",
            Self::Room => "Комната",
            Self::Id => "ID",
            Self::Name => "Имя",
            Self::EntityType => "Тип в HomeAssistant",
            Self::Category => "Тип в Салюте",
            Self::States => "Состояния",
        }
    }

    /// Fixed cell width. The last column takes the rest of the line.
    pub fn width(self) -> u16 {
        match self {
            Self::Enabled => 11,
            Self::Home => 10,
            Self::Room => 12,
            Self::Id => 26,
            Self::Name => 20,
            Self::EntityType => 21,
            Self::Category => 16,
            Self::States => 0,
        }
    }

    /// Value a column sorts by. Missing values sort as the empty string;
    /// `States` sorts by its serialized JSON text.
    pub fn sort_text(self, device: &Device) -> String {
        match self {
            Self::Enabled => if device.enabled { "true" } else { "false" }.to_string(),
            Self::Id => device.id.clone(),
            Self::Home => device.home.clone().unwrap_or_default(),
            Self::Room => device.room.clone().unwrap_or_default(),
            Self::Name => device.name.clone().unwrap_or_default(),
            Self::EntityType => device.entity_type.clone().unwrap_or_default(),
            Self::Category => device.category.clone().unwrap_or_default(),
            Self::States => device
                .states
                .as_ref()
                .map(|v| v.to_string())
                .unwrap_or_default(),
        }
    }

    /// Text shown in a cell. Same as the sort text except `enabled`, which
    /// is drawn as a checkbox glyph.
    pub fn cell_text(self, device: &Device) -> String {
        match self {
            Self::Enabled => if device.enabled { "[x]" } else { "[ ]" }.to_string(),
            other => other.sort_text(device),
        }
    }
}

/// Header label with the direction glyph on the active sort column.
pub fn header_label(column: Column, sort_key: Option<Column>, ascending: bool) -> String {
    if sort_key == Some(column) {
        format!("{} {}", column.label(), if ascending { "▲" } else { "▼" })
    } else {
        column.label().to_string()
    }
}

/// Devices ordered for display.
///
/// Stable three-way comparison on the sort column's text; no sort key keeps
/// the collection's id order. Ties keep their relative order, which is
/// harmless since ids are unique.
pub fn sorted_rows(
    devices: &DeviceMap,
    sort_key: Option<Column>,
    ascending: bool,
) -> Vec<&Device> {
    let mut rows: Vec<&Device> = devices.values().collect();
    if let Some(key) = sort_key {
        rows.sort_by(|a, b| {
            let ord = key.sort_text(a).cmp(&key.sort_text(b));
            if ascending { ord } else { ord.reverse() }
        });
    }
    rows
}

/// Picker options for a device's category.
///
/// Every known category, with an unknown current value inserted first (the
/// gateway may have renamed categories since the device was mapped).
/// Returns the options and the index of the pre-selected current value.
pub fn category_options(current: Option<&str>, known: &[String]) -> (Vec<String>, usize) {
    let mut options: Vec<String> = known.to_vec();
    let selected = match current {
        Some(category) if !category.is_empty() => {
            match options.iter().position(|c| c == category) {
                Some(position) => position,
                None => {
                    options.insert(0, category.to_string());
                    0
                }
            }
        }
        _ => 0,
    };
    (options, selected)
}

/// Map an x offset inside the table to the column under it.
///
/// The last column is open-ended, so any offset past the fixed columns
/// belongs to it.
pub fn column_at(x: u16) -> Option<Column> {
    let mut start = 0u16;
    for column in Column::ALL {
        if matches!(column, Column::States) {
            return (x >= start).then_some(Column::States);
        }
        let end = start + column.width();
        if x < end {
            return Some(column);
        }
        start = end + COLUMN_SPACING;
    }
    None
}
