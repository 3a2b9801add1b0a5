//! Layout and rendering for the console.
//!
//! The screen is fixed chrome above a device table:
//!
//! - **Banner**: gateway version ("unknown" until the query resolves)
//! - **Links**: gateway settings page and log download URLs
//! - **Commands**: maintenance command hints
//! - **Table**: the sortable device table
//! - **Status bar**: transient notices or key hints
//!
//! Every block silently skips rendering when its area has no height, so a
//! cramped terminal degrades instead of failing. Overlays (picker,
//! confirmation, help) draw on top.

mod overlays;

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use super::app::App;
use super::table::{self, Column, COLUMN_SPACING};

/// Absolute screen row of the table header; mouse input translates header
/// clicks with this.
pub const TABLE_HEADER_ROW: u16 = 4;

/// Draw the complete interface.
pub fn draw(frame: &mut Frame, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Version banner
            Constraint::Length(1), // Links
            Constraint::Length(1), // Commands
            Constraint::Length(1), // Devices heading
            Constraint::Min(1),    // Device table
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_banner(frame, layout[0], app);
    draw_links(frame, layout[1], app);
    draw_commands(frame, layout[2]);
    draw_heading(frame, layout[3], app);
    draw_table(frame, layout[4], app);
    draw_status_bar(frame, layout[5], app);

    if let Some(picker) = &app.picker {
        overlays::draw_category_picker(frame, picker);
    }
    if let Some(command) = app.pending_command {
        overlays::draw_confirmation(frame, command);
    }
    if app.show_help {
        overlays::draw_help(frame);
    }
}

fn draw_banner(frame: &mut Frame, area: Rect, app: &App) {
    if area.height == 0 {
        return;
    }
    let banner = Paragraph::new(Line::from(Span::styled(
        app.version_banner(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(banner, area);
}

fn draw_links(frame: &mut Frame, area: Rect, app: &App) {
    if area.height == 0 {
        return;
    }
    let links = Paragraph::new(Line::from(vec![
        Span::styled("Settings: ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!("{}/index.html", app.base_url)),
        Span::styled("   Log: ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!("{}/SberGate.log", app.base_url)),
    ]));
    frame.render_widget(links, area);
}

fn draw_commands(frame: &mut Frame, area: Rect) {
    if area.height == 0 {
        return;
    }
    let commands = Paragraph::new(Line::from(vec![
        Span::styled("Commands: ", Style::default().fg(Color::DarkGray)),
        Span::styled("x", Style::default().fg(Color::Yellow)),
        Span::raw(" wipe device DB   "),
        Span::styled("X", Style::default().fg(Color::Yellow)),
        Span::raw(" terminate gateway"),
    ]));
    frame.render_widget(commands, area);
}

fn draw_heading(frame: &mut Frame, area: Rect, app: &App) {
    if area.height == 0 {
        return;
    }
    let text = if app.loaded {
        format!("Devices ({})", app.devices.len())
    } else {
        "Devices (loading...)".to_string()
    };
    let heading = Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(heading, area);
}

/// Pad or truncate `text` to exactly `width` display cells.
fn pad(text: &str, width: u16) -> String {
    let width = width as usize;
    let mut out: String = text.chars().take(width).collect();
    let len = out.chars().count();
    out.extend(std::iter::repeat(' ').take(width - len));
    out
}

/// One rendered table line: fixed-width cells, the last column open-ended.
fn table_line(cells: impl Fn(Column) -> String) -> String {
    let mut line = String::new();
    for column in Column::ALL {
        if matches!(column, Column::States) {
            line.push_str(&cells(column));
        } else {
            line.push_str(&pad(&cells(column), column.width()));
            line.push_str(&" ".repeat(COLUMN_SPACING as usize));
        }
    }
    line
}

fn draw_table(frame: &mut Frame, area: Rect, app: &App) {
    if area.height == 0 {
        return;
    }

    let header = table_line(|column| {
        table::header_label(column, app.sort_key, app.sort_ascending)
    });
    let mut lines = vec![Line::from(Span::styled(
        header,
        Style::default().add_modifier(Modifier::BOLD),
    ))];

    let rows = app.rows();
    let visible = area.height.saturating_sub(1) as usize;
    let offset = if visible == 0 {
        0
    } else if app.selected >= visible {
        app.selected + 1 - visible
    } else {
        0
    };

    for (i, device) in rows.into_iter().enumerate().skip(offset).take(visible) {
        let text = table_line(|column| column.cell_text(device));
        let style = if i == app.selected {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(text, style)));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    if area.height == 0 {
        return;
    }

    let line = if let Some(message) = app.current_status_message() {
        Line::from(Span::styled(
            format!(" {message}"),
            Style::default().fg(Color::Yellow),
        ))
    } else {
        let hints = [
            ("q", "quit"),
            ("r", "refresh"),
            ("j/k", "select"),
            ("Space", "toggle"),
            ("Enter", "category"),
            ("1-8", "sort"),
            ("?", "help"),
        ];
        let mut spans = vec![Span::raw(" ")];
        for (i, (key, desc)) in hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" | ", Style::default().fg(Color::DarkGray)));
            }
            spans.push(Span::styled(
                *key,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(
                format!(" {desc}"),
                Style::default().fg(Color::DarkGray),
            ));
        }
        Line::from(spans)
    };

    frame.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::CategoryPicker;
    use crate::tui::messages::GateEvent;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use sbergate_api::{Device, DeviceMap};
    use serde_json::json;
    use tokio::sync::mpsc;

    fn test_app() -> App {
        let (command_tx, command_rx) = mpsc::channel(8);
        let (_event_tx, event_rx) = mpsc::channel(8);
        drop(command_rx);
        App::new("http://localhost:9123".to_string(), command_tx, event_rx)
    }

    fn render(app: &App, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).expect("create test terminal");
        terminal.draw(|frame| draw(frame, app)).expect("draw ui");

        let buffer = terminal.backend().buffer().clone();
        let mut lines = Vec::new();
        for y in 0..height {
            let mut line = String::new();
            for x in 0..width {
                line.push_str(buffer[(x, y)].symbol());
            }
            lines.push(line.trim_end().to_string());
        }
        lines.join("\n")
    }

    fn load_devices(app: &mut App, devices: Vec<Device>) {
        let map: DeviceMap = devices.into_iter().map(|d| (d.id.clone(), d)).collect();
        app.handle_event(GateEvent::Devices(map));
    }

    #[test]
    fn banner_shows_unknown_until_version_arrives() {
        let mut app = test_app();
        assert!(render(&app, 120, 12).contains("SberGate version: unknown"));

        app.handle_event(GateEvent::Version("1.2.3".to_string()));
        assert!(render(&app, 120, 12).contains("SberGate version: 1.2.3"));
    }

    #[test]
    fn chrome_shows_links_and_commands() {
        let app = test_app();
        let screen = render(&app, 160, 12);
        assert!(screen.contains("http://localhost:9123/index.html"));
        assert!(screen.contains("http://localhost:9123/SberGate.log"));
        assert!(screen.contains("wipe device DB"));
    }

    #[test]
    fn table_renders_header_and_one_row_per_device() {
        let mut app = test_app();
        load_devices(
            &mut app,
            vec![
                Device {
                    id: "light.kitchen".to_string(),
                    enabled: true,
                    home: Some("H1".to_string()),
                    room: Some("Kitchen".to_string()),
                    name: Some("Kitchen Light".to_string()),
                    entity_type: Some("light".to_string()),
                    category: Some("свет".to_string()),
                    states: Some(json!({"brightness": 80})),
                },
                Device {
                    id: "sensor.hall".to_string(),
                    ..Device::default()
                },
            ],
        );

        let screen = render(&app, 160, 14);
        assert!(screen.contains("Включено"));
        assert!(screen.contains("Тип в Салюте"));
        assert_eq!(screen.matches("[x]").count(), 1);
        assert_eq!(screen.matches("[ ]").count(), 1);
        assert!(screen.contains("H1"));
        assert!(screen.contains("Kitchen Light"));
        assert!(screen.contains(r#"{"brightness":80}"#));
        assert!(screen.contains("Devices (2)"));
    }

    #[test]
    fn active_sort_column_carries_direction_glyph() {
        let mut app = test_app();
        load_devices(
            &mut app,
            vec![Device {
                id: "a".to_string(),
                ..Device::default()
            }],
        );

        app.sort_by(Column::Name);
        assert!(render(&app, 160, 12).contains("Имя ▲"));

        app.sort_by(Column::Name);
        let screen = render(&app, 160, 12);
        assert!(screen.contains("Имя ▼"));
        assert!(!screen.contains("▲"));
    }

    #[test]
    fn header_row_constant_matches_layout() {
        let mut app = test_app();
        load_devices(
            &mut app,
            vec![Device {
                id: "a".to_string(),
                ..Device::default()
            }],
        );
        let screen = render(&app, 160, 12);
        let lines: Vec<&str> = screen.split('\n').collect();
        assert!(lines[TABLE_HEADER_ROW as usize].contains("Включено"));
    }

    #[test]
    fn picker_overlay_lists_options() {
        let mut app = test_app();
        app.picker = Some(CategoryPicker {
            device_id: "x".to_string(),
            options: vec!["реле".to_string(), "свет".to_string()],
            selected: 0,
        });
        let screen = render(&app, 120, 16);
        assert!(screen.contains("реле"));
        assert!(screen.contains("свет"));
    }

    #[test]
    fn tiny_terminal_does_not_panic() {
        let mut app = test_app();
        load_devices(
            &mut app,
            vec![Device {
                id: "a".to_string(),
                ..Device::default()
            }],
        );
        let _ = render(&app, 10, 2);
        let _ = render(&app, 1, 1);
    }
}
