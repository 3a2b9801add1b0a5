//! Overlay windows: category picker, command confirmation, help.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::{CategoryPicker, GateCommand};

/// A centered rect of at most `width` x `height`, clamped to the frame.
fn centered_rect(width: u16, height: u16, frame_area: Rect) -> Rect {
    let width = width.min(frame_area.width);
    let height = height.min(frame_area.height);
    let x = frame_area.x + (frame_area.width - width) / 2;
    let y = frame_area.y + (frame_area.height - height) / 2;
    Rect::new(x, y, width, height)
}

/// Draw the category picker for the device being edited.
pub(super) fn draw_category_picker(frame: &mut Frame, picker: &CategoryPicker) {
    let longest = picker
        .options
        .iter()
        .map(|o| o.chars().count())
        .max()
        .unwrap_or(0) as u16;
    let width = (longest + 6).max(24);
    let height = picker.options.len() as u16 + 2;
    let area = centered_rect(width, height, frame.area());

    let inner_height = area.height.saturating_sub(2) as usize;
    // Keep the highlighted option visible when the list is taller than
    // the window.
    let offset = if inner_height == 0 {
        0
    } else if picker.selected >= inner_height {
        picker.selected + 1 - inner_height
    } else {
        0
    };

    let lines: Vec<Line> = picker
        .options
        .iter()
        .enumerate()
        .skip(offset)
        .take(inner_height)
        .map(|(i, option)| {
            if i == picker.selected {
                Line::from(Span::styled(
                    format!("> {option}"),
                    Style::default()
                        .add_modifier(Modifier::BOLD)
                        .add_modifier(Modifier::REVERSED),
                ))
            } else {
                Line::from(Span::raw(format!("  {option}")))
            }
        })
        .collect();

    let block = Block::default()
        .title(format!(" Тип в Салюте: {} ", picker.device_id))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Draw the y/n confirmation dialog for a gateway command.
pub(super) fn draw_confirmation(frame: &mut Frame, command: GateCommand) {
    let prompt = command.prompt();
    let width = (prompt.chars().count() as u16 + 6).max(30);
    let area = centered_rect(width, 5, frame.area());

    let lines = vec![
        Line::from(Span::raw(prompt)),
        Line::default(),
        Line::from(vec![
            Span::styled("y", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(" confirm   "),
            Span::styled("n", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::raw(" cancel"),
        ]),
    ];

    let block = Block::default()
        .title(" Confirm ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block),
        area,
    );
}

/// Draw the help overlay.
pub(super) fn draw_help(frame: &mut Frame) {
    let area = centered_rect(52, 16, frame.area());

    let bindings = [
        ("q", "quit the console"),
        ("r", "refetch devices"),
        ("j / k", "select row"),
        ("Space", "toggle cloud exposure"),
        ("Enter", "edit category"),
        ("1-8", "sort by column (again flips)"),
        ("click header", "sort by column"),
        ("x", "wipe gateway device database"),
        ("X", "terminate gateway process"),
        ("Esc", "dismiss overlay"),
        ("?", "toggle this help"),
    ];

    let mut lines = vec![Line::default()];
    for (key, desc) in bindings {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {key:<14}"),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(desc),
        ]));
    }

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
