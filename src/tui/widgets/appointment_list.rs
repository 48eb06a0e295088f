use ratatui::widgets::{Block, Borders, List, ListItem, StatefulWidget, Scrollbar, ScrollbarState, ScrollbarOrientation};
use ratatui::style::{Style, Modifier};
use ratatui::Frame;
use ratatui::layout::{Rect, Layout, Direction, Constraint};
use ratatui::widgets::ListState;
use ratatui::text::Line;
use crate::Config;
use crate::renderer::Row;
use crate::tui::widgets::color::{parse_color, get_contrast_text_color};

/// Lines per rendered block: heading plus five details
const LINES_PER_ROW: usize = 6;

fn truncate(text: String, max_width: usize) -> String {
    if text.chars().count() > max_width {
        text.chars().take(max_width.saturating_sub(3)).collect::<String>() + "..."
    } else {
        text
    }
}

/// Display lines for one appointment block
pub fn row_lines(row: &Row, max_width: usize) -> Vec<String> {
    let mut lines = vec![truncate(row.heading().to_string(), max_width)];
    lines.extend(
        row.details()
            .into_iter()
            .map(|(label, value)| truncate(format!("  {}: {}", label, value), max_width)),
    );
    lines
}

pub fn render_appointment_list(
    f: &mut Frame,
    area: Rect,
    rows: &[Row],
    list_state: &mut ListState,
    focused: bool,
    config: &Config,
) {
    // Account for borders, padding and the scrollbar column
    let max_width = area.width.saturating_sub(4) as usize;

    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = if active_theme.highlight_fg.is_empty() {
        get_contrast_text_color(highlight_bg)
    } else {
        parse_color(&active_theme.highlight_fg)
    };

    let items: Vec<ListItem> = rows
        .iter()
        .map(|row| {
            let mut lines = row_lines(row, max_width).into_iter();
            let mut text = Vec::with_capacity(LINES_PER_ROW);
            if let Some(heading) = lines.next() {
                text.push(Line::styled(heading, Style::default().add_modifier(Modifier::BOLD)));
            }
            text.extend(lines.map(Line::from));
            ListItem::new(text)
        })
        .collect();
    let total_items = items.len();

    let list_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1), // Scrollbar
        ])
        .split(area);
    let list_area = list_areas[0];
    let scrollbar_area = list_areas[1];

    let border_style = if focused {
        Style::default().fg(highlight_bg)
    } else {
        Style::default().fg(fg_color)
    };
    let title = format!("Appointments ({})", rows.len());
    let block = Block::default().borders(Borders::ALL).title(title).border_style(border_style);

    if rows.is_empty() {
        let empty = ratatui::widgets::Paragraph::new("No appointments yet")
            .style(Style::default().fg(fg_color).add_modifier(Modifier::DIM))
            .block(block);
        f.render_widget(empty, list_area);
        return;
    }

    let list = List::new(items)
        .block(block)
        .style(Style::default().fg(fg_color))
        .highlight_style(Style::default().fg(highlight_fg).bg(highlight_bg));

    StatefulWidget::render(list, list_area, f.buffer_mut(), list_state);

    let list_inner_height = list_area.height.saturating_sub(2) as usize;
    let visible_items = list_inner_height / LINES_PER_ROW;

    if total_items > visible_items && scrollbar_area.width > 0 && list_area.height > 2 {
        let scrollbar_inner_area = Rect::new(
            scrollbar_area.x,
            list_area.y + 1, // Start after top border
            scrollbar_area.width,
            list_area.height.saturating_sub(2),
        );

        let selected_index = list_state.selected().unwrap_or(0);
        let scroll_position = if selected_index < visible_items {
            0
        } else {
            selected_index.saturating_sub(visible_items.saturating_sub(1))
        };

        let mut scrollbar_state = ScrollbarState::new(total_items)
            .viewport_content_length(visible_items)
            .position(scroll_position);

        let scrollbar = Scrollbar::default()
            .orientation(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"))
            .track_symbol(Some("│"))
            .thumb_symbol("█");

        f.render_stateful_widget(scrollbar, scrollbar_inner_area, &mut scrollbar_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Appointment;

    fn row(symptoms: &str) -> Row {
        Row {
            appointment: Appointment {
                id: Some(1),
                pet: "Rex".to_string(),
                owner: "Ana".to_string(),
                phone: String::new(),
                date: "2024-01-01".to_string(),
                time: "10:00".to_string(),
                symptoms: symptoms.to_string(),
            },
        }
    }

    #[test]
    fn block_has_heading_then_labeled_details() {
        let lines = row_lines(&row("cough"), 40);
        assert_eq!(lines.len(), LINES_PER_ROW);
        assert_eq!(lines[0], "Rex");
        assert_eq!(lines[1], "  Owner: Ana");
        assert_eq!(lines[2], "  Phone: ");
        assert_eq!(lines[5], "  Symptoms: cough");
    }

    #[test]
    fn long_lines_are_truncated() {
        let lines = row_lines(&row("vomiting since yesterday evening"), 20);
        assert_eq!(lines[5], "  Symptoms: vomit...");
        assert_eq!(lines[5].chars().count(), 20);
    }
}
