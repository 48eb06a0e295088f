use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::style::{Style, Modifier};
use ratatui::Frame;
use ratatui::layout::{Rect, Constraint, Layout, Direction, Alignment};
use ratatui::text::{Line, Span};
use crate::Config;
use crate::controller::{FormController, FormMode};
use crate::models::Field;
use crate::tui::widgets::input::FormInputs;
use crate::tui::widgets::color::{parse_color, get_contrast_text_color};

/// Height of one bordered single-line input
const FIELD_HEIGHT: u16 = 3;

pub fn form_title(controller: &FormController) -> String {
    match controller.mode() {
        FormMode::Creating => "New appointment".to_string(),
        FormMode::Editing { id } => format!("Edit appointment #{}", id),
    }
}

/// Label shown in a field's border. Required fields carry a marker.
fn field_title(field: Field) -> String {
    if field.is_required() {
        format!("{} *", field.label())
    } else {
        field.label().to_string()
    }
}

pub fn render_form(
    f: &mut Frame,
    area: Rect,
    controller: &FormController,
    inputs: &FormInputs,
    focused: bool,
    config: &Config,
) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);

    let border_style = if focused {
        Style::default().fg(highlight_bg)
    } else {
        Style::default().fg(fg_color)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(form_title(controller))
        .border_style(border_style);
    let inner = block.inner(area);
    f.render_widget(block, area);

    // Shrink inputs to one borderless line each when the pane is short
    let compact = inner.height < FIELD_HEIGHT * (Field::ALL.len() as u16 + 1);
    let row_height = if compact { 1 } else { FIELD_HEIGHT };

    let mut constraints: Vec<Constraint> = Field::ALL.iter().map(|_| Constraint::Length(row_height)).collect();
    constraints.push(Constraint::Length(row_height)); // Submit
    constraints.push(Constraint::Min(0));
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (i, field) in Field::ALL.into_iter().enumerate() {
        let is_active = focused && controller.focus() == field;
        let style = if is_active {
            Style::default().fg(highlight_bg).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(fg_color).add_modifier(Modifier::DIM)
        };
        let input = inputs.get(field);

        if compact {
            let label = format!("{:>9}: ", field_title(field));
            let width = rows[i].width.saturating_sub(label.chars().count() as u16) as usize;
            let (text, cursor_col) = input.visible(width);
            let line = Line::from(vec![Span::styled(label.clone(), style), Span::styled(text, Style::default().fg(fg_color))]);
            f.render_widget(Paragraph::new(line), rows[i]);
            if is_active {
                let x = rows[i].x + label.chars().count() as u16 + cursor_col as u16;
                f.set_cursor_position((x.min(rows[i].right().saturating_sub(1)), rows[i].y));
            }
        } else {
            let field_block = Block::default()
                .borders(Borders::ALL)
                .title(field_title(field))
                .border_style(style);
            let field_inner = field_block.inner(rows[i]);
            let (text, cursor_col) = input.visible(field_inner.width as usize);
            f.render_widget(
                Paragraph::new(text).style(Style::default().fg(fg_color)).block(field_block),
                rows[i],
            );
            if is_active && field_inner.width > 0 {
                let x = field_inner.x + (cursor_col as u16).min(field_inner.width - 1);
                f.set_cursor_position((x, field_inner.y));
            }
        }
    }

    render_submit(f, rows[Field::ALL.len()], controller.submit_label(), focused, config);
}

fn render_submit(f: &mut Frame, area: Rect, label: &str, focused: bool, config: &Config) {
    let active_theme = config.get_active_theme();
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = if active_theme.highlight_fg.is_empty() {
        get_contrast_text_color(highlight_bg)
    } else {
        parse_color(&active_theme.highlight_fg)
    };
    let save_key = crate::utils::format_key_binding_for_display(&config.key_bindings.submit);

    let button = Span::styled(
        format!("[ {} ]", label),
        Style::default().fg(highlight_fg).bg(highlight_bg).add_modifier(Modifier::BOLD),
    );
    let mut spans = vec![button];
    if focused {
        spans.push(Span::raw(format!("  {}", save_key)));
    }
    let paragraph = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);

    // Vertically center the button when the row is tall
    let y = area.y + area.height.saturating_sub(1) / 2;
    f.render_widget(paragraph, Rect::new(area.x, y, area.width, area.height.min(1)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Appointment, IdGenerator};

    #[test]
    fn title_follows_mode() {
        let mut controller = FormController::new(IdGenerator::default());
        assert_eq!(form_title(&controller), "New appointment");
        controller.begin_edit(&Appointment {
            id: Some(12),
            pet: "Rex".to_string(),
            owner: "Ana".to_string(),
            phone: String::new(),
            date: "2024-01-01".to_string(),
            time: "10:00".to_string(),
            symptoms: "cough".to_string(),
        });
        assert_eq!(form_title(&controller), "Edit appointment #12");
    }

    #[test]
    fn phone_is_the_only_unmarked_field() {
        let unmarked: Vec<_> = Field::ALL.into_iter().filter(|f| !field_title(*f).ends_with('*')).collect();
        assert_eq!(unmarked, vec![Field::Phone]);
    }
}
