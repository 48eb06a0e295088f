use ratatui::widgets::{Block, Borders, Paragraph, Clear};
use ratatui::style::Style;
use ratatui::Frame;
use ratatui::layout::{Rect, Alignment, Constraint, Layout, Flex};
use crate::Config;
use crate::tui::widgets::color::parse_color;
use crate::utils::format_key_binding_for_display as display;

pub fn render_help(f: &mut Frame, area: Rect, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);

    let popup_area = popup_area(area, 60, 70);

    // Clear the background so the list doesn't show through
    f.render_widget(Clear, popup_area);

    let paragraph = Paragraph::new(build_help_text(config))
        .block(Block::default()
            .borders(Borders::ALL)
            .title("Help - Key Bindings")
            .title_alignment(Alignment::Center)
            .style(Style::default().fg(fg_color).bg(bg_color)))
        .style(Style::default().fg(fg_color).bg(bg_color))
        .wrap(ratatui::widgets::Wrap { trim: false });

    f.render_widget(paragraph, popup_area);
}

/// Centered rect using a percentage of the available area
fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}

pub fn build_help_text(config: &Config) -> String {
    let keys = &config.key_bindings;
    let mut text = String::new();

    text.push_str("Appointment list:\n");
    text.push_str(&format!("  {} / {} or Up / Down: Move selection\n", display(&keys.list_up), display(&keys.list_down)));
    text.push_str(&format!("  {} or Enter: Edit selected appointment\n", display(&keys.edit)));
    text.push_str(&format!("  {}: Delete selected appointment\n", display(&keys.delete)));
    text.push_str(&format!("  {}: New appointment\n", display(&keys.new)));
    text.push_str("  Tab: Go to form\n");
    text.push('\n');

    text.push_str("Form:\n");
    text.push_str("  Tab / Enter / Down: Next field\n");
    text.push_str("  Shift+Tab / Up: Previous field\n");
    text.push_str(&format!("  {}: Create or save changes\n", display(&keys.submit)));
    text.push_str("  Esc: Cancel and go to list\n");
    text.push_str("  Fields marked * are required\n");
    text.push('\n');

    text.push_str("General:\n");
    text.push_str(&format!("  {}: Quit (from the list)\n", display(&keys.quit)));
    text.push_str(&format!("  {}: Show/hide help\n", display(&keys.help)));

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_reflects_configured_keys() {
        let mut config = Config::default();
        config.key_bindings.delete = "x".to_string();
        let text = build_help_text(&config);
        assert!(text.contains("  x: Delete selected appointment"));
        assert!(text.contains("F1: Show/hide help"));
    }
}
