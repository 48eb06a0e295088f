use ratatui::widgets::Paragraph;
use ratatui::style::{Style, Modifier};
use ratatui::Frame;
use ratatui::layout::Rect;
use crate::Config;
use crate::controller::{Notice, NoticeKind};
use crate::tui::widgets::color::{parse_color, get_contrast_text_color};

pub fn banner_style(kind: NoticeKind, config: &Config) -> Style {
    let active_theme = config.get_active_theme();
    let bg = match kind {
        NoticeKind::Success => parse_color(&active_theme.success_bg),
        NoticeKind::Error => parse_color(&active_theme.error_bg),
    };
    Style::default()
        .fg(get_contrast_text_color(bg))
        .bg(bg)
        .add_modifier(Modifier::BOLD)
}

/// One-line transient message. Renders nothing when there is no notice.
pub fn render_banner(f: &mut Frame, area: Rect, notice: Option<&Notice>, config: &Config) {
    let Some(notice) = notice else {
        return;
    };

    let max_width = area.width as usize;
    let mut content = format!(" {}", notice.message);
    if content.chars().count() > max_width {
        content = content.chars().take(max_width.saturating_sub(3)).collect::<String>() + "...";
    }

    let paragraph = Paragraph::new(content).style(banner_style(notice.kind, config));
    f.render_widget(paragraph, area);
}
