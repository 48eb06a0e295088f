use ratatui::Frame;
use ratatui::widgets::{Block, Borders};
use ratatui::style::Style;
use crate::tui::{App, Layout};
use crate::tui::app::{Focus, Mode};
use crate::tui::widgets::{
    appointment_list::render_appointment_list,
    banner::render_banner,
    form::render_form,
    help::render_help,
    status_bar::render_status_bar,
    color::parse_color,
};
use crate::utils::format_key_binding_for_display as display;

pub fn render(f: &mut Frame, app: &mut App, layout: &Layout) {
    let active_theme = app.config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let outer_block = Block::default()
        .borders(Borders::ALL)
        .title("Vet Appointments")
        .title_alignment(ratatui::layout::Alignment::Center)
        .style(Style::default().fg(fg_color).bg(bg_color));
    f.render_widget(outer_block, f.area());

    let in_normal_mode = app.ui.mode == Mode::Normal;
    render_appointment_list(
        f,
        layout.list_area,
        app.renderer.rows(),
        &mut app.ui.list_state,
        in_normal_mode && app.ui.focus == Focus::List,
        &app.config,
    );
    render_form(
        f,
        layout.form_area,
        &app.controller,
        &app.inputs,
        in_normal_mode && app.ui.focus == Focus::Form,
        &app.config,
    );

    render_banner(f, layout.banner_area, app.banner.as_ref().map(|b| &b.notice), &app.config);

    let key_hints = get_key_hints(app);
    render_status_bar(f, layout.status_area, &key_hints, &app.config);

    // Help overlays everything else
    if app.ui.mode == Mode::Help {
        render_help(f, f.area(), &app.config);
    }
}

pub fn get_key_hints(app: &App) -> Vec<String> {
    let keys = &app.config.key_bindings;
    match (app.ui.mode, app.ui.focus) {
        (Mode::Help, _) => vec![format!("Esc or {}: Exit help", display(&keys.help))],
        (Mode::Normal, Focus::Form) => vec![
            format!("{}: {}", display(&keys.submit), app.controller.submit_label()),
            "Tab/Enter: Next field".to_string(),
            "Shift+Tab: Previous field".to_string(),
            "Esc: Cancel".to_string(),
            format!("{}: Help", display(&keys.help)),
        ],
        (Mode::Normal, Focus::List) => vec![
            format!("{}: Quit", display(&keys.quit)),
            format!("{}: New", display(&keys.new)),
            format!("{}: Edit", display(&keys.edit)),
            format!("{}: Delete", display(&keys.delete)),
            format!("{}/{}: Move", display(&keys.list_up), display(&keys.list_down)),
            "Tab: Form".to_string(),
            format!("{}: Help", display(&keys.help)),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;
    use crate::database::{Database, SCHEMA_VERSION};
    use crate::store::RecordStore;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::layout::Rect;

    fn app() -> App {
        let store = RecordStore::new(Database::open_in_memory(SCHEMA_VERSION).unwrap());
        App::new(Config::default(), store).unwrap()
    }

    fn screen(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal
            .draw(|f| {
                let layout = Layout::calculate(Rect::new(0, 0, 100, 40));
                render(f, app, &layout);
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn draws_form_list_and_banner() {
        let mut app = app();
        let text = screen(&mut app);
        assert!(text.contains("New appointment"));
        assert!(text.contains("[ Create ]"));
        assert!(text.contains("No appointments yet"));

        "Rex".chars().for_each(|c| app.input_char(c));
        app.submit_form();
        let text = screen(&mut app);
        assert!(text.contains("All fields are required"));

        for value in ["Ana", "555", "2024-01-01", "10:00", "cough"] {
            app.next_field();
            value.chars().for_each(|c| app.input_char(c));
        }
        app.submit_form();
        app.pump_store();
        let text = screen(&mut app);
        assert!(text.contains("Appointments (1)"));
        assert!(text.contains("Symptoms: cough"));
        assert!(text.contains("Appointment added"));
    }

    #[test]
    fn hints_follow_focus_and_mode() {
        let mut app = app();
        assert!(get_key_hints(&app)[0].ends_with(": Create"));
        app.focus_list();
        assert_eq!(get_key_hints(&app)[0], "q: Quit");
        app.enter_help_mode();
        assert_eq!(get_key_hints(&app), vec!["Esc or F1: Exit help".to_string()]);
    }
}
