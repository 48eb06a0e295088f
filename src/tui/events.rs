use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, size as terminal_size};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use std::io;
use std::time::Duration;
use crate::config::KeyBindings;
use crate::tui::App;
use crate::tui::app::{Focus, Mode};
use crate::tui::error::TuiError;
use crate::tui::layout::Layout;
use crate::utils::{has_primary_modifier, parse_key_binding, ParsedKeyBinding};

/// Event poll interval; one loop iteration per tick
const TICK: Duration = Duration::from_millis(16);

/// Guard that ensures terminal state is restored even on panic
struct TerminalGuard {
    raw_mode_enabled: bool,
    alternate_screen_enabled: bool,
}

impl TerminalGuard {
    fn new() -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut guard = Self {
            raw_mode_enabled: true,
            alternate_screen_enabled: false,
        };
        execute!(io::stdout(), EnterAlternateScreen)?;
        guard.alternate_screen_enabled = true;
        Ok(guard)
    }

    /// Restore terminal state on normal exit; drop becomes a no-op
    fn restore(&mut self) -> Result<(), TuiError> {
        if self.raw_mode_enabled {
            disable_raw_mode()?;
            self.raw_mode_enabled = false;
        }
        if self.alternate_screen_enabled {
            execute!(io::stdout(), LeaveAlternateScreen)?;
            self.alternate_screen_enabled = false;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Already cleaning up; errors have nowhere to go
        if self.raw_mode_enabled {
            let _ = disable_raw_mode();
        }
        if self.alternate_screen_enabled {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
        }
    }
}

/// Configured key bindings, parsed once at startup
#[derive(Debug, Clone)]
pub struct Keymap {
    pub quit: ParsedKeyBinding,
    pub new: ParsedKeyBinding,
    pub edit: ParsedKeyBinding,
    pub delete: ParsedKeyBinding,
    pub submit: ParsedKeyBinding,
    pub list_up: ParsedKeyBinding,
    pub list_down: ParsedKeyBinding,
    pub help: ParsedKeyBinding,
}

impl Keymap {
    pub fn from_config(bindings: &KeyBindings) -> Result<Self, TuiError> {
        let parse = |s: &str| parse_key_binding(s).map_err(TuiError::KeyBindingError);
        Ok(Self {
            quit: parse(&bindings.quit)?,
            new: parse(&bindings.new)?,
            edit: parse(&bindings.edit)?,
            delete: parse(&bindings.delete)?,
            submit: parse(&bindings.submit)?,
            list_up: parse(&bindings.list_up)?,
            list_down: parse(&bindings.list_down)?,
            help: parse(&bindings.help)?,
        })
    }
}

pub fn run_event_loop(mut app: App) -> Result<(), TuiError> {
    let keymap = Keymap::from_config(&app.config.key_bindings)?;

    // Check size before entering the alternate screen so the error is readable
    let (width, height) = terminal_size()?;
    let min_width_with_border = Layout::MIN_WIDTH + 2;
    let min_height_with_border = Layout::MIN_HEIGHT + 2;
    if width < min_width_with_border || height < min_height_with_border {
        return Err(TuiError::RenderError(format!(
            "Terminal size too small. Current: {}x{}, Minimum required: {}x{}. Please resize your terminal window.",
            width, height, min_width_with_border, min_height_with_border
        )));
    }

    let mut guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    tracing::info!(appointments = app.renderer.len(), "tui started");

    loop {
        app.check_banner_timeout();
        app.pump_store();

        let size = terminal.size()?;
        let terminal_rect = Rect::new(0, 0, size.width, size.height);
        terminal.draw(|f| {
            let layout = Layout::calculate(terminal_rect);
            crate::tui::render::render(f, &mut app, &layout);
        })?;

        // Only Press events; Windows also reports Release
        if event::poll(TICK)? {
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Press && handle_key_event(&mut app, &keymap, key_event) {
                    break;
                }
            }
        }
    }

    // Queued writes still land before exit
    app.pump_store();
    guard.restore()?;
    tracing::info!("tui stopped");
    Ok(())
}

/// Apply one key press. Returns true when the user asked to quit.
pub fn handle_key_event(app: &mut App, keymap: &Keymap, key_event: KeyEvent) -> bool {
    if app.ui.mode == Mode::Help {
        if key_event.code == KeyCode::Esc || keymap.help.matches(&key_event) {
            app.exit_help_mode();
        }
        return false;
    }

    if keymap.help.matches(&key_event) {
        app.enter_help_mode();
        return false;
    }

    match app.ui.focus {
        Focus::Form => {
            handle_form_key(app, keymap, key_event);
            false
        }
        Focus::List => handle_list_key(app, keymap, key_event),
    }
}

fn handle_form_key(app: &mut App, keymap: &Keymap, key_event: KeyEvent) {
    if keymap.submit.matches(&key_event) {
        app.submit_form();
        return;
    }

    match key_event.code {
        KeyCode::Esc => app.cancel_form(),
        KeyCode::Tab | KeyCode::Enter | KeyCode::Down => app.next_field(),
        KeyCode::BackTab | KeyCode::Up => app.prev_field(),
        KeyCode::Left => app.cursor_left(),
        KeyCode::Right => app.cursor_right(),
        KeyCode::Home => app.cursor_home(),
        KeyCode::End => app.cursor_end(),
        KeyCode::Backspace => app.input_backspace(),
        KeyCode::Delete => app.input_delete(),
        KeyCode::Char(c) if !has_primary_modifier(key_event.modifiers) => app.input_char(c),
        _ => {}
    }
}

fn handle_list_key(app: &mut App, keymap: &Keymap, key_event: KeyEvent) -> bool {
    if keymap.quit.matches(&key_event)
        || (key_event.code == KeyCode::Char('c') && key_event.modifiers.contains(KeyModifiers::CONTROL))
    {
        return true;
    }

    if keymap.new.matches(&key_event) {
        app.new_appointment();
    } else if keymap.edit.matches(&key_event) || key_event.code == KeyCode::Enter {
        app.edit_selected();
    } else if keymap.delete.matches(&key_event) || key_event.code == KeyCode::Delete {
        app.delete_selected();
    } else if keymap.list_up.matches(&key_event) || key_event.code == KeyCode::Up {
        app.move_selection_up();
    } else if keymap.list_down.matches(&key_event) || key_event.code == KeyCode::Down {
        app.move_selection_down();
    } else if matches!(key_event.code, KeyCode::Tab | KeyCode::BackTab | KeyCode::Esc) {
        app.focus_form();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;
    use crate::database::{Database, SCHEMA_VERSION};
    use crate::models::Field;
    use crate::store::RecordStore;

    fn setup() -> (App, Keymap) {
        let config = Config::default();
        let keymap = Keymap::from_config(&config.key_bindings).unwrap();
        let store = RecordStore::new(Database::open_in_memory(SCHEMA_VERSION).unwrap());
        (App::new(config, store).unwrap(), keymap)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press(app: &mut App, keymap: &Keymap, code: KeyCode) -> bool {
        handle_key_event(app, keymap, key(code))
    }

    fn type_line(app: &mut App, keymap: &Keymap, text: &str) {
        for c in text.chars() {
            press(app, keymap, KeyCode::Char(c));
        }
        press(app, keymap, KeyCode::Tab);
    }

    fn save(app: &mut App, keymap: &Keymap) {
        handle_key_event(app, keymap, KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
        app.pump_store();
    }

    #[test]
    fn keyboard_only_create_edit_delete() {
        let (mut app, keymap) = setup();
        for value in ["Rex", "Ana", "555", "2024-01-01", "10:00", "cough"] {
            type_line(&mut app, &keymap, value);
        }
        save(&mut app, &keymap);
        assert_eq!(app.renderer.len(), 1);

        // Letters typed into the form never trigger list bindings
        assert_eq!(app.ui.focus, Focus::Form);
        assert!(!press(&mut app, &keymap, KeyCode::Char('q')));
        assert_eq!(app.inputs.get(Field::Pet).value(), "q");

        press(&mut app, &keymap, KeyCode::Esc);
        assert_eq!(app.ui.focus, Focus::List);
        press(&mut app, &keymap, KeyCode::Char('e'));
        assert_eq!(app.ui.focus, Focus::Form);
        press(&mut app, &keymap, KeyCode::BackTab);
        assert_eq!(app.controller.focus(), Field::Symptoms);
        press(&mut app, &keymap, KeyCode::End);
        for c in ", fever".chars() {
            press(&mut app, &keymap, KeyCode::Char(c));
        }
        save(&mut app, &keymap);
        assert_eq!(app.renderer.row(0).unwrap().appointment.symptoms, "cough, fever");
        assert_eq!(app.renderer.len(), 1);

        press(&mut app, &keymap, KeyCode::Esc);
        press(&mut app, &keymap, KeyCode::Char('d'));
        app.pump_store();
        assert!(app.renderer.is_empty());
        assert!(press(&mut app, &keymap, KeyCode::Char('q')));
    }

    #[test]
    fn help_toggles_and_swallows_keys() {
        let (mut app, keymap) = setup();
        press(&mut app, &keymap, KeyCode::F(1));
        assert_eq!(app.ui.mode, Mode::Help);
        press(&mut app, &keymap, KeyCode::Char('x'));
        assert_eq!(app.inputs.get(Field::Pet).value(), "");
        press(&mut app, &keymap, KeyCode::Esc);
        assert_eq!(app.ui.mode, Mode::Normal);
    }

    #[test]
    fn bad_binding_is_reported() {
        let mut bindings = KeyBindings::default();
        bindings.quit = "Hyper+q".to_string();
        assert!(matches!(Keymap::from_config(&bindings), Err(TuiError::KeyBindingError(_))));
    }
}
