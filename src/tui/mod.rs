pub mod app;
pub mod event;
pub mod theme;
pub mod ui;

pub use app::App;
pub use theme::{resolve_theme, Theme, ThemeColors};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::{Event, EventHandler};

pub async fn run_tui(mut app: App) -> anyhow::Result<()> {
    // Buffer stderr while TUI is active to prevent output corrupting the display
    crate::stderr_buffer::activate();

    // Init terminal (sets up panic hooks automatically)
    let mut terminal = ratatui::init();

    let mut events = EventHandler::new(250);

    if !app.store.is_ready() {
        let reason = app
            .store
            .failure_reason()
            .unwrap_or("not initialized")
            .to_string();
        app.show_flash(format!("Failed to open result store: {}", reason));
    }
    app.reload_history().await;

    let result = run_loop(&mut terminal, &mut app, &mut events).await;

    // Restore terminal
    ratatui::restore();

    // Flush buffered stderr messages now that the terminal is restored
    for msg in crate::stderr_buffer::drain() {
        eprintln!("{}", msg);
    }

    result
}

async fn run_loop(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
    events: &mut EventHandler,
) -> anyhow::Result<()> {
    loop {
        terminal.draw(|frame| ui::draw(frame, app))?;

        match events.next().await {
            Event::Key(key) => handle_key_event(app, key).await,
            Event::Tick => app.update_flash(),
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

async fn handle_key_event(app: &mut App, key: KeyEvent) {
    match app.input_mode {
        app::InputMode::Normal => {
            match key.code {
                // Quit
                KeyCode::Char('q') => app.should_quit = true,
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    app.should_quit = true
                }

                // Navigation
                KeyCode::Char('j') | KeyCode::Down => app.next_row(),
                KeyCode::Char('k') | KeyCode::Up => app.previous_row(),

                // Selection
                KeyCode::Char(' ') => app.toggle_selected(),
                KeyCode::Char('d') => app.toggle_description(),
                KeyCode::Char('x') => {
                    if app.current_view == app::View::Calculator {
                        app.reset();
                    }
                }

                // Calculate and save
                KeyCode::Enter => {
                    if app.current_view == app::View::Calculator {
                        app.calculate_and_save().await;
                    }
                }

                // Reload history
                KeyCode::Char('r') => {
                    app.reload_history().await;
                    app.show_flash(format!("Loaded {} results", app.records.len()));
                }

                // Tab switching
                KeyCode::Tab => app.toggle_view().await,

                // Help
                KeyCode::Char('?') => app.show_help(),

                _ => {}
            }
        }
        app::InputMode::Help => {
            // Any key exits help
            app.dismiss_help();
        }
    }
}
