use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Wrap};

use kalkulacka::app::{App, AppScreen, LastAnswer, action_for_key};
use kalkulacka::config::Config;
use kalkulacka::event::{AppEvent, EventHandler};
use kalkulacka::oracle::GeminiOracle;
use kalkulacka::ui::components::display::CalcDisplay;
use kalkulacka::ui::components::fault_notice::FaultNotice;
use kalkulacka::ui::components::header::{Footer, Header, footer_hints};
use kalkulacka::ui::components::history_panel::HistoryPanel;
use kalkulacka::ui::components::keypad::Keypad;
use kalkulacka::ui::components::prompt_panel::PromptPanel;
use kalkulacka::ui::layout::{AppLayout, LayoutTier, centered_rect};
use kalkulacka::ui::line_input::InputResult;
use kalkulacka::ui::theme::Theme;

#[derive(Parser)]
#[command(name = "kalkulacka", version, about = "Terminal calculator with an AI math assistant")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "UI language (cs, en)")]
    locale: Option<String>,

    #[arg(short, long, help = "Model used by the AI assistant")]
    model: Option<String>,

    #[arg(short, long, help = "Path to config.toml")]
    config: Option<PathBuf>,

    #[arg(long, help = "Log level (error, warn, info, debug, trace)")]
    log_level: Option<String>,

    #[arg(long, help = "Write the default config file and exit")]
    init_config: bool,

    #[arg(long, help = "List bundled themes and exit")]
    list_themes: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.list_themes {
        for name in Theme::available_themes() {
            println!("{name}");
        }
        return Ok(());
    }

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    if cli.init_config {
        Config::default().save_to(&config_path)?;
        println!("{}", config_path.display());
        return Ok(());
    }

    let (mut config, config_error) = match Config::load_from(&config_path) {
        Ok(config) => (config, None),
        Err(err) => (Config::default(), Some(err)),
    };
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if let Some(locale) = cli.locale {
        config.locale = locale;
    }
    if let Some(model) = cli.model {
        config.oracle.model = model;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    if let Err(err) = kalkulacka::logging::init_with_config(&config.logging) {
        eprintln!(
            "warning: logging disabled, cannot open {}: {err}",
            config.logging.file.display()
        );
    }
    install_panic_hook();
    if let Some(err) = config_error {
        tracing::warn!(path = %config_path.display(), error = %err, "invalid config, using defaults");
    }

    config.normalize_locale(&kalkulacka::available_locales());
    kalkulacka::set_locale(&config.locale);
    tracing::info!(locale = %config.locale, model = %config.oracle.model, "starting");

    let oracle = Arc::new(GeminiOracle::from_config(&config.oracle));
    let mut app = App::new(config, oracle);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));
    app.attach_events(events.sender());

    let result = run_guarded(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!(error = ?err, "exiting on error");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

/// Route panic reports to the log so they do not scribble over the screen.
fn install_panic_hook() {
    panic::set_hook(Box::new(|info| {
        tracing::error!(%info, "panic");
    }));
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Run the UI loop, turning panics into the fault screen.
fn run_guarded(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        match panic::catch_unwind(AssertUnwindSafe(|| run_app(terminal, app, events))) {
            Ok(result) => return result,
            Err(payload) => app.record_fault(panic_message(payload.as_ref())),
        }
    }
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick => app.on_tick(),
            AppEvent::Resize(_, _) => {}
            AppEvent::Oracle { prompt, reply } => app.handle_oracle_reply(prompt, reply),
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Calculator => handle_calculator_key(app, key),
        AppScreen::Prompt => handle_prompt_key(app, key),
        AppScreen::Fault => handle_fault_key(app, key),
    }
}

fn handle_calculator_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('a') => app.open_prompt(),
        KeyCode::Char('h') => app.toggle_history(),
        KeyCode::Char('x') if app.show_history => app.clear_history(),
        KeyCode::Down | KeyCode::Char('j') if app.show_history => app.history_next(),
        KeyCode::Up | KeyCode::Char('k') if app.show_history => app.history_prev(),
        KeyCode::Esc if app.show_history => app.toggle_history(),
        _ => {
            if let Some(action) = action_for_key(key) {
                app.press(action);
            }
        }
    }
}

fn handle_prompt_key(app: &mut App, key: KeyEvent) {
    if app.is_busy() {
        if key.code == KeyCode::Esc {
            app.close_prompt();
        }
        return;
    }
    match app.prompt.handle(key) {
        InputResult::Submit => {
            app.submit_prompt();
        }
        InputResult::Cancel => app.close_prompt(),
        InputResult::Continue => {}
    }
}

fn handle_fault_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('r') | KeyCode::Enter => app.restart(),
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    let layout = AppLayout::new(area, app.show_history);

    frame.render_widget(
        Header::new(&app.config.oracle.model, app.is_busy(), app.theme),
        layout.header,
    );
    render_calculator(frame, app, &layout);
    frame.render_widget(Footer::new(footer_hints(app), app.theme), layout.footer);

    match app.screen {
        AppScreen::Calculator => {}
        AppScreen::Prompt => {
            let popup = centered_rect(60, 50, area);
            frame.render_widget(
                PromptPanel::new(
                    &app.prompt,
                    app.pending_prompt.as_deref(),
                    app.last_answer.as_ref(),
                    app.ticks,
                    app.theme,
                ),
                popup,
            );
        }
        AppScreen::Fault => {
            let popup = centered_rect(60, 40, area);
            frame.render_widget(Clear, popup);
            frame.render_widget(
                FaultNotice::new(app.fault.as_deref().unwrap_or_default(), app.theme),
                popup,
            );
        }
    }
}

fn render_calculator(frame: &mut ratatui::Frame, app: &App, layout: &AppLayout) {
    let narrow_history = layout.tier == LayoutTier::Narrow && layout.history.is_some();

    if !narrow_history {
        let explanation_height = if app.last_answer.is_some() { 2 } else { 0 };
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(explanation_height),
                Constraint::Min(5),
            ])
            .split(layout.calculator);
        frame.render_widget(CalcDisplay::new(&app.calc, app.is_busy(), app.theme), rows[0]);
        if let Some(last) = &app.last_answer {
            render_explanation(frame, app, last, rows[1]);
        }
        frame.render_widget(Keypad::new(&app.calc, app.is_busy(), app.theme), rows[2]);
    }

    if let Some(history_area) = layout.history {
        let area = if narrow_history {
            // Keep the display visible above the history
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(4), Constraint::Min(3)])
                .split(history_area);
            frame.render_widget(CalcDisplay::new(&app.calc, app.is_busy(), app.theme), rows[0]);
            rows[1]
        } else {
            history_area
        };
        render_history(frame, app, area);
    }
}

fn render_explanation(frame: &mut ratatui::Frame, app: &App, last: &LastAnswer, area: Rect) {
    let colors = &app.theme.colors;
    let color = if last.reply.is_sentinel() {
        colors.error()
    } else {
        colors.ai()
    };
    let text = if last.reply.explanation.is_empty() {
        last.reply.answer.clone()
    } else {
        last.reply.explanation.clone()
    };
    let line = Line::from(vec![
        Span::styled("\u{2726} ", Style::default().fg(colors.ai())),
        Span::styled(text, Style::default().fg(color)),
    ]);
    frame.render_widget(Paragraph::new(line).wrap(Wrap { trim: true }), area);
}

fn render_history(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    frame.render_widget(
        HistoryPanel::new(&app.calc.history, app.history_selected, app.theme),
        area,
    );
}
