use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};
use tokio::runtime::Runtime;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gaugewatch::adapters::draft::parse_number;
use gaugewatch::adapters::{collect, AlertDraft, Backend, BackendBuilder, SchemaKind, Session};
use gaugewatch::app::{write_dashboard, App, View, ViewOptions};
use gaugewatch::settings::Overrides;
use gaugewatch::data::duration::format_age;
use gaugewatch::types::{format_number, Timestamp};
use gaugewatch::ui::common::render_sparkline;
use gaugewatch::{
    events, ui, AnnotationStore, BackendSource, DataSource, FileSource, History, Settings, Theme,
};

#[derive(Parser, Debug)]
#[command(name = "gaugewatch")]
#[command(about = "Terminal dashboard for monitor values and alert thresholds")]
struct Args {
    /// Path to a TOML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend URL (overrides backend.url)
    #[arg(long)]
    url: Option<String>,

    /// Backend schema: legacy, formula or auto
    #[arg(long)]
    schema: Option<SchemaKind>,

    /// Login username
    #[arg(short, long)]
    username: Option<String>,

    /// Login password
    #[arg(short, long)]
    password: Option<String>,

    /// View a dashboard exported earlier instead of a live backend
    #[arg(short, long, conflicts_with = "url")]
    file: Option<PathBuf>,

    /// Refresh interval: 10s, 30s, 1m, 5m or 15m
    #[arg(short, long)]
    refresh: Option<String>,

    /// Initial sort for the monitors view (name, value, last_updated, alert_status, custom)
    #[arg(long)]
    sort: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch once and write the normalized dashboard as JSON
    Export {
        /// Output path
        path: PathBuf,
    },

    /// Set the value of a constant monitor
    SetConstant {
        id: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Create, update or delete alert rules
    #[command(subcommand)]
    Alert(AlertCommand),

    /// Set a monitor's local alias (omit the alias to remove it)
    Alias { id: String, alias: Option<String> },

    /// Manage a monitor's local tags
    #[command(subcommand)]
    Tag(TagCommand),

    /// Print the value history of a monitor
    History { id: String },
}

#[derive(Subcommand, Debug)]
enum AlertCommand {
    /// Create an alert rule; without --monitor the rule is global
    Create(ThresholdArgs),

    /// Replace an existing alert rule
    Update {
        rule_id: String,
        #[command(flatten)]
        thresholds: ThresholdArgs,
    },

    /// Delete an alert rule
    Delete { rule_id: String },
}

#[derive(clap::Args, Debug)]
struct ThresholdArgs {
    /// Monitor the rule applies to
    #[arg(long)]
    monitor: Option<String>,

    /// Alert when the value goes above this
    #[arg(long, allow_hyphen_values = true)]
    upper: Option<String>,

    /// Alert when the value goes below this
    #[arg(long, allow_hyphen_values = true)]
    lower: Option<String>,

    /// low, medium, high or critical
    #[arg(long)]
    severity: Option<String>,
}

impl ThresholdArgs {
    fn draft(&self) -> Result<AlertDraft> {
        Ok(AlertDraft::from_input(
            self.monitor.as_deref(),
            self.upper.as_deref(),
            self.lower.as_deref(),
            self.severity.as_deref(),
        )?)
    }
}

#[derive(Subcommand, Debug)]
enum TagCommand {
    /// Add a tag
    Add { id: String, tag: String },
    /// Remove a tag
    Remove { id: String, tag: String },
    /// Remove every tag
    Clear { id: String },
}

fn main() -> Result<()> {
    let args = Args::parse();
    let settings = load_settings(&args)?;

    init_logging(&settings, args.command.is_none())?;

    match args.command {
        None => match args.file {
            Some(ref path) => run_with_file(path, &settings),
            None => run_with_backend(&settings),
        },
        Some(command) => run_command(command, &settings),
    }
}

/// Load settings with the command-line flags layered on top.
fn load_settings(args: &Args) -> Result<Settings> {
    let overrides = Overrides {
        url: args.url.clone(),
        schema: args.schema,
        username: args.username.clone(),
        password: args.password.clone(),
        refresh_interval: args.refresh.clone(),
        sort: args.sort.clone(),
    };
    Settings::load(args.config.as_deref(), &overrides)
}

/// Log to a file while the TUI owns the terminal, to stderr otherwise.
fn init_logging(settings: &Settings, interactive: bool) -> Result<()> {
    let filter = EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);

    if interactive {
        fs::create_dir_all(&settings.storage.dir).with_context(|| {
            format!("Failed to create {}", settings.storage.dir.display())
        })?;
        let path = settings.storage.dir.join("gaugewatch.log");
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(Mutex::new(file));
        registry.with(fmt_layer).init();
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(io::stderr);
        registry.with(fmt_layer).init();
    }
    Ok(())
}

/// Build the configured backend and log in.
fn connect(settings: &Settings, rt: &Runtime) -> Result<(Arc<dyn Backend>, Session)> {
    let backend: Arc<dyn Backend> = BackendBuilder::new()
        .endpoint(&settings.backend.url)
        .timeout(settings.timeout()?)
        .schema(settings.backend.schema)
        .build()
        .into();

    let session = rt
        .block_on(backend.login(&settings.credentials()))
        .with_context(|| format!("Failed to log in to {}", settings.backend.url))?;
    info!(url = %settings.backend.url, schema = %backend.schema(), "Logged in");

    Ok((backend, session))
}

/// Run with an exported dashboard file
fn run_with_file(path: &Path, settings: &Settings) -> Result<()> {
    let source = Box::new(FileSource::new(path));
    run_tui(source, settings)
}

/// Run against a live backend
fn run_with_backend(settings: &Settings) -> Result<()> {
    let rt = Runtime::new()?;
    let (backend, session) = connect(settings, &rt)?;
    let source = BackendSource::new(backend, session, rt.handle().clone(), &settings.backend.url);

    // The runtime keeps serving refresh tasks while the TUI runs on this thread
    run_tui(Box::new(source), settings)
}

/// Run a non-interactive subcommand
fn run_command(command: Command, settings: &Settings) -> Result<()> {
    let store = AnnotationStore::new(&settings.storage.dir);

    match command {
        Command::Alias { id, alias } => {
            store.set_alias(&id, alias.as_deref())?;
            match alias.as_deref().map(str::trim).filter(|a| !a.is_empty()) {
                Some(alias) => println!("{} is now shown as '{}'", id, alias),
                None => println!("Removed alias of {}", id),
            }
        }
        Command::Tag(TagCommand::Add { id, tag }) => {
            store.add_tag(&id, &tag)?;
            println!("Tagged {} with '{}'", id, tag.trim());
        }
        Command::Tag(TagCommand::Remove { id, tag }) => {
            if store.remove_tag(&id, &tag)? {
                println!("Removed tag '{}' from {}", tag.trim(), id);
            } else {
                println!("{} has no tag '{}'", id, tag.trim());
            }
        }
        Command::Tag(TagCommand::Clear { id }) => {
            store.clear_tags(&id)?;
            println!("Cleared tags of {}", id);
        }
        Command::Export { path } => {
            let rt = Runtime::new()?;
            let (backend, session) = connect(settings, &rt)?;
            let dashboard = rt.block_on(collect(backend.as_ref(), &session));
            for error in &dashboard.errors {
                warn!(resource = error.resource.label(), message = %error.message, "Fetch failed");
            }
            if dashboard.error_for(gaugewatch::types::Resource::Monitors).is_some() {
                bail!("Could not fetch monitors, nothing exported");
            }
            write_dashboard(&dashboard, &path)?;
            println!(
                "Exported {} monitors and {} alert configs to: {}",
                dashboard.monitors.len(),
                dashboard.configs.len(),
                path.display()
            );
        }
        Command::SetConstant { id, value } => {
            let value = parse_number("value", &value)?;
            let rt = Runtime::new()?;
            let (backend, session) = connect(settings, &rt)?;
            rt.block_on(backend.set_constant(&session, &id, value))?;
            println!("Set {} to {}", id, format_number(value));
        }
        Command::Alert(AlertCommand::Create(thresholds)) => {
            let draft = thresholds.draft()?;
            let rt = Runtime::new()?;
            let (backend, session) = connect(settings, &rt)?;
            let rule_id = rt.block_on(backend.create_alert(&session, &draft))?;
            println!("Created alert rule {}", rule_id);
        }
        Command::Alert(AlertCommand::Update { rule_id, thresholds }) => {
            let draft = thresholds.draft()?;
            let rt = Runtime::new()?;
            let (backend, session) = connect(settings, &rt)?;
            rt.block_on(backend.update_alert(&session, &rule_id, &draft))?;
            println!("Updated alert rule {}", rule_id);
        }
        Command::Alert(AlertCommand::Delete { rule_id }) => {
            if rule_id.trim().is_empty() {
                bail!("rule id is required");
            }
            let rt = Runtime::new()?;
            let (backend, session) = connect(settings, &rt)?;
            rt.block_on(backend.delete_alert(&session, &rule_id))?;
            println!("Deleted alert rule {}", rule_id);
        }
        Command::History { id } => {
            let rt = Runtime::new()?;
            let (backend, session) = connect(settings, &rt)?;
            let points = rt.block_on(backend.history(&session, &id))?;
            if points.is_empty() {
                println!("No history for {}", id);
                return Ok(());
            }

            let now = Timestamp::now();
            for point in &points {
                println!(
                    "{:>10}  {}",
                    format!("{} ago", format_age(point.at.age(now))),
                    format_number(point.value)
                );
            }

            let mut history = History::new();
            history.seed(&id, &points);
            println!("trend: {}", render_sparkline(&history.sparkline(&id)));
        }
    }

    Ok(())
}

/// Run the TUI with the given data source
fn run_tui(source: Box<dyn DataSource>, settings: &Settings) -> Result<()> {
    let options = ViewOptions::from_settings(settings)?;
    let refresh_interval = settings.refresh_interval()?.as_duration();
    let store = AnnotationStore::new(&settings.storage.dir);

    // Detect the theme before raw mode takes over the terminal
    let theme = Theme::auto_detect();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    // Create app and request initial data
    let mut app = App::new(source, store, options, theme);
    app.refresh();
    app.reload_data();

    let result = run_app(&mut terminal, &mut app, refresh_interval);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    refresh_interval: Duration,
) -> Result<()> {
    let mut last_refresh = Instant::now();

    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 12;

    while app.running {
        terminal.draw(|frame| {
            let area = frame.area();

            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let centered = ui::common::centered_rows(area, 5);
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Length(1), // Tabs
                Constraint::Min(8),    // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            ui::common::render_header(frame, app, chunks[0]);
            ui::common::render_tabs(frame, app, chunks[1]);

            match app.current_view {
                View::Monitors => ui::monitors::render(frame, app, chunks[2]),
                View::Alerts => ui::alerts::render(frame, app, chunks[2]),
            }

            ui::common::render_status_bar(frame, app, chunks[3]);

            if app.show_detail_overlay {
                ui::detail::render_overlay(frame, app, area);
            }

            if app.prompt.is_some() {
                ui::common::render_prompt(frame, app, area);
            }

            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => {
                    // Content starts after header (1) + tabs (1) + table border (1) + table header (1)
                    events::handle_mouse_event(app, mouse, 3);
                }
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }

        // Periodic refresh; the ticker moves on with it
        if last_refresh.elapsed() >= refresh_interval {
            app.refresh();
            app.advance_ticker();
            last_refresh = Instant::now();
        }

        app.reload_data();
    }

    Ok(())
}
