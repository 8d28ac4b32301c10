use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{error, info, warn};

use coinreel::api::CoinGeckoClient;
use coinreel::config::Config;
use coinreel::host::{Host, MemoryHost};
use coinreel::theme::{self, THEME_NAMES};
use coinreel::types::{DisplayMode, ScrollDirection};
use coinreel::ui::{self, term_host, Status, TermHost};
use coinreel::widget::{FetchResult, Widget};

#[derive(Parser, Debug)]
#[command(name = "coinreel", version, about = "Crypto price carousel")]
struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Initial display mode: trending or movers
    #[arg(long, default_value = "trending", value_parser = parse_mode)]
    mode: DisplayMode,

    /// Fetch once and print the widget as an HTML page
    #[arg(long)]
    html: bool,

    /// Override the refresh interval in seconds
    #[arg(long)]
    interval: Option<u64>,
}

fn parse_mode(s: &str) -> Result<DisplayMode, String> {
    DisplayMode::from_name(s).ok_or_else(|| format!("unknown mode '{}' (trending|movers)", s))
}

fn init_logging() -> Result<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = Config::config_dir();
    std::fs::create_dir_all(&log_dir).context("Failed to create log directory")?;
    let appender = tracing_appender::rolling::daily(&log_dir, "coinreel.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coinreel=info".into()),
        )
        .try_init()
        .context("Failed to install log subscriber")?;

    info!(?log_dir, "logging initialised");
    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = match init_logging() {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: logging disabled: {:#}", e);
            None
        }
    };

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(secs) = cli.interval {
        config.refresh_interval_secs = secs.max(30);
    }
    if !THEME_NAMES.contains(&config.theme.as_str()) {
        warn!(theme = %config.theme, "unknown theme, using dark");
    }

    let client = Arc::new(
        CoinGeckoClient::new(&config.coingecko_api_key)
            .context("Failed to build HTTP client")?,
    );

    if cli.html {
        return print_html(&client, &config, cli.mode).await;
    }

    let host = TermHost::new(theme::by_name(&config.theme));
    let mut widget = Widget::new(host, &config).with_mode(cli.mode);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut widget, client).await;
    widget.shutdown();

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        error!(error = %e, "fatal");
        eprintln!("Error: {}", e);
    }

    Ok(())
}

async fn print_html(client: &CoinGeckoClient, config: &Config, mode: DisplayMode) -> Result<()> {
    let mut widget = Widget::new(MemoryHost::default(), config).with_mode(mode);
    widget.mount();
    widget.apply_fetch(client.fetch_markets().await);
    println!("{}", widget.host().to_page());
    Ok(())
}

/// (Re)initialises the widget with a schedule that fetches the listing and
/// hands each result to the event loop.
fn arm_refresh<H: Host>(
    widget: &mut Widget<H>,
    client: &Arc<CoinGeckoClient>,
    tx: &UnboundedSender<FetchResult>,
) {
    let client = Arc::clone(client);
    let tx = tx.clone();
    widget.init(move || {
        let client = Arc::clone(&client);
        let tx = tx.clone();
        async move {
            let _ = tx.send(client.fetch_markets().await);
        }
    });
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    widget: &mut Widget<TermHost>,
    client: Arc<CoinGeckoClient>,
) -> Result<()> {
    let tick_rate = Duration::from_millis(33);
    let (tx, mut rx): (UnboundedSender<FetchResult>, UnboundedReceiver<FetchResult>) =
        mpsc::unbounded_channel();

    arm_refresh(widget, &client, &tx);

    loop {
        while let Ok(result) = rx.try_recv() {
            widget.apply_fetch(result);
        }

        widget.host_mut().tick();
        if widget.host_mut().take_scrolled() {
            widget.on_scroll();
        }

        let status = Status {
            last_refresh: widget.last_refresh(),
        };
        terminal.draw(|f| ui::draw(f, widget.host_mut(), &status))?;
        widget.on_animation_frame();

        if !event::poll(tick_rate)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) => {
                if handle_key(widget, key) {
                    return Ok(());
                }
                if key.code == KeyCode::Char('r') {
                    arm_refresh(widget, &client, &tx);
                }
            }
            Event::Mouse(mouse) => handle_mouse(widget, mouse),
            _ => {}
        }
    }
}

/// Returns true when the app should quit.
fn handle_key(widget: &mut Widget<TermHost>, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Char('t') => {
            widget.set_mode(DisplayMode::Trending);
        }
        KeyCode::Char('m') => {
            widget.set_mode(DisplayMode::Movers);
        }
        KeyCode::Tab => {
            let next = widget.mode().next();
            widget.set_mode(next);
        }
        KeyCode::Char('h') | KeyCode::Left => widget.scroll_arrow(ScrollDirection::Left),
        KeyCode::Char('l') | KeyCode::Right => widget.scroll_arrow(ScrollDirection::Right),
        _ => {}
    }
    false
}

fn handle_mouse(widget: &mut Widget<TermHost>, mouse: MouseEvent) {
    let (col, row) = (mouse.column, mouse.row);
    let hit = widget.host().hit;
    let in_viewport = term_host::contains(hit.viewport, col, row);
    let x = term_host::column_to_units(col);

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if term_host::contains(hit.arrow_left, col, row) {
                widget.scroll_arrow(ScrollDirection::Left);
            } else if term_host::contains(hit.arrow_right, col, row) {
                widget.scroll_arrow(ScrollDirection::Right);
            } else if let Some(i) = hit.tabs.iter().position(|r| term_host::contains(*r, col, row)) {
                widget.set_mode(DisplayMode::ALL[i]);
            } else if in_viewport {
                widget.pointer_down(x);
            }
        }
        MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
            if !widget.is_dragging() {
                return;
            }
            if in_viewport {
                widget.pointer_move(x);
            } else {
                widget.pointer_leave();
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            if widget.is_dragging() {
                widget.pointer_up();
            }
        }
        MouseEventKind::ScrollDown | MouseEventKind::ScrollRight if in_viewport => {
            widget.scroll_arrow(ScrollDirection::Right);
        }
        MouseEventKind::ScrollUp | MouseEventKind::ScrollLeft if in_viewport => {
            widget.scroll_arrow(ScrollDirection::Left);
        }
        _ => {}
    }
}
