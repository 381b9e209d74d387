mod config;
mod controller;
mod logging;
mod model;
mod view;

use std::io;
use std::sync::Arc;
use anyhow::Result;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};

use view::AppView;
use controller::AppController;
use model::{ApiClient, AppModel, PlayerTimings, Screen, SessionStore};

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = logging::init_logging() {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!("=== reels-rs starting ===");

    let cli = config::CliArgs::from_env()?;
    let config = config::load(&cli)?;

    let session = SessionStore::new(&config.data_dir);
    let has_session = match session.load_from_disk().await {
        Ok(found) => found,
        Err(e) => {
            tracing::warn!(error = %e, "Could not read stored session");
            false
        }
    };

    let client = ApiClient::new(config.base_url(), session)?;
    let timings = PlayerTimings {
        double_tap_window: config.double_tap_window(),
        controls_visible_for: config.controls_hide_after(),
        ..PlayerTimings::default()
    };
    let model = Arc::new(Mutex::new(AppModel::new(client, timings)));
    let controller = AppController::new(model.clone());

    tracing::info!(api_url = %config.base_url(), has_session, "Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // A stored token goes straight to the feed
    let initial_screen = if has_session { Screen::Home } else { Screen::Login };
    controller.open_screen(initial_screen).await;

    let res = run_app(&mut terminal, model, controller).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("reels-rs shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: Arc<Mutex<AppModel>>,
    controller: AppController,
) -> io::Result<()> {
    loop {
        let now = Instant::now();

        // Feed pages are one viewport tall, so track the terminal size
        let size = terminal.size()?;
        let area = Rect::new(0, 0, size.width, size.height);
        controller.resize_feed(AppView::feed_viewport_height(area)).await;
        controller.tick(now).await;

        // Get current state
        let (state, should_quit) = {
            let model_guard = model.lock().await;
            (model_guard.get_render_state().await, model_guard.should_quit().await)
        };

        if should_quit {
            break;
        }

        // Draw UI
        terminal.draw(|f| {
            AppView::render(f, &state, now);
        })?;

        // Handle input with shorter poll time for smoother UI updates
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Err(e) = controller.handle_key_event(key).await {
                    tracing::warn!(error = %e, "Key handling failed");
                }
            }
        }
    }

    Ok(())
}
