use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use is_terminal::IsTerminal;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{io, time::Duration};

use crate::cli::app::RunArgs;
use crate::webhook::WebhookClient;

mod app;
mod events;
mod ui;

pub use app::ChatApp;

/// How long to wait for a key event before checking timers and the
/// submission channel again.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub async fn run_chat_form(args: RunArgs) -> Result<()> {
    if !io::stdout().is_terminal() {
        anyhow::bail!("intake-cli needs an interactive terminal; stdout is not a TTY");
    }

    let mut config = crate::global_config().clone();
    if let Some(url) = args.webhook_url {
        config.webhook_url = url;
    }
    let client = WebhookClient::new(config.webhook_url.clone(), config.request_timeout())?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_chat_loop(&mut terminal, &config, client).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_chat_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: &crate::config::Config,
    client: WebhookClient,
) -> Result<()> {
    let mut app = ChatApp::new(config, client);
    app.start();

    loop {
        terminal.draw(|f| ui::draw(f, &mut app))?;

        app.tick();

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    events::handle_key(&mut app, key);
                }
            }
        }

        if app.quit {
            break;
        }
    }

    Ok(())
}
