// ============================================================================
// CoinWatch - Top 10 des cryptomonnaies dans le terminal
// ============================================================================
// Programme TUI : tableau trié des 10 plus grosses capitalisations,
// sélecteur de devise, rafraîchissement automatique chaque minute.
//
// CONCEPTS RUST CLÉS :
// 1. Terminal raw mode : contrôle total du terminal
// 2. Event loop : boucle qui gère événements et rendering
// 3. Async dans sync : runtime tokio possédé par main, UI synchrone
// 4. Channels : les tâches de fetch parlent à l'UI via mpsc
// ============================================================================

use std::io;
use std::path::PathBuf;
use std::sync::{mpsc, Arc};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use tracing::{debug, error, info};

use coinwatch::api::HttpMarketSource;
use coinwatch::app::App;
use coinwatch::config::{Cli, Config};
use coinwatch::refresh::{FetchEvent, RefreshController};
use coinwatch::ui::{handle_event, render, AppCommand, EventHandler};

// ============================================================================
// Initialisation du logging
// ============================================================================
// CONCEPT : Logging dans une app TUI
// - Les println! ne fonctionnent pas une fois le TUI lancé
// - On log vers un fichier à la place, avec rotation quotidienne
// ============================================================================

/// Initialise le système de logging vers fichier
///
/// Les logs sont écrits dans :
/// - Linux : ~/.local/share/coinwatch/logs/coinwatch.log
/// - macOS : ~/Library/Application Support/coinwatch/logs/coinwatch.log
/// - Windows : C:\Users\<user>\AppData\Local\coinwatch\logs\coinwatch.log
///
/// # Utilisation
/// ```bash
/// tail -f ~/.local/share/coinwatch/logs/coinwatch.log
/// RUST_LOG=coinwatch=trace cargo run
/// ```
fn init_logging() -> Result<PathBuf> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    // CONCEPT RUST : Option combinators
    // - dirs::data_local_dir() peut être None (HOME absent...)
    // - On retombe alors sur ./logs
    let log_dir = dirs::data_local_dir()
        .map(|dir| dir.join("coinwatch").join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"));

    std::fs::create_dir_all(&log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir.clone(), "coinwatch.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false) // Pas de codes couleur dans le fichier
                .with_target(true)
                .with_thread_ids(true) // Les fetchs tournent sur les workers tokio
                .with_line_number(true),
        )
        .with(
            // Par défaut : debug pour coinwatch, info pour les dépendances
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coinwatch=debug,info".into()),
        )
        .init();

    info!(?log_dir, "Logging initialisé");
    Ok(log_dir)
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

fn main() -> Result<()> {
    // Parse la ligne de commande avant tout : --help / --version sortent ici
    let config = Config::from(Cli::parse());

    // Si le logging échoue, on continue quand même
    if let Err(e) = init_logging() {
        eprintln!("⚠️  Warning: Failed to initialize logging: {}", e);
        eprintln!("   Continuing without logging...");
    }

    info!(
        currency = %config.initial_currency,
        refresh_secs = config.refresh_interval.as_secs(),
        endpoint = %config.endpoint,
        discard_stale = config.discard_stale,
        "CoinWatch starting up"
    );

    // CONCEPT RUST : Runtime possédé par main
    // - Le timer et les fetchs tournent sur les workers tokio
    // - La boucle UI reste synchrone sur le thread principal
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("coinwatch-worker")
        .build()
        .context("Impossible de créer le runtime tokio")?;

    let source = HttpMarketSource::new(&config).context("Impossible de créer le client HTTP")?;

    // fetch → UI
    let (event_tx, event_rx) = mpsc::channel::<FetchEvent>();

    let mut app = App::new(&config);

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    // Le contrôleur lance le premier fetch immédiatement
    let mut controller =
        RefreshController::start(runtime.handle().clone(), Arc::new(source), config, event_tx);

    let events = EventHandler::new();

    info!("Starting event loop");
    let result = run(&mut terminal, &mut app, &events, &controller, &event_rx);

    // Désarme le timer avant de rendre le terminal
    controller.shutdown();

    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    // Les fetchs encore en vol sont abandonnés
    runtime.shutdown_background();

    result
}

// ============================================================================
// Event Loop Principal
// ============================================================================
// CONCEPT : Game Loop / Event Loop Pattern
// 0. Résultats : applique les événements des fetchs
// 1. Render : dessine l'interface
// 2. Input : traite un événement clavier / souris
// 3. Update : transmet les commandes au contrôleur
// ============================================================================

/// Exécute la boucle principale de l'application
fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
    controller: &RefreshController,
    event_rx: &mpsc::Receiver<FetchEvent>,
) -> Result<()> {
    let mut area = Rect::default();

    while app.is_running() {
        // ========================================
        // 0. RÉSULTATS : non bloquant
        // ========================================
        for event in event_rx.try_iter() {
            app.apply_fetch_event(event);
        }

        // ========================================
        // 1. RENDER
        // ========================================
        // La taille dessinée sert à localiser les clics
        let completed = terminal.draw(|frame| render(frame, app))?;
        area = completed.area;

        // ========================================
        // 2. INPUT
        // ========================================
        let event = events.next().context("Lecture des événements du terminal")?;
        let command = handle_event(app, &event, area);

        // ========================================
        // 3. UPDATE
        // ========================================
        match command {
            Some(AppCommand::SelectCurrency(currency)) => {
                controller.select_currency(currency);
            }
            Some(AppCommand::Refresh) => {
                controller.refresh_now();
            }
            None => {}
        }
    }

    debug!(?area, "Event loop finished");
    Ok(())
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================
// IMPORTANT : Toujours restaurer le terminal avant de quitter !
// ============================================================================

/// Configure le terminal en mode TUI (raw mode, alternate screen, souris)
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture // Clics sur les en-têtes et le sélecteur
    )?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| e.into())
}

/// Restaure le terminal à son état normal
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;

    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;

    terminal.show_cursor()?;

    Ok(())
}
