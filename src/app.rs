// ============================================================================
// Structure : App
// ============================================================================
// Gère l'état global de l'application TUI
//
// CONCEPTS RUST :
// 1. State Management : centraliser l'état dans une seule structure
// 2. Mutabilité contrôlée : &mut self pour modifier l'état
// 3. Une seule boucle (thread UI) possède App : pas besoin de Mutex
//
// PATTERN : Cette structure suit le pattern "Application State"
// - Tous les composants de l'UI lisent depuis App
// - Toutes les modifications passent par les méthodes de App
// - Garantit la cohérence de l'état
// ============================================================================

use chrono::{DateTime, Local};
use tracing::{debug, error, info};

use crate::config::Config;
use crate::models::{sort_coins, Coin, Currency, SortField, SortState};
use crate::refresh::{FetchEvent, Generation};

// ============================================================================
// Enum : ViewState
// ============================================================================
// CONCEPT RUST : Enum calculé (dérivé de l'état, jamais stocké)
// - Le rendu fait un match dessus
// - Le compilateur force à gérer les trois cas
// ============================================================================

/// Ce que le contenu principal doit afficher
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState<'a> {
    /// Premier chargement : rien à montrer encore
    Loading,

    /// Le dernier cycle a échoué
    Error(&'a str),

    /// Tableau des coins (éventuellement en cours de rafraîchissement)
    Table,
}

/// État du menu déroulant des devises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dropdown {
    /// Menu ouvert ?
    pub open: bool,

    /// Index (dans Currency::ALL) de la ligne en surbrillance
    pub highlighted: usize,
}

/// État principal de l'application
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    /// Indique si l'utilisateur a demandé à quitter (attend confirmation)
    /// CONCEPT : Two-step quit pour éviter les sorties accidentelles
    /// - Première pression de 'q' : confirm_quit = true
    /// - Deuxième pression de 'q' : running = false (quit réel)
    /// - N'importe quelle autre touche : confirm_quit = false (annulation)
    pub confirm_quit: bool,

    /// Coins du dernier fetch réussi, dans l'ordre de l'API
    /// Remplacés en bloc, jamais fusionnés
    pub coins: Vec<Coin>,

    /// Un cycle de fetch est en cours
    pub is_loading: bool,

    /// Message de l'erreur du dernier cycle
    pub error: Option<String>,

    /// Colonne et direction du tri
    pub sort: SortState,

    /// Devise sélectionnée
    pub currency: Currency,

    /// Menu de sélection de devise
    pub dropdown: Dropdown,

    /// Heure du dernier fetch réussi
    pub last_updated: Option<DateTime<Local>>,

    /// Ignore les résultats plus anciens que la dernière génération lancée
    discard_stale: bool,

    /// Plus grande génération vue (Started)
    latest_generation: Generation,
}

impl App {
    /// Crée l'état initial : chargement en cours, tri (rang, ascendant)
    pub fn new(config: &Config) -> Self {
        Self {
            running: true,
            confirm_quit: false,
            coins: Vec::new(),
            is_loading: true,
            error: None,
            sort: SortState::default(),
            currency: config.initial_currency,
            dropdown: Dropdown {
                open: false,
                highlighted: config.initial_currency.index(),
            },
            last_updated: None,
            discard_stale: config.discard_stale,
            latest_generation: 0,
        }
    }

    /// Quitte l'application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Vérifie si l'application doit continuer
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Demande la confirmation de quitter
    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    /// Annule la demande de quit
    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    /// Vérifie si on attend la confirmation de quit
    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }

    // ========================================================================
    // Données et tri
    // ========================================================================

    /// Coins dans l'ordre d'affichage
    ///
    /// Recalculé à chaque frame : 10 lignes, le coût est négligeable.
    pub fn sorted_coins(&self) -> Vec<Coin> {
        sort_coins(&self.coins, self.sort)
    }

    /// Clic sur une colonne triable
    pub fn select_sort(&mut self, field: SortField) {
        self.sort.select(field);
        debug!(field = ?self.sort.field, direction = ?self.sort.direction, "Sort changed");
    }

    /// Ce que le contenu principal doit afficher
    ///
    /// Pendant un rafraîchissement en arrière-plan, le tableau reste
    /// visible avec les anciennes données.
    pub fn view_state(&self) -> ViewState<'_> {
        if let Some(message) = &self.error {
            ViewState::Error(message)
        } else if self.coins.is_empty() {
            ViewState::Loading
        } else {
            ViewState::Table
        }
    }

    /// Applique un événement du contrôleur de rafraîchissement
    ///
    /// CONCEPT : équivalent d'un try/finally
    /// - Started : efface l'erreur, is_loading = true
    /// - Finished : is_loading = false quelle que soit l'issue
    pub fn apply_fetch_event(&mut self, event: FetchEvent) {
        match event {
            FetchEvent::Started { generation, currency } => {
                debug!(generation, %currency, "Fetch cycle started");
                self.latest_generation = self.latest_generation.max(generation);
                self.error = None;
                self.is_loading = true;
            }

            FetchEvent::Finished {
                generation,
                currency,
                result,
            } => {
                if self.discard_stale && generation < self.latest_generation {
                    info!(
                        generation,
                        latest = self.latest_generation,
                        %currency,
                        "Discarding stale fetch result"
                    );
                    return;
                }

                self.is_loading = false;
                match result {
                    Ok(coins) => {
                        info!(generation, %currency, coins = coins.len(), "Replacing coin list");
                        self.coins = coins;
                        self.last_updated = Some(Local::now());
                    }
                    Err(e) => {
                        error!(generation, %currency, error = ?e, "Fetch cycle failed");
                        self.error = Some(e.to_string());
                    }
                }
            }
        }
    }

    // ========================================================================
    // Sélection de devise
    // ========================================================================

    /// Sélectionne une devise
    ///
    /// Retourne true si elle a changé (un fetch doit alors être lancé).
    pub fn select_currency(&mut self, currency: Currency) -> bool {
        self.dropdown.open = false;
        if self.currency == currency {
            return false;
        }
        self.currency = currency;
        self.dropdown.highlighted = currency.index();
        true
    }

    /// Ouvre/ferme le menu des devises
    pub fn toggle_dropdown(&mut self) {
        if self.dropdown.open {
            self.close_dropdown();
        } else {
            self.dropdown.open = true;
            self.dropdown.highlighted = self.currency.index();
        }
    }

    /// Ferme le menu sans rien sélectionner
    pub fn close_dropdown(&mut self) {
        self.dropdown.open = false;
    }

    /// Vérifie si le menu est ouvert
    pub fn is_dropdown_open(&self) -> bool {
        self.dropdown.open
    }

    /// Remonte dans le menu (saturating_sub : reste à 0)
    pub fn dropdown_up(&mut self) {
        self.dropdown.highlighted = self.dropdown.highlighted.saturating_sub(1);
    }

    /// Descend dans le menu
    pub fn dropdown_down(&mut self) {
        let max_index = Currency::ALL.len() - 1;
        self.dropdown.highlighted = (self.dropdown.highlighted + 1).min(max_index);
    }

    /// Devise en surbrillance
    pub fn highlighted_currency(&self) -> Currency {
        Currency::ALL
            .get(self.dropdown.highlighted)
            .copied()
            .unwrap_or_default()
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FetchError;
    use crate::models::SortDirection;

    fn coin(id: &str, rank: u32) -> Coin {
        Coin {
            id: id.to_string(),
            symbol: id.to_string(),
            name: id.to_string(),
            image: String::new(),
            current_price: Some(f64::from(rank)),
            market_cap_rank: rank,
            price_change_percentage_24h: None,
            market_cap: 0.0,
        }
    }

    fn started(generation: Generation) -> FetchEvent {
        FetchEvent::Started {
            generation,
            currency: Currency::Usd,
        }
    }

    fn finished(generation: Generation, result: Result<Vec<Coin>, FetchError>) -> FetchEvent {
        FetchEvent::Finished {
            generation,
            currency: Currency::Usd,
            result,
        }
    }

    #[test]
    fn test_app_creation() {
        let app = App::new(&Config::default());
        assert!(app.is_running());
        assert!(app.coins.is_empty());
        assert!(app.is_loading);
        assert_eq!(app.sort, SortState::default());
        assert_eq!(app.view_state(), ViewState::Loading);
    }

    #[test]
    fn test_app_quit() {
        let mut app = App::new(&Config::default());
        app.request_quit();
        assert!(app.is_awaiting_quit_confirmation());
        app.cancel_quit();
        assert!(!app.is_awaiting_quit_confirmation());

        app.quit();
        assert!(!app.is_running());
    }

    #[test]
    fn test_successful_cycle_replaces_coins() {
        let mut app = App::new(&Config::default());
        app.apply_fetch_event(started(1));
        app.apply_fetch_event(finished(1, Ok(vec![coin("a", 1), coin("b", 2)])));
        assert!(!app.is_loading);
        assert_eq!(app.coins.len(), 2);
        assert!(app.last_updated.is_some());

        app.apply_fetch_event(started(2));
        app.apply_fetch_event(finished(2, Ok(vec![coin("c", 1)])));
        assert_eq!(app.coins, vec![coin("c", 1)]);
    }

    #[test]
    fn test_failed_cycle_keeps_coins_and_sets_error() {
        let mut app = App::new(&Config::default());
        app.apply_fetch_event(finished(1, Ok(vec![coin("a", 1)])));

        app.apply_fetch_event(started(2));
        assert_eq!(app.view_state(), ViewState::Table);

        app.apply_fetch_event(finished(2, Err(FetchError::Status { status: 429 })));
        assert!(!app.is_loading);
        assert_eq!(app.coins.len(), 1);
        match app.view_state() {
            ViewState::Error(message) => assert!(message.contains("429")),
            other => panic!("expected error view, got {:?}", other),
        }

        // Le cycle suivant efface l'erreur dès son démarrage
        app.apply_fetch_event(started(3));
        assert!(app.error.is_none());
        assert_eq!(app.view_state(), ViewState::Table);
    }

    #[test]
    fn test_sort_persists_across_fetches() {
        let mut app = App::new(&Config::default());
        app.select_sort(SortField::Price);
        app.apply_fetch_event(finished(1, Ok(vec![coin("a", 1), coin("b", 2)])));
        app.select_currency(Currency::Eur);
        app.apply_fetch_event(finished(2, Ok(vec![coin("a", 1), coin("b", 2)])));

        assert_eq!(app.sort.field, SortField::Price);
        assert_eq!(app.sort.direction, SortDirection::Descending);
        let ids: Vec<String> = app.sorted_coins().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_last_writer_wins_by_default() {
        let mut app = App::new(&Config::default());
        app.apply_fetch_event(started(1));
        app.apply_fetch_event(started(2));
        app.apply_fetch_event(finished(2, Ok(vec![coin("new", 1)])));
        app.apply_fetch_event(finished(1, Ok(vec![coin("old", 1)])));

        assert_eq!(app.coins[0].id, "old");
    }

    #[test]
    fn test_discard_stale_drops_older_generation() {
        let config = Config {
            discard_stale: true,
            ..Config::default()
        };
        let mut app = App::new(&config);
        app.apply_fetch_event(started(1));
        app.apply_fetch_event(started(2));
        app.apply_fetch_event(finished(2, Ok(vec![coin("new", 1)])));
        app.apply_fetch_event(finished(1, Ok(vec![coin("old", 1)])));

        assert_eq!(app.coins[0].id, "new");
        assert!(!app.is_loading);
    }

    #[test]
    fn test_currency_selection() {
        let mut app = App::new(&Config::default());
        app.toggle_dropdown();
        assert!(app.is_dropdown_open());

        app.dropdown_down();
        app.dropdown_down();
        assert_eq!(app.highlighted_currency(), Currency::Ars);

        assert!(app.select_currency(Currency::Ars));
        assert!(!app.is_dropdown_open());
        assert_eq!(app.currency, Currency::Ars);

        // Même devise : pas de nouveau fetch
        assert!(!app.select_currency(Currency::Ars));
    }

    #[test]
    fn test_dropdown_navigation_is_bounded() {
        let mut app = App::new(&Config::default());
        app.toggle_dropdown();
        app.dropdown_up();
        assert_eq!(app.highlighted_currency(), Currency::Usd);

        for _ in 0..20 {
            app.dropdown_down();
        }
        assert_eq!(app.highlighted_currency(), Currency::Clp);
    }
}
