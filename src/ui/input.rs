// ============================================================================
// Input : Traduire les événements en actions
// ============================================================================
// Modifie App selon l'événement, et retourne une commande quand un fetch
// doit être lancé (c'est main qui la transmet au RefreshController).
//
// CONCEPT RUST : Pattern matching avec guards
// - L'ordre des branches compte : la première qui matche gagne
// - Le menu ouvert capture le clavier avant tout le reste
// ============================================================================

use ratatui::layout::Rect;
use tracing::{debug, info};

use crate::app::App;
use crate::models::Currency;
use crate::ui::events::{
    is_down_event, is_dropdown_toggle_event, is_enter_event, is_escape_event, is_quit_event,
    is_refresh_event, is_up_event, left_click_position, sort_field_from_event, Event,
};
use crate::ui::layout;

/// Actions qui sortent de la boucle UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Nouvelle devise : fetch immédiat
    SelectCurrency(Currency),

    /// Rafraîchissement manuel
    Refresh,
}

/// Traite un événement et met à jour l'état de l'application
///
/// # Arguments
/// * `app` - État de l'application
/// * `event` - Événement clavier / souris / tick
/// * `area` - Taille du terminal au dernier rendu (pour les clics)
pub fn handle_event(app: &mut App, event: &Event, area: Rect) -> Option<AppCommand> {
    match event {
        Event::Key(_) if is_quit_event(event) => {
            // Two-step quit, même avec le menu ouvert
            if app.is_awaiting_quit_confirmation() {
                info!("User confirmed quit");
                app.quit();
            } else {
                info!("User requested quit (awaiting confirmation)");
                app.request_quit();
            }
            None
        }

        Event::Key(_) => {
            // Toute autre touche annule la confirmation de quit
            app.cancel_quit();
            if app.is_dropdown_open() {
                handle_dropdown_key(app, event)
            } else {
                handle_table_key(app, event)
            }
        }

        Event::Mouse(_) => {
            let (x, y) = left_click_position(event)?;
            app.cancel_quit();
            if app.is_dropdown_open() {
                handle_dropdown_click(app, area, x, y)
            } else {
                handle_table_click(app, area, x, y)
            }
        }

        Event::Tick => None,
    }
}

/// Clavier, menu des devises ouvert
fn handle_dropdown_key(app: &mut App, event: &Event) -> Option<AppCommand> {
    if is_up_event(event) {
        app.dropdown_up();
    } else if is_down_event(event) {
        app.dropdown_down();
    } else if is_enter_event(event) {
        return choose_currency(app, app.highlighted_currency());
    } else if is_escape_event(event) || is_dropdown_toggle_event(event) {
        debug!("Currency menu closed");
        app.close_dropdown();
    }
    None
}

/// Clavier, tableau au premier plan
fn handle_table_key(app: &mut App, event: &Event) -> Option<AppCommand> {
    if is_dropdown_toggle_event(event) {
        debug!("Currency menu opened");
        app.toggle_dropdown();
    } else if is_refresh_event(event) {
        info!("User requested manual refresh");
        return Some(AppCommand::Refresh);
    } else if let Some(field) = sort_field_from_event(event) {
        app.select_sort(field);
    }
    None
}

/// Clic, menu ouvert : un item le sélectionne, ailleurs le ferme
fn handle_dropdown_click(app: &mut App, area: Rect, x: u16, y: u16) -> Option<AppCommand> {
    if let Some(currency) = layout::dropdown_item_at(area, x, y) {
        return choose_currency(app, currency);
    }

    if !layout::contains(layout::dropdown_area(area), x, y) {
        debug!(x, y, "Click outside currency menu, closing it");
        app.close_dropdown();
    }
    None
}

/// Clic, menu fermé : bouton de devise ou en-tête de colonne
fn handle_table_click(app: &mut App, area: Rect, x: u16, y: u16) -> Option<AppCommand> {
    if layout::contains(layout::regions(area).currency_button, x, y) {
        app.toggle_dropdown();
    } else if let Some(field) = layout::header_field_at(area, x, y) {
        app.select_sort(field);
    }
    None
}

fn choose_currency(app: &mut App, currency: Currency) -> Option<AppCommand> {
    if app.select_currency(currency) {
        info!(%currency, "User selected currency");
        Some(AppCommand::SelectCurrency(currency))
    } else {
        debug!(%currency, "Currency unchanged");
        None
    }
}

// ============================================================================
// Tests
// ============================================================================
