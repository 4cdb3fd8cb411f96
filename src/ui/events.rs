// ============================================================================
// Gestion des événements
// ============================================================================
// Gère les événements clavier, souris et les ticks de l'application
//
// CONCEPTS RUST :
// 1. Enums avec variants : représenter différents types d'événements
// 2. Error handling avec Result
// 3. matches! : pattern matching qui retourne un bool
// ============================================================================

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent,
    MouseEventKind,
};

use crate::models::SortField;

// ============================================================================
// Enum Event
// ============================================================================

/// Événements de l'application
#[derive(Debug, Clone)]
pub enum Event {
    /// Touche pressée
    Key(KeyEvent),

    /// Événement souris (clic, scroll...)
    Mouse(MouseEvent),

    /// Tick régulier (pas d'entrée utilisateur pendant le poll)
    Tick,
}

/// Gestionnaire d'événements
pub struct EventHandler {
    /// Durée max d'attente d'un événement avant de renvoyer Tick
    tick_rate: Duration,
}

impl EventHandler {
    /// Crée un nouveau gestionnaire d'événements (tick de 250ms)
    pub fn new() -> Self {
        Self {
            tick_rate: Duration::from_millis(250),
        }
    }

    /// Lit le prochain événement (bloquant avec timeout)
    ///
    /// CONCEPT : Non-blocking I/O avec timeout
    /// - poll(timeout) attend max tick_rate
    /// - Si pas d'événement, retourne Ok(Event::Tick)
    /// - Le tick permet à la boucle de lire les résultats des fetchs
    pub fn next(&self) -> Result<Event> {
        if event::poll(self.tick_rate)? {
            match event::read()? {
                // Sur certains OS, on reçoit Press ET Release
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Ok(Event::Key(key)),
                CrosstermEvent::Mouse(mouse) => Ok(Event::Mouse(mouse)),

                // Release, resize, focus, paste : le prochain draw suffit
                _ => Ok(Event::Tick),
            }
        } else {
            Ok(Event::Tick)
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Helpers : Convertir un Event en action
// ============================================================================

/// Vérifie si l'événement est la touche 'q' (quitter)
pub fn is_quit_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
    } else {
        false
    }
}

/// Vérifie si l'événement est Échap
pub fn is_escape_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Esc)
    } else {
        false
    }
}

/// Vérifie si l'événement est Entrée
pub fn is_enter_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Enter)
    } else {
        false
    }
}

/// Vérifie si l'événement est la flèche vers le haut ou 'k' (vim)
pub fn is_up_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K'))
    } else {
        false
    }
}

/// Vérifie si l'événement est la flèche vers le bas ou 'j' (vim)
pub fn is_down_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J'))
    } else {
        false
    }
}

/// Vérifie si l'événement ouvre/ferme le menu des devises (Tab ou 'm')
pub fn is_dropdown_toggle_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::Tab | KeyCode::Char('m') | KeyCode::Char('M'))
    } else {
        false
    }
}

/// Vérifie si l'événement est un rafraîchissement manuel (F5 ou 'R')
pub fn is_refresh_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        matches!(key.code, KeyCode::F(5) | KeyCode::Char('R'))
    } else {
        false
    }
}

/// Colonne de tri demandée au clavier
///
/// - '1' / 'r' : rang
/// - '2' / 'p' : prix
/// - '3' / 'c' : variation 24h
pub fn sort_field_from_event(event: &Event) -> Option<SortField> {
    if let Event::Key(key) = event {
        match key.code {
            KeyCode::Char('1') | KeyCode::Char('r') => Some(SortField::Rank),
            KeyCode::Char('2') | KeyCode::Char('p') | KeyCode::Char('P') => Some(SortField::Price),
            KeyCode::Char('3') | KeyCode::Char('c') | KeyCode::Char('C') => Some(SortField::Change24h),
            _ => None,
        }
    } else {
        None
    }
}

/// Position (colonne, ligne) d'un clic gauche
pub fn left_click_position(event: &Event) -> Option<(u16, u16)> {
    match event {
        Event::Mouse(mouse) if matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) => {
            Some((mouse.column, mouse.row))
        }
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::empty()))
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::empty(),
        })
    }

    #[test]
    fn test_is_quit_event() {
        assert!(is_quit_event(&key(KeyCode::Char('q'))));
        assert!(!is_quit_event(&key(KeyCode::Char('a'))));
        assert!(!is_quit_event(&Event::Tick));
    }

    #[test]
    fn test_sort_field_from_event() {
        assert_eq!(sort_field_from_event(&key(KeyCode::Char('1'))), Some(SortField::Rank));
        assert_eq!(sort_field_from_event(&key(KeyCode::Char('p'))), Some(SortField::Price));
        assert_eq!(sort_field_from_event(&key(KeyCode::Char('3'))), Some(SortField::Change24h));
        assert_eq!(sort_field_from_event(&key(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_refresh_is_uppercase_r_only() {
        assert!(is_refresh_event(&key(KeyCode::Char('R'))));
        assert!(is_refresh_event(&key(KeyCode::F(5))));
        assert!(!is_refresh_event(&key(KeyCode::Char('r'))));
    }

    #[test]
    fn test_left_click_position() {
        let click = mouse(MouseEventKind::Down(MouseButton::Left), 12, 4);
        assert_eq!(left_click_position(&click), Some((12, 4)));

        let right = mouse(MouseEventKind::Down(MouseButton::Right), 12, 4);
        assert_eq!(left_click_position(&right), None);
        assert_eq!(left_click_position(&mouse(MouseEventKind::Moved, 1, 1)), None);
    }
}
