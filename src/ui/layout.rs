// ============================================================================
// Layout : Découpage de l'écran
// ============================================================================
// Les zones sont calculées ici, à partir de la seule taille du terminal,
// pour que le rendu et la détection des clics utilisent les mêmes Rect.
// ============================================================================

use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::models::{Currency, SortField};

/// Largeur du bouton de sélection de devise
const CURRENCY_BUTTON_WIDTH: u16 = 30;

/// Espace entre deux colonnes du tableau (column_spacing de Table)
pub const COLUMN_SPACING: u16 = 1;

/// Largeurs fixes des colonnes : rang, prix, variation, capitalisation
/// La colonne "Monnaie" prend le reste.
const RANK_WIDTH: u16 = 6;
const PRICE_WIDTH: u16 = 20;
const CHANGE_WIDTH: u16 = 14;
const MARKET_CAP_WIDTH: u16 = 12;
const MIN_COIN_WIDTH: u16 = 10;

/// Zones principales de l'écran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Regions {
    /// Titre
    pub title: Rect,
    /// Bouton du sélecteur de devise
    pub currency_button: Rect,
    /// Tableau (bordure comprise)
    pub content: Rect,
    /// Raccourcis et heure de mise à jour
    pub footer: Rect,
}

/// Calcule les zones pour une taille de terminal
pub fn regions(area: Rect) -> Regions {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header : 3 lignes
            Constraint::Min(0),    // Content : tout le reste
            Constraint::Length(3), // Footer : 3 lignes
        ])
        .split(area);

    let header = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(CURRENCY_BUTTON_WIDTH),
        ])
        .split(rows[0]);

    Regions {
        title: header[0],
        currency_button: header[1],
        content: rows[1],
        footer: rows[2],
    }
}

/// Zone du menu déroulant, juste sous le bouton
///
/// Bordure + une ligne par devise, tronquée au bas du terminal.
pub fn dropdown_area(area: Rect) -> Rect {
    let button = regions(area).currency_button;
    let y = button.y + button.height;
    let wanted = Currency::ALL.len() as u16 + 2;
    let available = area.y + area.height - y.min(area.y + area.height);

    Rect {
        x: button.x,
        y,
        width: button.width,
        height: wanted.min(available),
    }
}

/// Devise sous le point (x, y) dans le menu déroulant
pub fn dropdown_item_at(area: Rect, x: u16, y: u16) -> Option<Currency> {
    let dropdown = dropdown_area(area);
    let inner = inner(dropdown);
    if !contains(inner, x, y) {
        return None;
    }
    Currency::ALL.get((y - inner.y) as usize).copied()
}

/// Largeurs des 5 colonnes pour une zone de tableau donnée
pub fn column_widths(table: Rect) -> [u16; 5] {
    let fixed = RANK_WIDTH + PRICE_WIDTH + CHANGE_WIDTH + MARKET_CAP_WIDTH + 4 * COLUMN_SPACING;
    let coin = inner(table).width.saturating_sub(fixed).max(MIN_COIN_WIDTH);
    [RANK_WIDTH, coin, PRICE_WIDTH, CHANGE_WIDTH, MARKET_CAP_WIDTH]
}

/// Colonne triable sous le point (x, y) de la ligne d'en-tête du tableau
///
/// La colonne "Monnaie" et la capitalisation ne sont pas triables.
pub fn header_field_at(area: Rect, x: u16, y: u16) -> Option<SortField> {
    let table = inner(regions(area).content);
    if table.height == 0 || y != table.y {
        return None;
    }

    let fields = [
        Some(SortField::Rank),
        None,
        Some(SortField::Price),
        Some(SortField::Change24h),
        None,
    ];

    let mut left = table.x;
    for (width, field) in column_widths(regions(area).content).iter().zip(fields) {
        if x >= left && x < left.saturating_add(*width) {
            return field;
        }
        left = left.saturating_add(*width + COLUMN_SPACING);
    }
    None
}

/// Zone intérieure d'un Block avec Borders::ALL
pub fn inner(rect: Rect) -> Rect {
    Rect {
        x: rect.x.saturating_add(1),
        y: rect.y.saturating_add(1),
        width: rect.width.saturating_sub(2),
        height: rect.height.saturating_sub(2),
    }
}

/// Le point (x, y) est-il dans le rectangle ?
pub fn contains(rect: Rect, x: u16, y: u16) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}
