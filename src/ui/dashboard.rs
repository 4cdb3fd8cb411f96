// ============================================================================
// Dashboard - Rendu de l'interface principale
// ============================================================================
// Dessine l'interface TUI en utilisant les widgets de ratatui
//
// CONCEPTS RATATUI :
// 1. Frame : surface de dessin
// 2. Widgets : composants UI (Block, Paragraph, Table, List...)
// 3. Clear : efface une zone avant de dessiner un popup par-dessus
// 4. Style : couleurs et attributs de texte
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table},
    Frame,
};

use crate::app::{App, ViewState};
use crate::format::{format_market_cap, format_price, format_signed_percentage};
use crate::models::{Coin, Currency, SortDirection, SortField, SortState};
use crate::ui::layout::{self, COLUMN_SPACING};

/// Dessine l'interface complète
///
/// # Arguments
/// * `frame` - Surface de dessin ratatui
/// * `app` - État de l'application
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.size();
    let regions = layout::regions(area);

    render_title(frame, app, regions.title);
    render_currency_button(frame, app, regions.currency_button);

    // CONCEPT RUST : Match sur enum pour router
    match app.view_state() {
        ViewState::Loading => render_loading(frame, regions.content),
        ViewState::Error(message) => render_error(frame, message, regions.content),
        ViewState::Table => render_table(frame, app, regions.content),
    }

    render_footer(frame, app, regions.footer);

    // Le menu se dessine en dernier, par-dessus le reste
    if app.is_dropdown_open() {
        render_dropdown(frame, app, layout::dropdown_area(area));
    }
}

// ============================================================================
// Header : titre + sélecteur de devise
// ============================================================================

/// Dessine le titre, avec un indicateur pendant un rafraîchissement
fn render_title(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" CoinWatch ")
        .title_alignment(Alignment::Center);

    let mut spans = vec![Span::styled(
        "📈 Top 10 des cryptomonnaies par capitalisation",
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    )];
    if app.is_loading && !app.coins.is_empty() {
        spans.push(Span::styled(
            "  ⟳ mise à jour...",
            Style::default().fg(Color::Yellow),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Dessine le bouton du sélecteur : "Dollar US (USD) ▼"
fn render_currency_button(frame: &mut Frame, app: &App, area: Rect) {
    let border_color = if app.is_dropdown_open() { Color::Yellow } else { Color::Cyan };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Devise [m] ");

    let arrow = if app.is_dropdown_open() { "▲" } else { "▼" };
    let line = Line::from(vec![
        Span::styled(app.currency.label(), Style::default().fg(Color::White)),
        Span::raw(" "),
        Span::styled(arrow, Style::default().fg(Color::Yellow)),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// Dessine le menu déroulant des devises
fn render_dropdown(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = Currency::ALL
        .iter()
        .enumerate()
        .map(|(index, currency)| {
            let mut style = if *currency == app.currency {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            if index == app.dropdown.highlighted {
                style = style.add_modifier(Modifier::REVERSED);
            }
            ListItem::new(format!(" {}", currency.label())).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );

    // CONCEPT RATATUI : Clear
    // - Efface les cellules sous le popup (sinon le tableau transparaît)
    frame.render_widget(Clear, area);
    frame.render_widget(list, area);
}

// ============================================================================
// Contenu principal
// ============================================================================

fn render_loading(frame: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Chargement des données...",
            Style::default().fg(Color::Gray).add_modifier(Modifier::SLOW_BLINK),
        )),
    ];

    let paragraph = Paragraph::new(text)
        .block(content_block())
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

fn render_error(frame: &mut Frame, message: &str, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Nouvel essai automatique à la prochaine mise à jour, ou [R] pour réessayer.",
            Style::default().fg(Color::Gray),
        )),
    ];

    let paragraph = Paragraph::new(text)
        .block(content_block().border_style(Style::default().fg(Color::Red)))
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Dessine le tableau trié
fn render_table(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(vec![
        Cell::from(header_label("#", SortField::Rank, app.sort)),
        Cell::from("Monnaie"),
        Cell::from(header_label("Prix", SortField::Price, app.sort)),
        Cell::from(header_label("Var. 24h", SortField::Change24h, app.sort)),
        Cell::from("Capitalisation"),
    ])
    .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    .height(1);

    let rows: Vec<Row> = app
        .sorted_coins()
        .iter()
        .map(|coin| coin_row(coin, app.currency))
        .collect();

    let widths = layout::column_widths(area).map(Constraint::Length);

    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(COLUMN_SPACING)
        .block(content_block());

    frame.render_widget(table, area);
}

/// Une ligne du tableau
///
/// Variation verte si ≥ 0 (absente compte comme 0), rouge sinon.
fn coin_row(coin: &Coin, currency: Currency) -> Row<'static> {
    let change_color = if coin.is_positive() { Color::Green } else { Color::Red };

    Row::new(vec![
        Cell::from(format!("{:>3}", coin.market_cap_rank))
            .style(Style::default().fg(Color::Gray)),
        Cell::from(Line::from(vec![
            Span::styled(coin.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" "),
            Span::styled(coin.display_symbol(), Style::default().fg(Color::DarkGray)),
        ])),
        Cell::from(format_price(coin.current_price, currency)),
        Cell::from(format_signed_percentage(coin.price_change_percentage_24h))
            .style(Style::default().fg(change_color).add_modifier(Modifier::BOLD)),
        Cell::from(format_market_cap(coin.market_cap)),
    ])
}

/// Libellé d'en-tête avec l'icône de tri
///
/// - ↕ : colonne triable inactive
/// - ▲ / ▼ : colonne active, ascendant / descendant
pub fn header_label(label: &str, field: SortField, sort: SortState) -> String {
    let icon = if sort.field != field {
        "↕"
    } else {
        match sort.direction {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    };
    format!("{} {}", label, icon)
}

fn content_block() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" 📊 Marché ")
}

// ============================================================================
// Footer : Instructions
// ============================================================================

/// Dessine le footer avec les raccourcis clavier et l'heure de mise à jour
fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let key_style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);

    let line = if app.is_awaiting_quit_confirmation() {
        Line::from(vec![
            Span::styled("⚠  Appuyez sur ", key_style),
            Span::styled(
                "[q]",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
            Span::styled(
                " à nouveau pour quitter, ou n'importe quelle autre touche pour annuler ⚠",
                key_style,
            ),
        ])
    } else {
        let updated = app
            .last_updated
            .map(|t| format!("Mis à jour à {} · chaque minute", t.format("%H:%M:%S")))
            .unwrap_or_else(|| "En attente des premières données".to_string());

        Line::from(vec![
            Span::styled("[q]", key_style),
            Span::raw(" Quitter  "),
            Span::styled("[1 2 3]", key_style),
            Span::raw(" Trier  "),
            Span::styled("[m]", key_style),
            Span::raw(" Devise  "),
            Span::styled("[R]", key_style),
            Span::raw(" Rafraîchir   "),
            Span::styled(updated, Style::default().fg(Color::DarkGray)),
            Span::styled("  · données CoinGecko", Style::default().fg(Color::DarkGray)),
        ])
    };

    let paragraph = Paragraph::new(line)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Tests
// ============================================================================
