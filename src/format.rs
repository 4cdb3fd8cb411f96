// ============================================================================
// Formatage des valeurs affichées
// ============================================================================
// Fonctions pures : nombre brut -> chaîne prête à afficher
//
// Les chaînes imitent la locale en-US (séparateur de milliers ",",
// séparateur décimal ".") quelle que soit la devise choisie.
// ============================================================================

use crate::models::Currency;

const TRILLION: f64 = 1_000_000_000_000.0;
const BILLION: f64 = 1_000_000_000.0;
const MILLION: f64 = 1_000_000.0;

/// Formate un prix dans la devise sélectionnée
///
/// - 2 décimales en temps normal
/// - 6 décimales sous 1 unité (ex: les memecoins à 0.000012 $)
/// - un prix absent est affiché comme 0
///
/// # Exemple
/// format_price(Some(1234.5), Currency::Usd) == "$1,234.50"
pub fn format_price(price: Option<f64>, currency: Currency) -> String {
    let price = price.unwrap_or(0.0);
    let decimals = if price < 1.0 { 6 } else { 2 };
    let number = group_thousands(&format!("{:.*}", decimals, price.abs()));
    let sign = if price < 0.0 { "-" } else { "" };

    format!("{}{}{}", sign, currency.prefix(), number)
}

/// Formate une variation en pourcentage : "-3.46%"
pub fn format_percentage(percentage: Option<f64>) -> String {
    format!("{:.2}%", percentage.unwrap_or(0.0))
}

/// Variante avec signe explicite : "+1.20%" / "-3.46%"
///
/// Le "+" est ajouté quand la valeur est positive ou nulle.
pub fn format_signed_percentage(percentage: Option<f64>) -> String {
    let value = percentage.unwrap_or(0.0);
    let sign = if value >= 0.0 { "+" } else { "" };
    format!("{}{}", sign, format_percentage(percentage))
}

/// Formate une capitalisation : 2.50T, 812.34B, 15.00M ou 999
pub fn format_market_cap(market_cap: f64) -> String {
    if market_cap >= TRILLION {
        format!("{:.2}T", market_cap / TRILLION)
    } else if market_cap >= BILLION {
        format!("{:.2}B", market_cap / BILLION)
    } else if market_cap >= MILLION {
        format!("{:.2}M", market_cap / MILLION)
    } else {
        format_plain_number(market_cap)
    }
}

/// Nombre "brut" en en-US : groupé par milliers, 3 décimales max,
/// zéros finaux supprimés (comme Number.toLocaleString)
fn format_plain_number(value: f64) -> String {
    let fixed = format!("{:.3}", value.abs());
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    let sign = if value < 0.0 && trimmed != "0" { "-" } else { "" };
    format!("{}{}", sign, group_thousands(trimmed))
}

/// Insère des virgules tous les 3 chiffres dans la partie entière
///
/// CONCEPT RUST : split_once
/// - Sépare "1234567.89" en ("1234567", "89")
/// - None s'il n'y a pas de point
fn group_thousands(number: &str) -> String {
    let (integer, fraction) = match number.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (number, None),
    };

    let digits: Vec<char> = integer.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*digit);
    }

    match fraction {
        Some(f) => format!("{}.{}", grouped, f),
        None => grouped,
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
