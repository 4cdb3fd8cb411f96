// ============================================================================
// Enum : Currency
// ============================================================================
// Devises proposées dans le sélecteur (paramètre vs_currency de CoinGecko)
//
// CONCEPT RUST : Enums "C-like" + Copy
// - Pas de données associées, donc Copy est gratuit
// - ALL permet d'itérer dans l'ordre du menu
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Devise de cotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    /// Dollar américain (devise de base)
    #[default]
    Usd,
    Eur,
    Ars,
    Cop,
    Mxn,
    Uyu,
    Clp,
}

impl Currency {
    /// Toutes les devises, dans l'ordre d'affichage du menu
    pub const ALL: [Currency; 7] = [
        Currency::Usd,
        Currency::Eur,
        Currency::Ars,
        Currency::Cop,
        Currency::Mxn,
        Currency::Uyu,
        Currency::Clp,
    ];

    /// Code envoyé à l'API (minuscules, ex: "usd")
    pub fn api_code(&self) -> &'static str {
        match self {
            Currency::Usd => "usd",
            Currency::Eur => "eur",
            Currency::Ars => "ars",
            Currency::Cop => "cop",
            Currency::Mxn => "mxn",
            Currency::Uyu => "uyu",
            Currency::Clp => "clp",
        }
    }

    /// Code ISO 4217 (majuscules, ex: "USD")
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Ars => "ARS",
            Currency::Cop => "COP",
            Currency::Mxn => "MXN",
            Currency::Uyu => "UYU",
            Currency::Clp => "CLP",
        }
    }

    /// Libellé affiché dans le sélecteur
    pub fn label(&self) -> &'static str {
        match self {
            Currency::Usd => "Dollar US (USD)",
            Currency::Eur => "Euro (EUR)",
            Currency::Ars => "Peso argentin (ARS)",
            Currency::Cop => "Peso colombien (COP)",
            Currency::Mxn => "Peso mexicain (MXN)",
            Currency::Uyu => "Peso uruguayen (UYU)",
            Currency::Clp => "Peso chilien (CLP)",
        }
    }

    /// Préfixe monétaire en locale en-US
    ///
    /// Seules USD, EUR et MXN ont un symbole dédié en en-US,
    /// les autres sont préfixées par leur code ISO suivi d'un espace.
    pub fn prefix(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Mxn => "MX$",
            Currency::Ars => "ARS ",
            Currency::Cop => "COP ",
            Currency::Uyu => "UYU ",
            Currency::Clp => "CLP ",
        }
    }

    /// Position dans Currency::ALL
    pub fn index(&self) -> usize {
        Currency::ALL
            .iter()
            .position(|c| c == self)
            .unwrap_or(0)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = String;

    /// Accepte "usd", "USD", "Usd"...
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Currency::ALL
            .iter()
            .copied()
            .find(|c| c.api_code() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = Currency::ALL.iter().map(|c| c.api_code()).collect();
                format!("devise inconnue '{}' (attendu : {})", s, known.join(", "))
            })
    }
}
