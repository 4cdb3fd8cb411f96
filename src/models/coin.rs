// ============================================================================
// Structure : Coin
// ============================================================================
// Instantané de marché d'une cryptomonnaie tel que retourné par CoinGecko
// (endpoint /coins/markets)
//
// CONCEPTS RUST :
// 1. #[derive(Deserialize)] : serde génère le parsing JSON
// 2. Option<T> : l'API peut renvoyer null pour certains champs
// 3. #[serde(default)] : valeur par défaut si le champ est absent
// ============================================================================

use serde::{Deserialize, Serialize};

/// Une cryptomonnaie du top 10 par capitalisation
///
/// Les noms de champs correspondent exactement au JSON de CoinGecko,
/// pas besoin de #[serde(rename)].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    /// Identifiant unique (ex: "bitcoin")
    pub id: String,

    /// Ticker affiché (ex: "btc")
    pub symbol: String,

    /// Nom complet (ex: "Bitcoin")
    pub name: String,

    /// URL du logo (conservée, non dessinée dans le terminal)
    #[serde(default)]
    pub image: String,

    /// Prix actuel dans la devise demandée
    /// None si l'API renvoie null
    pub current_price: Option<f64>,

    /// Rang par capitalisation (1 = plus grosse)
    pub market_cap_rank: u32,

    /// Variation sur 24h en pourcentage
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,

    /// Capitalisation de marché
    #[serde(default, deserialize_with = "null_as_zero")]
    pub market_cap: f64,
}

/// CoinGecko renvoie parfois `"market_cap": null`
fn null_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

impl Coin {
    /// Prix actuel, 0 si absent
    pub fn price_or_zero(&self) -> f64 {
        self.current_price.unwrap_or(0.0)
    }

    /// Variation 24h, 0 si absente
    pub fn change_or_zero(&self) -> f64 {
        self.price_change_percentage_24h.unwrap_or(0.0)
    }

    /// Retourne true si la variation 24h est positive ou nulle
    ///
    /// Une variation absente compte comme 0, donc "positive".
    pub fn is_positive(&self) -> bool {
        self.change_or_zero() >= 0.0
    }

    /// Ticker en majuscules pour l'affichage (ex: "BTC")
    pub fn display_symbol(&self) -> String {
        self.symbol.to_uppercase()
    }
}

// ============================================================================
// Tests
// ============================================================================
