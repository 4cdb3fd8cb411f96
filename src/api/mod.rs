// ============================================================================
// Module : api
// ============================================================================
// Ce module contient le client de l'API de marché (CoinGecko) et la
// classification des erreurs de récupération
// ============================================================================

pub mod coingecko; // Client API CoinGecko
pub mod error;     // FetchError
pub mod source;    // Trait MarketSource

// Re-export des éléments principaux
pub use coingecko::{fetch_top_coins, HttpMarketSource};
pub use error::FetchError;
pub use source::MarketSource;
