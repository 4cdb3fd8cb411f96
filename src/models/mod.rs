// ============================================================================
// Module : models
// ============================================================================
// Ce module contient toutes les structures de données de l'application
//
// CONCEPT RUST : Modules et visibilité
// - "pub mod" : déclare un sous-module publique (accessible depuis l'extérieur)
// - Sans "pub", le module serait privé au crate
// ============================================================================

pub mod coin;     // Enregistrement CoinGecko (coin.rs)
pub mod currency; // Devises du sélecteur (currency.rs)
pub mod sort;     // État et moteur de tri (sort.rs)

// Re-export des structures principales pour simplifier les imports
pub use coin::Coin;
pub use currency::Currency;
pub use sort::{sort_coins, SortDirection, SortField, SortState};
