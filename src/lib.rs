// ============================================================================
// CoinWatch - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod api;     // API CoinGecko
pub mod app;     // État de l'application
pub mod config;  // Configuration et ligne de commande
pub mod format;  // Formatage des prix, pourcentages, capitalisations
pub mod models;  // Structures de données
pub mod refresh; // Fetchs et timer de rafraîchissement
pub mod ui;      // Interface utilisateur
