// ============================================================================
// Configuration
// ============================================================================
// Valeurs par défaut de l'application, surchargeables en ligne de commande
//
// CONCEPTS RUST :
// 1. Constantes : valeurs connues à la compilation
// 2. clap derive : le parsing des arguments est généré depuis la struct
// 3. Séparation Cli (entrée utilisateur) / Config (valeurs utilisées)
// ============================================================================

use std::time::Duration;

use clap::Parser;

use crate::models::Currency;

/// Endpoint CoinGecko des marchés
pub const COINGECKO_MARKETS_URL: &str = "https://api.coingecko.com/api/v3/coins/markets";

/// Période de rafraîchissement automatique (1 minute)
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(60_000);

/// Nombre de coins affichés (top 10)
pub const PAGE_SIZE: u32 = 10;

/// Timeout des requêtes HTTP
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// User-Agent envoyé à CoinGecko
pub const USER_AGENT: &str = concat!("coinwatch/", env!("CARGO_PKG_VERSION"));

/// Configuration effective de l'application
#[derive(Debug, Clone)]
pub struct Config {
    /// URL de l'endpoint /coins/markets
    pub endpoint: String,

    /// Période du timer de rafraîchissement
    pub refresh_interval: Duration,

    /// Taille de page demandée à l'API
    pub per_page: u32,

    /// Timeout HTTP
    pub http_timeout: Duration,

    /// Devise sélectionnée au démarrage
    pub initial_currency: Currency,

    /// Ignore les résultats d'un fetch plus ancien que le dernier appliqué
    ///
    /// false : le dernier fetch à terminer gagne, même s'il a été lancé
    /// avant un changement de devise.
    pub discard_stale: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: COINGECKO_MARKETS_URL.to_string(),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            per_page: PAGE_SIZE,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            initial_currency: Currency::default(),
            discard_stale: false,
        }
    }
}

/// Arguments de la ligne de commande
#[derive(Debug, Parser)]
#[command(name = "coinwatch", version, about = "Top 10 des cryptomonnaies dans le terminal")]
pub struct Cli {
    /// Devise initiale (usd, eur, ars, cop, mxn, uyu, clp)
    #[arg(short, long, default_value = "usd")]
    pub currency: Currency,

    /// Période de rafraîchissement en secondes
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u64).range(1..))]
    pub refresh_secs: u64,

    /// Endpoint /coins/markets (utile pour un proxy ou un mock)
    #[arg(long, default_value = COINGECKO_MARKETS_URL)]
    pub endpoint: String,

    /// Timeout HTTP en secondes
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    /// Ignore les réponses d'anciennes requêtes arrivées en retard
    #[arg(long)]
    pub discard_stale: bool,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Self {
            endpoint: cli.endpoint,
            refresh_interval: Duration::from_secs(cli.refresh_secs),
            per_page: PAGE_SIZE,
            http_timeout: Duration::from_secs(cli.timeout_secs),
            initial_currency: cli.currency,
            discard_stale: cli.discard_stale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_match_config_defaults() {
        let config = Config::from(Cli::parse_from(["coinwatch"]));
        let defaults = Config::default();

        assert_eq!(config.endpoint, defaults.endpoint);
        assert_eq!(config.refresh_interval, defaults.refresh_interval);
        assert_eq!(config.http_timeout, defaults.http_timeout);
        assert_eq!(config.initial_currency, Currency::Usd);
        assert!(!config.discard_stale);
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "coinwatch",
            "--currency",
            "ARS",
            "--refresh-secs",
            "15",
            "--discard-stale",
        ]);
        let config = Config::from(cli);

        assert_eq!(config.initial_currency, Currency::Ars);
        assert_eq!(config.refresh_interval, Duration::from_secs(15));
        assert!(config.discard_stale);
    }

    #[test]
    fn test_cli_rejects_unknown_currency() {
        assert!(Cli::try_parse_from(["coinwatch", "--currency", "btc"]).is_err());
    }
}
