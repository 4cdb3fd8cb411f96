// ============================================================================
// API Client : CoinGecko
// ============================================================================
// Récupère le top 10 des cryptomonnaies par capitalisation
// (endpoint /api/v3/coins/markets)
//
// CONCEPTS RUST :
// 1. async/await : l'appel réseau ne bloque pas le thread
// 2. Result<T, FetchError> : chaque échec est classé (pas de panic)
// 3. serde_json::Value : on vérifie la forme avant de désérialiser
// ============================================================================

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use crate::api::error::FetchError;
use crate::api::source::MarketSource;
use crate::config::{Config, USER_AGENT};
use crate::models::{Coin, Currency};

// ============================================================================
// Source HTTP (reqwest)
// ============================================================================

/// Source de production : GET HTTP via reqwest
pub struct HttpMarketSource {
    client: reqwest::Client,
}

impl HttpMarketSource {
    /// Crée le client HTTP (timeout + User-Agent)
    ///
    /// CONCEPT : un seul client pour toute l'application
    /// - reqwest::Client garde un pool de connexions
    /// - Le recréer à chaque requête gaspillerait les connexions TLS
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| FetchError::internal(format!("création du client HTTP : {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl MarketSource for HttpMarketSource {
    async fn get_markets(&self, url: &str) -> Result<Value, FetchError> {
        debug!("Sending HTTP request to CoinGecko");
        let response = self.client.get(url).send().await?;

        let status = response.status();
        debug!(status = %status, "Received HTTP response");

        if !status.is_success() {
            error!(status = %status, "CoinGecko returned error status");
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;

        // Un corps non-JSON n'est pas une erreur de transport :
        // il sera rejeté plus loin comme "format inattendu"
        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!(error = %e, bytes = body.len(), "Response body is not JSON");
                Ok(Value::String(body))
            }
        }
    }

    fn source_name(&self) -> &'static str {
        "coingecko"
    }
}

// ============================================================================
// Fonctions publiques
// ============================================================================

/// Récupère le top des coins pour une devise
///
/// Un seul appel réseau par invocation. Le résultat remplace entièrement
/// la liste précédente, sans filtrage ni déduplication.
///
/// # Arguments
/// * `source` - Capacité HTTP (HttpMarketSource ou mock)
/// * `config` - Endpoint et taille de page
/// * `currency` - Devise de cotation
#[instrument(skip(source, config), fields(market_source = source.source_name()))]
pub async fn fetch_top_coins(
    source: &dyn MarketSource,
    config: &Config,
    currency: Currency,
) -> Result<Vec<Coin>, FetchError> {
    let url = build_markets_url(&config.endpoint, currency, config.per_page);
    debug!(url = %url, "Built CoinGecko markets URL");

    let body = source.get_markets(&url).await?;
    let coins = parse_markets(body)?;

    info!(coins = coins.len(), "Successfully fetched market data");
    Ok(coins)
}

/// Construit l'URL /coins/markets
///
/// Tri par capitalisation décroissante, page 1, sans sparkline,
/// avec la variation 24h.
pub fn build_markets_url(endpoint: &str, currency: Currency, per_page: u32) -> String {
    format!(
        "{}?vs_currency={}&order=market_cap_desc&per_page={}&page=1&sparkline=false&price_change_percentage=24h",
        endpoint,
        currency.api_code(),
        per_page
    )
}

/// Valide la forme de la réponse puis la convertit en Vec<Coin>
///
/// - Pas une liste → FetchError::UnexpectedShape
/// - Liste dont un élément n'est pas un coin → FetchError::Internal
fn parse_markets(body: Value) -> Result<Vec<Coin>, FetchError> {
    match body {
        Value::Array(items) => {
            serde_json::from_value(Value::Array(items)).map_err(|e| {
                error!(error = %e, "Failed to decode market records");
                FetchError::internal(e.to_string())
            })
        }
        other => {
            error!(kind = value_kind(&other), "CoinGecko response is not an array");
            Err(FetchError::UnexpectedShape)
        }
    }
}

/// Nom du type JSON (pour les logs)
fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::source::mock::MockSource;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn sample_markets() -> Value {
        json!([
            {
                "id": "bitcoin", "symbol": "btc", "name": "Bitcoin",
                "image": "https://example.invalid/btc.png",
                "current_price": 67000.0, "market_cap": 1.3e12,
                "market_cap_rank": 1, "price_change_percentage_24h": 1.5
            },
            {
                "id": "ethereum", "symbol": "eth", "name": "Ethereum",
                "image": "https://example.invalid/eth.png",
                "current_price": 3500.0, "market_cap": 4.2e11,
                "market_cap_rank": 2, "price_change_percentage_24h": -0.8
            }
        ])
    }

    /// Serveur HTTP minimal : répond une fois avec `status_line` et `body`,
    /// puis renvoie la ligne de requête reçue
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let mut request = Vec::new();
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                request.extend_from_slice(&buf[..n]);
                if n == 0 || request.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();

            String::from_utf8_lossy(&request)
                .lines()
                .next()
                .unwrap_or_default()
                .to_string()
        });

        (format!("http://{}/api/v3/coins/markets", addr), handle)
    }

    fn config_for(endpoint: &str) -> Config {
        Config {
            endpoint: endpoint.to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn test_build_markets_url() {
        let url = build_markets_url("https://api.coingecko.com/api/v3/coins/markets", Currency::Eur, 10);
        assert!(url.starts_with("https://api.coingecko.com/api/v3/coins/markets?"));
        assert!(url.contains("vs_currency=eur"));
        assert!(url.contains("order=market_cap_desc"));
        assert!(url.contains("per_page=10"));
        assert!(url.contains("page=1"));
        assert!(url.contains("sparkline=false"));
        assert!(url.contains("price_change_percentage=24h"));
    }

    #[tokio::test]
    async fn test_every_currency_is_requested_and_array_becomes_records() {
        let source = MockSource::new();
        for currency in Currency::ALL {
            source.respond(currency.api_code(), Ok(sample_markets()));
        }

        let config = Config::default();
        for currency in Currency::ALL {
            let coins = fetch_top_coins(&source, &config, currency).await.unwrap();
            let expected: Vec<Coin> = serde_json::from_value(sample_markets()).unwrap();
            assert_eq!(coins, expected);

            let last = source.requests().pop().unwrap();
            assert!(last.contains(&format!("vs_currency={}", currency.api_code())));
        }
        assert_eq!(source.call_count(), Currency::ALL.len());
    }

    #[tokio::test]
    async fn test_non_array_body_is_unexpected_shape() {
        let source = MockSource::new();
        source.respond("usd", Ok(json!({ "status": { "error_code": 0 } })));

        let result = fetch_top_coins(&source, &Config::default(), Currency::Usd).await;
        assert_eq!(result, Err(FetchError::UnexpectedShape));
    }

    #[tokio::test]
    async fn test_invalid_record_is_internal_error() {
        let source = MockSource::new();
        source.respond("usd", Ok(json!([{ "symbol": "btc" }])));

        match fetch_top_coins(&source, &Config::default(), Currency::Usd).await {
            Err(FetchError::Internal(detail)) => assert!(detail.contains("missing field")),
            other => panic!("expected internal error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_http_source_reads_array() {
        let (endpoint, server) = serve_once(
            "200 OK",
            r#"[{"id":"bitcoin","symbol":"btc","name":"Bitcoin","image":"","current_price":0.5,"market_cap":999,"market_cap_rank":1,"price_change_percentage_24h":null}]"#,
        )
        .await;
        let config = config_for(&endpoint);
        let source = HttpMarketSource::new(&config).unwrap();

        let coins = fetch_top_coins(&source, &config, Currency::Clp).await.unwrap();
        assert_eq!(coins.len(), 1);
        assert_eq!(coins[0].current_price, Some(0.5));

        let request_line = server.await.unwrap();
        assert!(request_line.starts_with("GET /api/v3/coins/markets?vs_currency=clp"));
    }

    #[tokio::test]
    async fn test_http_status_429_is_reported_with_code() {
        let (endpoint, _server) = serve_once("429 Too Many Requests", r#"{"status":{"error_code":429}}"#).await;
        let config = config_for(&endpoint);
        let source = HttpMarketSource::new(&config).unwrap();

        let err = fetch_top_coins(&source, &config, Currency::Usd).await.unwrap_err();
        assert_eq!(err, FetchError::Status { status: 429 });
        assert!(err.to_string().contains("429"));
    }

    #[tokio::test]
    async fn test_http_non_json_body_is_unexpected_shape() {
        let (endpoint, _server) = serve_once("200 OK", "<html>maintenance</html>").await;
        let config = config_for(&endpoint);
        let source = HttpMarketSource::new(&config).unwrap();

        let err = fetch_top_coins(&source, &config, Currency::Usd).await.unwrap_err();
        assert_eq!(err, FetchError::UnexpectedShape);
    }

    #[tokio::test]
    async fn test_connection_refused_is_connectivity_error() {
        // Réserve un port puis le libère : plus personne n'écoute dessus
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = config_for(&format!("http://{}/api/v3/coins/markets", addr));
        let source = HttpMarketSource::new(&config).unwrap();

        let err = fetch_top_coins(&source, &config, Currency::Usd).await.unwrap_err();
        assert!(matches!(err, FetchError::Connection { .. }), "got {:?}", err);
        assert!(!err.to_string().contains("code"));
    }
}
