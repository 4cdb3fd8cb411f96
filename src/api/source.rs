// ============================================================================
// Source de données de marché
// ============================================================================
// Abstraction de "faire un GET et récupérer du JSON"
//
// CONCEPT RUST : Trait async
// - async-trait permet des méthodes async dans un trait
// - Send + Sync : la source est partagée entre tâches tokio (Arc<dyn ...>)
// - En production : HttpMarketSource (reqwest), en test : MockSource
// ============================================================================

use async_trait::async_trait;

use crate::api::error::FetchError;

/// Capacité HTTP utilisée par le fetcher
#[async_trait]
pub trait MarketSource: Send + Sync {
    /// Exécute un GET sur `url` et retourne le corps de la réponse
    ///
    /// Un corps qui n'est pas du JSON est retourné en Value::String
    /// (c'est au fetcher de décider que ce n'est pas une liste).
    async fn get_markets(&self, url: &str) -> Result<serde_json::Value, FetchError>;

    /// Nom de la source (pour les logs)
    fn source_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Réponse programmée pour une devise
    #[derive(Clone)]
    enum Route {
        Respond {
            delay: Duration,
            response: Result<serde_json::Value, FetchError>,
        },
        Panic,
    }

    /// Source factice : répond selon le paramètre vs_currency de l'URL
    #[derive(Default)]
    pub struct MockSource {
        routes: Mutex<HashMap<String, Route>>,
        requests: Mutex<Vec<String>>,
    }

    impl MockSource {
        pub fn new() -> Self {
            Self::default()
        }

        /// Programme une réponse (immédiate) pour une devise ("usd", "eur"...)
        pub fn respond(&self, currency: &str, response: Result<serde_json::Value, FetchError>) {
            self.respond_after(currency, Duration::ZERO, response);
        }

        /// Programme une réponse qui arrive après `delay`
        pub fn respond_after(
            &self,
            currency: &str,
            delay: Duration,
            response: Result<serde_json::Value, FetchError>,
        ) {
            self.routes
                .lock()
                .unwrap()
                .insert(currency.to_string(), Route::Respond { delay, response });
        }

        /// La requête pour cette devise fait paniquer la tâche
        pub fn panic_on(&self, currency: &str) {
            self.routes
                .lock()
                .unwrap()
                .insert(currency.to_string(), Route::Panic);
        }

        /// URLs demandées, dans l'ordre
        pub fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    fn currency_of(url: &str) -> Option<&str> {
        url.split(['?', '&'])
            .find_map(|param| param.strip_prefix("vs_currency="))
    }

    #[async_trait]
    impl MarketSource for MockSource {
        async fn get_markets(&self, url: &str) -> Result<serde_json::Value, FetchError> {
            self.requests.lock().unwrap().push(url.to_string());

            let route = currency_of(url)
                .and_then(|c| self.routes.lock().unwrap().get(c).cloned());

            match route {
                Some(Route::Respond { delay, response }) => {
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    response
                }
                Some(Route::Panic) => panic!("mock source asked to panic for {}", url),
                None => Err(FetchError::connection(format!("no mock route for {}", url))),
            }
        }

        fn source_name(&self) -> &'static str {
            "mock"
        }
    }
}
