// ============================================================================
// Contrôleur de rafraîchissement
// ============================================================================
// Possède le cycle de vie des fetchs :
// - un fetch au démarrage
// - un fetch à chaque changement de devise
// - un fetch à chaque tick du timer (60 s par défaut)
//
// Les résultats partent vers la boucle UI par un channel mpsc, la boucle
// les lit avec try_recv() sans jamais bloquer.
//
// CONCEPTS RUST :
// 1. tokio::spawn : chaque fetch est une tâche indépendante
// 2. JoinHandle::abort() : arrêt déterministe du timer
// 3. Drop : le timer est désarmé même si on oublie shutdown()
// 4. AtomicU64 : compteur de génération partagé sans Mutex
// ============================================================================

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc, Mutex, PoisonError};

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::api::{fetch_top_coins, FetchError, MarketSource};
use crate::config::Config;
use crate::models::{Coin, Currency};

/// Numéro d'un cycle de fetch (strictement croissant)
pub type Generation = u64;

/// Événements envoyés à la boucle UI
#[derive(Debug)]
pub enum FetchEvent {
    /// Un cycle commence : effacer l'erreur, afficher le chargement
    Started {
        generation: Generation,
        currency: Currency,
    },

    /// Un cycle est terminé, quelle que soit l'issue
    Finished {
        generation: Generation,
        currency: Currency,
        result: Result<Vec<Coin>, FetchError>,
    },
}

/// Origine d'un fetch (pour les logs)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchReason {
    Initial,
    Timer,
    CurrencyChange,
    Manual,
}

// ============================================================================
// Contexte partagé entre le contrôleur, le timer et les tâches de fetch
// ============================================================================

struct FetchContext {
    source: Arc<dyn MarketSource>,
    config: Config,
    currency: Mutex<Currency>,
    generation: AtomicU64,
    events: mpsc::Sender<FetchEvent>,
}

impl FetchContext {
    fn current_currency(&self) -> Currency {
        *self.currency.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Lance un cycle de fetch dans une nouvelle tâche
    ///
    /// Les cycles ne s'attendent pas entre eux : deux fetchs peuvent être
    /// en vol en même temps.
    fn spawn_fetch(self: &Arc<Self>, handle: &Handle, reason: FetchReason) -> Generation {
        let currency = self.current_currency();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(generation, ?reason, %currency, "Spawning fetch cycle");

        let ctx = Arc::clone(self);
        handle.spawn(async move {
            ctx.run_fetch(generation, currency).await;
        });

        generation
    }

    async fn run_fetch(&self, generation: Generation, currency: Currency) {
        let _ = self.events.send(FetchEvent::Started {
            generation,
            currency,
        });

        let mut guard = FinishGuard {
            events: self.events.clone(),
            generation,
            currency,
            result: None,
        };

        let result = fetch_top_coins(self.source.as_ref(), &self.config, currency).await;
        guard.result = Some(result);
    }
}

/// Publie FetchEvent::Finished sur tous les chemins de sortie
///
/// Si la tâche panique avant d'avoir un résultat, le Drop s'exécute
/// pendant l'unwinding et publie FetchError::Unclassified.
struct FinishGuard {
    events: mpsc::Sender<FetchEvent>,
    generation: Generation,
    currency: Currency,
    result: Option<Result<Vec<Coin>, FetchError>>,
}

impl Drop for FinishGuard {
    fn drop(&mut self) {
        let result = self.result.take().unwrap_or_else(|| {
            warn!(generation = self.generation, "Fetch cycle ended without a result");
            Err(FetchError::Unclassified)
        });

        // Le récepteur peut déjà être fermé (application en cours d'arrêt)
        let _ = self.events.send(FetchEvent::Finished {
            generation: self.generation,
            currency: self.currency,
            result,
        });
    }
}

// ============================================================================
// RefreshController
// ============================================================================

/// Pilote les fetchs et le timer de rafraîchissement
pub struct RefreshController {
    handle: Handle,
    ctx: Arc<FetchContext>,
    timer: Option<JoinHandle<()>>,
}

impl RefreshController {
    /// Démarre le contrôleur : un fetch immédiat, puis le timer
    ///
    /// # Arguments
    /// * `handle` - Runtime tokio sur lequel tournent timer et fetchs
    /// * `source` - Capacité HTTP
    /// * `config` - Période, endpoint, devise initiale
    /// * `events` - Channel vers la boucle UI
    pub fn start(
        handle: Handle,
        source: Arc<dyn MarketSource>,
        config: Config,
        events: mpsc::Sender<FetchEvent>,
    ) -> Self {
        let ctx = Arc::new(FetchContext {
            source,
            currency: Mutex::new(config.initial_currency),
            config,
            generation: AtomicU64::new(0),
            events,
        });

        let mut controller = Self {
            handle,
            ctx,
            timer: None,
        };

        controller.ctx.spawn_fetch(&controller.handle, FetchReason::Initial);
        controller.arm_timer();
        controller
    }

    /// Arme le timer : premier tick une période après le démarrage
    fn arm_timer(&mut self) {
        let period = self.ctx.config.refresh_interval;
        let ctx = Arc::clone(&self.ctx);
        let handle = self.handle.clone();

        info!(period_ms = period.as_millis() as u64, "Arming refresh timer");
        self.timer = Some(self.handle.spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                ctx.spawn_fetch(&handle, FetchReason::Timer);
            }
        }));
    }

    /// Change de devise et lance un fetch immédiatement
    ///
    /// Le timer garde son rythme d'origine.
    pub fn select_currency(&self, currency: Currency) -> Generation {
        *self.ctx.currency.lock().unwrap_or_else(PoisonError::into_inner) = currency;
        info!(%currency, "Currency changed, fetching now");
        self.ctx.spawn_fetch(&self.handle, FetchReason::CurrencyChange)
    }

    /// Rafraîchissement manuel (touche R / F5)
    pub fn refresh_now(&self) -> Generation {
        self.ctx.spawn_fetch(&self.handle, FetchReason::Manual)
    }

    /// Devise utilisée par les prochains fetchs
    pub fn currency(&self) -> Currency {
        self.ctx.current_currency()
    }

    /// Vérifie si le timer tourne encore
    pub fn is_armed(&self) -> bool {
        self.timer.as_ref().map(|t| !t.is_finished()).unwrap_or(false)
    }

    /// Désarme le timer
    ///
    /// Les fetchs déjà en vol se terminent normalement.
    pub fn shutdown(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
            info!("Refresh timer disarmed");
        }
    }
}

impl Drop for RefreshController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// ============================================================================
// Tests
// ============================================================================
