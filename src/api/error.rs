// ============================================================================
// Erreurs de récupération des données
// ============================================================================
// Chaque échec d'un cycle de fetch tombe dans une de ces catégories.
// Le message (Display) est celui affiché tel quel à l'utilisateur.
//
// CONCEPT RUST : thiserror
// - #[derive(Error)] implémente std::error::Error
// - #[error("...")] génère Display, avec interpolation des champs
// ============================================================================

use thiserror::Error;

/// Échec d'un cycle de fetch
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// L'API a répondu avec un code HTTP d'erreur
    #[error("Erreur lors de l'appel à l'API (code : {status}). Vérifiez votre connexion ou réessayez plus tard.")]
    Status { status: u16 },

    /// Aucune réponse HTTP (DNS, connexion refusée, timeout...)
    ///
    /// Le détail n'est pas affiché, il part dans les logs.
    #[error("Erreur lors de l'appel à l'API. Vérifiez votre connexion ou réessayez plus tard.")]
    Connection { detail: String },

    /// Réponse reçue mais ce n'est pas une liste
    #[error("Erreur : format de données inattendu reçu de l'API.")]
    UnexpectedShape,

    /// Erreur interne (création du client, décodage d'un enregistrement...)
    #[error("Erreur interne de l'application : {0}")]
    Internal(String),

    /// Échec non classifié (la tâche de fetch a paniqué)
    #[error("Une erreur inattendue et non classifiée s'est produite lors du traitement des données.")]
    Unclassified,
}

impl FetchError {
    /// Crée une erreur Internal
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Crée une erreur Connection
    pub fn connection(detail: impl Into<String>) -> Self {
        Self::Connection {
            detail: detail.into(),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    /// Classe une erreur reqwest
    ///
    /// - code HTTP connu → Status
    /// - transport (connexion, timeout, requête) → Connection
    /// - le reste (build du client, décodage) → Internal
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            FetchError::Status {
                status: status.as_u16(),
            }
        } else if err.is_connect() || err.is_timeout() || err.is_request() {
            FetchError::connection(err.to_string())
        } else {
            FetchError::internal(err.to_string())
        }
    }
}
