// ============================================================================
// Module : ui
// ============================================================================
// Gère toute l'interface utilisateur (Terminal User Interface)
// ============================================================================

pub mod events;    // Événements clavier / souris
pub mod layout;    // Zones de l'écran, partagées par le rendu et les clics
pub mod dashboard; // Rendu de l'interface principale
pub mod input;     // Événement → modification de App (+ commande)

// Re-exports pour simplifier les imports
pub use dashboard::render;
pub use events::{Event, EventHandler};
pub use input::{handle_event, AppCommand};
