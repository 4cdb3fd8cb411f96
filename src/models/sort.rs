// ============================================================================
// Tri des cryptomonnaies
// ============================================================================
// Colonne de tri + direction, et le tri lui-même
//
// CONCEPTS RUST :
// 1. Enums pour un état fini (3 colonnes x 2 directions)
// 2. Ordering : résultat d'une comparaison (Less, Equal, Greater)
// 3. f64 n'implémente pas Ord (à cause de NaN) → partial_cmp
// ============================================================================

use std::cmp::Ordering;

use crate::models::Coin;

/// Colonne sur laquelle on peut trier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    /// Rang par capitalisation
    Rank,
    /// Prix actuel
    Price,
    /// Variation sur 24h
    Change24h,
}

impl SortField {
    /// Direction appliquée quand on sélectionne une nouvelle colonne
    ///
    /// Le rang se lit du plus petit au plus grand, prix et variation
    /// "les plus gros d'abord".
    pub fn default_direction(&self) -> SortDirection {
        match self {
            SortField::Rank => SortDirection::Ascending,
            SortField::Price | SortField::Change24h => SortDirection::Descending,
        }
    }

    /// Valeur brute du champ pour un coin
    ///
    /// Une valeur absente compte comme 0.
    fn key(&self, coin: &Coin) -> f64 {
        match self {
            SortField::Rank => f64::from(coin.market_cap_rank),
            SortField::Price => coin.price_or_zero(),
            SortField::Change24h => coin.change_or_zero(),
        }
    }
}

/// Sens du tri
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// Inverse la direction
    pub fn flipped(&self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// État du tri : (colonne, direction)
///
/// Survit aux rafraîchissements et aux changements de devise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortState {
    /// Sélectionne une colonne (clic sur l'en-tête)
    ///
    /// - Même colonne : inverse la direction
    /// - Autre colonne : la sélectionne avec sa direction par défaut
    pub fn select(&mut self, field: SortField) {
        if self.field == field {
            self.direction = self.direction.flipped();
        } else {
            self.field = field;
            self.direction = field.default_direction();
        }
    }

    /// Compare deux coins selon cet état
    pub fn compare(&self, a: &Coin, b: &Coin) -> Ordering {
        let ordering = self
            .field
            .key(a)
            .partial_cmp(&self.field.key(b))
            .unwrap_or(Ordering::Equal);

        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

impl Default for SortState {
    /// (Rang, ascendant)
    fn default() -> Self {
        Self {
            field: SortField::Rank,
            direction: SortDirection::Ascending,
        }
    }
}

/// Retourne une copie triée des coins
///
/// CONCEPT RUST : slice en entrée, Vec en sortie
/// - Les données sources ne sont pas modifiées
/// - to_vec() clone, sort_by() trie sur place la copie
pub fn sort_coins(coins: &[Coin], state: SortState) -> Vec<Coin> {
    let mut sorted = coins.to_vec();
    sorted.sort_by(|a, b| state.compare(a, b));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coin(rank: u32, price: f64, change: Option<f64>) -> Coin {
        Coin {
            id: format!("coin-{}", rank),
            symbol: format!("c{}", rank),
            name: format!("Coin {}", rank),
            image: String::new(),
            current_price: Some(price),
            market_cap_rank: rank,
            price_change_percentage_24h: change,
            market_cap: 0.0,
        }
    }

    fn ranks(coins: &[Coin]) -> Vec<u32> {
        coins.iter().map(|c| c.market_cap_rank).collect()
    }

    #[test]
    fn test_rank_ascending_then_flip() {
        let coins = vec![coin(3, 1.0, None), coin(1, 2.0, None), coin(2, 3.0, None)];
        let mut state = SortState::default();

        assert_eq!(ranks(&sort_coins(&coins, state)), vec![1, 2, 3]);

        state.select(SortField::Rank);
        assert_eq!(state.direction, SortDirection::Descending);
        assert_eq!(ranks(&sort_coins(&coins, state)), vec![3, 2, 1]);
    }

    #[test]
    fn test_new_field_defaults_to_descending() {
        let mut state = SortState::default();
        state.select(SortField::Price);
        assert_eq!(state.field, SortField::Price);
        assert_eq!(state.direction, SortDirection::Descending);

        state.select(SortField::Change24h);
        assert_eq!(state.direction, SortDirection::Descending);

        // Retour au rang : ascendant
        state.select(SortField::Rank);
        assert_eq!(state.direction, SortDirection::Ascending);
    }

    #[test]
    fn test_sort_by_price_descending() {
        let coins = vec![coin(1, 60000.0, None), coin(2, 0.5, None), coin(3, 3000.0, None)];
        let mut state = SortState::default();
        state.select(SortField::Price);

        assert_eq!(ranks(&sort_coins(&coins, state)), vec![1, 3, 2]);
    }

    #[test]
    fn test_missing_change_sorts_as_zero() {
        let coins = vec![
            coin(1, 1.0, Some(-2.0)),
            coin(2, 1.0, None),
            coin(3, 1.0, Some(4.5)),
        ];
        let state = SortState {
            field: SortField::Change24h,
            direction: SortDirection::Ascending,
        };

        assert_eq!(ranks(&sort_coins(&coins, state)), vec![1, 2, 3]);
    }

    #[test]
    fn test_sort_does_not_touch_input() {
        let coins = vec![coin(2, 1.0, None), coin(1, 1.0, None)];
        let _ = sort_coins(&coins, SortState::default());
        assert_eq!(ranks(&coins), vec![2, 1]);
    }
}
