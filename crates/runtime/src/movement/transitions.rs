//! Area pairs whose connection cannot be found in the exit list.
use std::collections::HashMap;

use game_core::{AreaId, Position};
use serde::{Deserialize, Serialize};

/// How to get from one area into another when the exit list does not say.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Route {
    /// Entrance object at a known spot that map data does not report.
    FixedEntrance { position: Position },
    /// Walk the listed points in order, then use the portal at the end.
    Waypoints { steps: Vec<Position>, portal: Position },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionSpec {
    pub from: AreaId,
    pub to: AreaId,
    pub route: Route,
}

#[derive(Clone, Debug, Default)]
pub struct TransitionTable {
    routes: HashMap<(AreaId, AreaId), Route>,
}

impl TransitionTable {
    pub fn builtin() -> Self {
        let routes = [
            (
                AreaId::TAMOE_HIGHLAND,
                AreaId::PIT_LEVEL_1,
                Route::FixedEntrance {
                    position: Position::new(5108, 3928),
                },
            ),
            (
                AreaId::BLACK_MARSH,
                AreaId::FORGOTTEN_TOWER,
                Route::FixedEntrance {
                    position: Position::new(4312, 5646),
                },
            ),
            (
                AreaId::ARCANE_SANCTUARY,
                AreaId::CANYON_OF_THE_MAGI,
                Route::Waypoints {
                    steps: vec![Position::new(12638, 10588)],
                    portal: Position::new(12645, 10597),
                },
            ),
        ];

        Self {
            routes: routes
                .into_iter()
                .map(|(from, to, route)| ((from, to), route))
                .collect(),
        }
    }

    /// Built-in routes with `overrides` layered on top; a later entry for the
    /// same pair replaces an earlier one.
    pub fn with_overrides(overrides: &[TransitionSpec]) -> Self {
        let mut table = Self::builtin();
        for spec in overrides {
            table.routes.insert((spec.from, spec.to), spec.route.clone());
        }
        table
    }

    pub fn lookup(&self, from: AreaId, to: AreaId) -> Option<&Route> {
        self.routes.get(&(from, to))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_routes_are_directional() {
        let table = TransitionTable::builtin();
        assert!(table.lookup(AreaId::TAMOE_HIGHLAND, AreaId::PIT_LEVEL_1).is_some());
        assert!(table.lookup(AreaId::PIT_LEVEL_1, AreaId::TAMOE_HIGHLAND).is_none());
    }

    #[test]
    fn overrides_replace_builtin_pairs() {
        let replacement = Route::FixedEntrance {
            position: Position::new(1, 2),
        };
        let table = TransitionTable::with_overrides(&[
            TransitionSpec {
                from: AreaId::TAMOE_HIGHLAND,
                to: AreaId::PIT_LEVEL_1,
                route: replacement.clone(),
            },
            TransitionSpec {
                from: AreaId::COLD_PLAINS,
                to: AreaId::CAVE_LEVEL_1,
                route: replacement.clone(),
            },
        ]);
        assert_eq!(table.len(), TransitionTable::builtin().len() + 1);
        assert_eq!(
            table.lookup(AreaId::TAMOE_HIGHLAND, AreaId::PIT_LEVEL_1),
            Some(&replacement)
        );
    }
}
