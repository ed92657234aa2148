use bracket_geometry::prelude::Point;

use crate::map::Level;

/// Per-turn snapshot of the level that the monster systems read.
#[derive(Clone)]
pub struct MovementContext {
    pub level: Level,
    pub player_point: Point,
}

impl MovementContext {
    pub fn new(level: &Level, player_point: Point) -> Self {
        Self {
            level: level.clone(),
            player_point,
        }
    }

    pub fn is_passable(&self, point: Point) -> bool {
        self.level.is_passable(point)
    }
}

#[derive(Default)]
pub struct CombatLog {
    pub entries: Vec<String>,
}

impl CombatLog {
    pub fn push<S: Into<String>>(&mut self, entry: S) {
        self.entries.push(entry.into());
    }
}
