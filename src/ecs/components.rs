use bracket_geometry::prelude::Point;
use bracket_terminal::prelude::RGB;
use specs::prelude::{Component, NullStorage, VecStorage};

#[derive(Clone, Debug)]
pub struct Position {
    pub point: Point,
}

impl Component for Position {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Debug)]
pub struct Renderable {
    pub glyph: char,
    pub color: RGB,
}

impl Component for Renderable {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Debug)]
pub struct IntentStep {
    pub delta: Point,
}

impl Component for IntentStep {
    type Storage = VecStorage<Self>;
}

#[derive(Default)]
pub struct PlayerTag;

impl Component for PlayerTag {
    type Storage = NullStorage<Self>;
}

#[derive(Clone, Debug)]
pub struct Monster {
    pub name: String,
}

impl Component for Monster {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Debug)]
pub struct MonsterBrain {
    pub wander_chance: f32,
    pub sight: i32,
}

impl Component for MonsterBrain {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CombatStats {
    pub max_hp: i32,
    pub hp: i32,
    pub power: i32,
}

impl CombatStats {
    pub const fn new(hp: i32, power: i32) -> Self {
        Self {
            max_hp: hp,
            hp,
            power,
        }
    }

    pub const fn is_dead(&self) -> bool {
        self.hp < 1
    }

    pub fn take_damage(&mut self, amount: i32) {
        self.hp -= amount.max(0);
    }

    /// Returns how much was actually restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.hp = (self.hp + amount.max(0)).min(self.max_hp);
        self.hp - before
    }
}

impl Component for CombatStats {
    type Storage = VecStorage<Self>;
}
