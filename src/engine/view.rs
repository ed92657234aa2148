use crate::{ecs::EntityView, map::Level};

/// Anything that can show the current level. Empty monster slots are `None`
/// and must be skipped.
pub trait GameView {
    fn update_display(
        &mut self,
        level: &Level,
        player: Option<&EntityView>,
        monsters: &[Option<EntityView>],
    );
}

/// Discards every frame. Used by the headless script runner.
#[derive(Default)]
pub struct NullView;

impl GameView for NullView {
    fn update_display(&mut self, _: &Level, _: Option<&EntityView>, _: &[Option<EntityView>]) {}
}
