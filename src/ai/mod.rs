use bracket_geometry::prelude::{DistanceAlg, Point};
use bracket_random::prelude::RandomNumberGenerator;

use crate::map::Level;

pub fn is_adjacent(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() + (a.y - b.y).abs() == 1
}

pub fn can_see(from: Point, to: Point, sight: i32) -> bool {
    DistanceAlg::Manhattan.distance2d(from, to) <= sight as f32
}

/// Greedy single step toward `to`, dominant axis first. No search: a monster
/// behind a wall just stays put.
pub fn step_towards<F>(from: Point, to: Point, is_open: F) -> Option<Point>
where
    F: Fn(Point) -> bool,
{
    let dx = (to.x - from.x).clamp(-1, 1);
    let dy = (to.y - from.y).clamp(-1, 1);
    let axes = if (to.x - from.x).abs() >= (to.y - from.y).abs() {
        [Point::new(dx, 0), Point::new(0, dy)]
    } else {
        [Point::new(0, dy), Point::new(dx, 0)]
    };
    axes.into_iter()
        .filter(|dir| *dir != Point::new(0, 0))
        .find(|dir| is_open(from + *dir))
}

/// Random step onto a passable neighbour, taken with `wander_chance`.
pub fn wander_step<F>(
    from: Point,
    level: &Level,
    wander_chance: f32,
    rng: &mut RandomNumberGenerator,
    is_free: F,
) -> Option<Point>
where
    F: Fn(Point) -> bool,
{
    if rng.range(0.0_f32, 1.0) >= wander_chance {
        return None;
    }
    let options: Vec<Point> = level
        .passable_neighbours(from)
        .into_iter()
        .filter(|point| is_free(*point))
        .collect();
    if options.is_empty() {
        return None;
    }
    let dest = options[rng.range(0, options.len())];
    Some(dest - from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacency_is_four_way() {
        let origin = Point::new(3, 3);
        assert!(is_adjacent(origin, Point::new(3, 2)));
        assert!(is_adjacent(origin, Point::new(4, 3)));
        assert!(!is_adjacent(origin, Point::new(4, 4)));
        assert!(!is_adjacent(origin, origin));
    }

    #[test]
    fn steps_along_dominant_axis() {
        let step = step_towards(Point::new(0, 0), Point::new(5, 2), |_| true);
        assert_eq!(step, Some(Point::new(1, 0)));
        let step = step_towards(Point::new(0, 0), Point::new(1, -4), |_| true);
        assert_eq!(step, Some(Point::new(0, -1)));
    }

    #[test]
    fn falls_back_to_other_axis_when_blocked() {
        let blocked = Point::new(1, 0);
        let step = step_towards(Point::new(0, 0), Point::new(5, 2), |p| p != blocked);
        assert_eq!(step, Some(Point::new(0, 1)));
        let step = step_towards(Point::new(0, 0), Point::new(5, 0), |p| p != blocked);
        assert_eq!(step, None);
    }

    #[test]
    fn wander_respects_walls_and_chance() {
        let level = Level::from_rows(&["###", "#..", "###"]);
        let mut rng = RandomNumberGenerator::seeded(1);
        for _ in 0..10 {
            let step = wander_step(Point::new(1, 1), &level, 1.0, &mut rng, |_| true);
            assert_eq!(step, Some(Point::new(1, 0)));
        }
        let idle = wander_step(Point::new(1, 1), &level, 0.0, &mut rng, |_| true);
        assert_eq!(idle, None);
        let boxed = wander_step(Point::new(1, 1), &level, 1.0, &mut rng, |_| false);
        assert_eq!(boxed, None);
    }
}
