use bracket_geometry::prelude::{DistanceAlg, Point};
use bracket_pathfinding::prelude::{Algorithm2D, BaseMap};
use bracket_random::prelude::RandomNumberGenerator;
use bracket_terminal::prelude::RGB;
use smallvec::SmallVec;

pub const CARDINALS: [Point; 4] = [
    Point { x: -1, y: 0 },
    Point { x: 1, y: 0 },
    Point { x: 0, y: -1 },
    Point { x: 0, y: 1 },
];

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TileType {
    Wall,
    Floor,
    Chest,
    Stairs,
}

impl TileType {
    pub const fn is_passable(self) -> bool {
        !matches!(self, TileType::Wall)
    }

    /// Walls and stairs are never used as start tiles.
    pub const fn is_spawnable(self) -> bool {
        matches!(self, TileType::Floor | TileType::Chest)
    }

    pub const fn glyph(self) -> char {
        match self {
            TileType::Wall => '#',
            TileType::Floor => '.',
            TileType::Chest => '=',
            TileType::Stairs => '>',
        }
    }

    pub fn color(self) -> RGB {
        match self {
            TileType::Wall => RGB::from_u8(120, 110, 100),
            TileType::Floor => RGB::from_u8(70, 70, 90),
            TileType::Chest => RGB::from_u8(230, 190, 60),
            TileType::Stairs => RGB::from_u8(120, 200, 255),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Level {
    pub width: i32,
    pub height: i32,
    pub tiles: Vec<TileType>,
}

impl Level {
    pub fn filled(width: i32, height: i32, tile: TileType) -> Self {
        let size = (width.max(0) * height.max(0)) as usize;
        Self {
            width,
            height,
            tiles: vec![tile; size],
        }
    }

    /// Random tile assignment: each cell is a wall with `wall_chance`, else a
    /// chest with `chest_chance`, else floor. One stairs tile is then dropped
    /// on a random open cell. Nothing guarantees the stairs are reachable.
    pub fn generate(
        width: i32,
        height: i32,
        wall_chance: f32,
        chest_chance: f32,
        rng: &mut RandomNumberGenerator,
    ) -> Self {
        let mut level = Self::filled(width, height, TileType::Floor);
        for tile in level.tiles.iter_mut() {
            *tile = if rng.range(0.0_f32, 1.0) < wall_chance {
                TileType::Wall
            } else if rng.range(0.0_f32, 1.0) < chest_chance {
                TileType::Chest
            } else {
                TileType::Floor
            };
        }

        if !level.tiles.is_empty() {
            let open: Vec<usize> = level
                .tiles
                .iter()
                .enumerate()
                .filter(|(_, tile)| tile.is_passable())
                .map(|(idx, _)| idx)
                .collect();
            let stairs = if open.is_empty() {
                rng.range(0, level.tiles.len())
            } else {
                open[rng.range(0, open.len())]
            };
            level.tiles[stairs] = TileType::Stairs;
        }

        log::debug!(
            "generated {}x{} level: {} walls, {} chests",
            width,
            height,
            level.count(TileType::Wall),
            level.count(TileType::Chest)
        );
        level
    }

    /// Builds a level from ASCII rows using the same glyphs the renderer draws.
    /// Unknown characters become floor.
    #[cfg(test)]
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len() as i32;
        let width = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0) as i32;
        let mut level = Self::filled(width, height, TileType::Floor);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                let tile = match ch {
                    '#' => TileType::Wall,
                    '=' => TileType::Chest,
                    '>' => TileType::Stairs,
                    _ => TileType::Floor,
                };
                level.set_tile(Point::new(x as i32, y as i32), tile);
            }
        }
        level
    }

    fn idx(&self, point: Point) -> Option<usize> {
        if self.in_bounds(point) {
            Some((point.y * self.width + point.x) as usize)
        } else {
            None
        }
    }

    pub fn in_bounds(&self, point: Point) -> bool {
        point.x >= 0 && point.x < self.width && point.y >= 0 && point.y < self.height
    }

    pub fn tile_at(&self, point: Point) -> Option<TileType> {
        self.idx(point).map(|idx| self.tiles[idx])
    }

    pub fn set_tile(&mut self, point: Point, tile: TileType) {
        if let Some(idx) = self.idx(point) {
            self.tiles[idx] = tile;
        }
    }

    pub fn is_passable(&self, point: Point) -> bool {
        self.tile_at(point).is_some_and(TileType::is_passable)
    }

    pub fn count(&self, kind: TileType) -> usize {
        self.tiles.iter().filter(|tile| **tile == kind).count()
    }

    /// Every floor or chest tile, row by row.
    pub fn spawn_points(&self) -> Vec<Point> {
        let mut points = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                let point = Point::new(x, y);
                if self.tile_at(point).is_some_and(TileType::is_spawnable) {
                    points.push(point);
                }
            }
        }
        points
    }

    pub fn passable_neighbours(&self, point: Point) -> Vec<Point> {
        self.get_available_exits(self.point2d_to_index(point))
            .into_iter()
            .map(|(idx, _)| self.index_to_point2d(idx))
            .collect()
    }
}

impl BaseMap for Level {
    fn is_opaque(&self, idx: usize) -> bool {
        self.tiles.get(idx).is_none_or(|tile| !tile.is_passable())
    }

    fn get_available_exits(&self, idx: usize) -> SmallVec<[(usize, f32); 10]> {
        let mut exits = SmallVec::new();
        if idx >= self.tiles.len() {
            return exits;
        }
        let point = self.index_to_point2d(idx);
        for dir in CARDINALS {
            let dest = point + dir;
            if self.is_passable(dest) {
                exits.push((self.point2d_to_index(dest), 1.0));
            }
        }
        exits
    }

    fn get_pathing_distance(&self, idx1: usize, idx2: usize) -> f32 {
        let p1 = self.index_to_point2d(idx1);
        let p2 = self.index_to_point2d(idx2);
        DistanceAlg::Manhattan.distance2d(p1, p2)
    }
}

impl Algorithm2D for Level {
    fn dimensions(&self) -> Point {
        Point::new(self.width, self.height)
    }

    fn in_bounds(&self, point: Point) -> bool {
        Level::in_bounds(self, point)
    }
}
