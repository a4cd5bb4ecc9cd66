use crate::{RandomSource, SIZE};

/// A voxel coordinate. Every component is always within `0..SIZE`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct Position {
    pub x: u8,
    pub y: u8,
    pub z: u8,
}

/// The six axis-aligned neighbour directions.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Dir {
    PlusX,
    MinusX,
    PlusY,
    MinusY,
    PlusZ,
    MinusZ,
}

impl Dir {
    /// All directions in the order the snake tries them.
    pub const ALL: [Dir; 6] = [
        Dir::PlusX,
        Dir::MinusX,
        Dir::PlusY,
        Dir::MinusY,
        Dir::PlusZ,
        Dir::MinusZ,
    ];

    pub fn opposite(self) -> Dir {
        match self {
            Dir::PlusX => Dir::MinusX,
            Dir::MinusX => Dir::PlusX,
            Dir::PlusY => Dir::MinusY,
            Dir::MinusY => Dir::PlusY,
            Dir::PlusZ => Dir::MinusZ,
            Dir::MinusZ => Dir::PlusZ,
        }
    }
}

impl Position {
    pub fn new(x: u8, y: u8, z: u8) -> Self {
        debug_assert!(
            (x as usize) < SIZE && (y as usize) < SIZE && (z as usize) < SIZE,
            "voxel ({}, {}, {}) outside the cube",
            x,
            y,
            z
        );
        Position { x, y, z }
    }

    /// Samples every axis independently and uniformly.
    pub fn random<R: RandomSource + ?Sized>(rng: &mut R) -> Self {
        let x = (rng.next_u32() % SIZE as u32) as u8;
        let y = (rng.next_u32() % SIZE as u32) as u8;
        let z = (rng.next_u32() % SIZE as u32) as u8;
        Position::new(x, y, z)
    }

    /// Creates a position from an `x*25 + y*5 + z` index.
    pub fn from_index(index: usize) -> Self {
        debug_assert!(index < VOXELS);
        Position::new(
            (index / (SIZE * SIZE)) as u8,
            ((index / SIZE) % SIZE) as u8,
            (index % SIZE) as u8,
        )
    }

    pub fn index(&self) -> usize {
        self.x as usize * SIZE * SIZE + self.y as usize * SIZE + self.z as usize
    }

    /// Every position of the cube, x-major.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..VOXELS).map(Position::from_index)
    }

    /// Returns the neighbour in `dir`, or `None` at the edge of the cube.
    pub fn offset(self, dir: Dir) -> Option<Position> {
        let Position { x, y, z } = self;
        let max = (SIZE - 1) as u8;

        match dir {
            Dir::PlusX if x < max => Some(Position { x: x + 1, ..self }),
            Dir::MinusX if x > 0 => Some(Position { x: x - 1, ..self }),
            Dir::PlusY if y < max => Some(Position { y: y + 1, ..self }),
            Dir::MinusY if y > 0 => Some(Position { y: y - 1, ..self }),
            Dir::PlusZ if z < max => Some(Position { z: z + 1, ..self }),
            Dir::MinusZ if z > 0 => Some(Position { z: z - 1, ..self }),
            _ => None,
        }
    }

    /// Whether `target` lies strictly beyond `self` along the axis and sign of `dir`.
    pub fn toward(self, dir: Dir, target: Position) -> bool {
        match dir {
            Dir::PlusX => target.x > self.x,
            Dir::MinusX => target.x < self.x,
            Dir::PlusY => target.y > self.y,
            Dir::MinusY => target.y < self.y,
            Dir::PlusZ => target.z > self.z,
            Dir::MinusZ => target.z < self.z,
        }
    }
}

const VOXELS: usize = SIZE * SIZE * SIZE;
