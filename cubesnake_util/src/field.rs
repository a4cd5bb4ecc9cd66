use crate::position::{Dir, Position};
use crate::{RandomSource, SIZE};

type Grid = [[[u8; SIZE]; SIZE]; SIZE];

/// What a single [`VoxelField::tick`] did with the head.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Tick {
    /// The head sat on the target; the trail grew and a new target was picked.
    Reached { len: u8 },
    /// The head stepped toward the target.
    Advanced(Dir),
    /// Every step toward the target was blocked; the head took any free step.
    Wandered(Dir),
    /// The head was boxed in (or the cube was full) and the field was cleared.
    Reset,
}

/// The lit `(x, y)` cells of one z-layer, bit `x * SIZE + y`.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct LayerMask(u32);

impl LayerMask {
    pub fn contains(&self, x: u8, y: u8) -> bool {
        self.0 & Self::bit(x, y) != 0
    }

    pub fn insert(&mut self, x: u8, y: u8) {
        self.0 |= Self::bit(x, y);
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn bits(&self) -> u32 {
        self.0
    }

    fn bit(x: u8, y: u8) -> u32 {
        debug_assert!((x as usize) < SIZE && (y as usize) < SIZE);
        1 << (x as usize * SIZE + y as usize)
    }
}

/// The snake simulation: per-voxel ages plus the head and target positions.
///
/// A non-zero age means the voxel is lit. The head is written with the
/// current trail length each tick and every voxel loses one unit of age per
/// tick, so the lit tail is never longer than `len` voxels.
#[derive(Clone, Debug)]
pub struct VoxelField {
    ages: Grid,
    current: Position,
    target: Position,
    len: u8,
}

impl Default for VoxelField {
    fn default() -> Self {
        Self::new()
    }
}

impl VoxelField {
    /// Power-on state: dark cube, head and target both at the origin.
    pub fn new() -> Self {
        Self::from_parts(Position::default(), Position::default(), 0)
    }

    /// An empty cube with the given head, target and trail length.
    pub fn from_parts(current: Position, target: Position, len: u8) -> Self {
        VoxelField {
            ages: [[[0; SIZE]; SIZE]; SIZE],
            current,
            target,
            len,
        }
    }

    pub fn current(&self) -> Position {
        self.current
    }

    pub fn target(&self) -> Position {
        self.target
    }

    pub fn len(&self) -> u8 {
        self.len
    }

    pub fn age(&self, pos: Position) -> u8 {
        self.ages[pos.x as usize][pos.y as usize][pos.z as usize]
    }

    pub fn set_age(&mut self, pos: Position, age: u8) {
        self.ages[pos.x as usize][pos.y as usize][pos.z as usize] = age;
    }

    pub fn is_lit(&self, pos: Position) -> bool {
        self.age(pos) != 0
    }

    pub fn lit_count(&self) -> usize {
        Position::all().filter(|&pos| self.is_lit(pos)).count()
    }

    pub fn layer(&self, z: u8) -> LayerMask {
        let mut mask = LayerMask::default();
        for x in 0..SIZE as u8 {
            for y in 0..SIZE as u8 {
                if self.is_lit(Position::new(x, y, z)) {
                    mask.insert(x, y);
                }
            }
        }
        mask
    }

    /// Advances the animation by one step.
    pub fn tick<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> Tick {
        self.decay();
        self.set_age(self.current, self.len);

        let current = self.current;
        let target = self.target;

        let tick = if current == target {
            self.len = self.len.saturating_add(1);
            match self.pick_target(rng) {
                Some(next) => {
                    log::debug!("target reached, length {}, next target {:?}", self.len, next);
                    self.target = next;
                    Tick::Reached { len: self.len }
                }
                None => {
                    log::info!("cube full at length {}, resetting", self.len);
                    self.reset(rng);
                    Tick::Reset
                }
            }
        } else if let Some(dir) = self.step(|dir| current.toward(dir, target)) {
            Tick::Advanced(dir)
        } else if let Some(dir) = self.step(|_| true) {
            Tick::Wandered(dir)
        } else {
            log::info!("stuck at {:?} with length {}, resetting", current, self.len);
            self.reset(rng);
            Tick::Reset
        };

        log::trace!("{:?}: head {:?}, target {:?}", tick, self.current, self.target);

        // Keep the target visible.
        self.set_age(self.target, 1);

        tick
    }

    fn decay(&mut self) {
        for age in self.ages.iter_mut().flatten().flatten() {
            *age = age.saturating_sub(1);
        }
    }

    /// Moves the head one voxel along the first allowed direction that leads
    /// to an unlit voxel.
    fn step<F: Fn(Dir) -> bool>(&mut self, allowed: F) -> Option<Dir> {
        for dir in Dir::ALL {
            if !allowed(dir) {
                continue;
            }
            if let Some(next) = self.current.offset(dir) {
                if !self.is_lit(next) {
                    self.current = next;
                    return Some(dir);
                }
            }
        }
        None
    }

    /// Uniformly picks an unlit voxel, or `None` if every voxel is lit.
    fn pick_target<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Option<Position> {
        let free = Position::all().filter(|&pos| !self.is_lit(pos)).count();
        if free == 0 {
            return None;
        }

        let chosen = rng.next_u32() as usize % free;
        Position::all().filter(|&pos| !self.is_lit(pos)).nth(chosen)
    }

    fn reset<R: RandomSource + ?Sized>(&mut self, rng: &mut R) {
        self.ages = [[[0; SIZE]; SIZE]; SIZE];
        self.len = 1;
        self.current = Position::random(rng);
    }
}
