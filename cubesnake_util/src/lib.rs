#![cfg_attr(not(test), no_std)]

//! Simulation and display logic for the 5x5x5 snake cube.
//!
//! [`VoxelField`] owns the animation state and [`DisplayScanner`] multiplexes
//! it onto four 8-bit output ports. Neither touches hardware directly: the
//! board supplies a [`RandomSource`] and a [`PortSink`].

pub mod field;
pub mod position;
pub mod scanner;

pub use field::{LayerMask, Tick, VoxelField};
pub use position::{Dir, Position};
pub use scanner::{encode_layer, DisplayScanner, PortSink, PortWords, ScanConfig};

/// Voxels per cube edge.
pub const SIZE: usize = 5;

/// Uniform integer generator used for target and restart positions.
pub trait RandomSource {
    fn next_u32(&mut self) -> u32;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_u32(&mut self) -> u32 {
        (**self).next_u32()
    }
}
