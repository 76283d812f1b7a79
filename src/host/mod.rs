//! Seams to the host platform.
//!
//! The host owns the world model, raises placement events and dispatches
//! commands. This module describes only what the frame limit needs from it:
//! entity classification, chunk contents, command senders and the placement
//! event itself.

pub mod entity;
pub mod sender;
pub mod world;

pub use entity::{EntityKind, HangingDisplay};
pub use sender::{BufferedSender, CommandSender};
pub use world::{SimChunk, World};

/// Chunk coordinates (16x16 block columns).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkKey {
    pub x: i32,
    pub z: i32,
}

impl ChunkKey {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Chunk containing the given block coordinates.
    pub fn from_block(block_x: i32, block_z: i32) -> Self {
        Self {
            x: block_x >> 4,
            z: block_z >> 4,
        }
    }
}

/// A spatial partition of the world and the entities currently inside it.
pub trait Chunk {
    type Entity: HangingDisplay;

    fn key(&self) -> ChunkKey;

    fn entities(&self) -> impl Iterator<Item = &Self::Entity> + '_;
}

/// A hanging decoration is about to be placed.
///
/// The host fires this before spawning the entity; a cancelled event must not
/// spawn it.
pub struct HangingPlaceEvent<'a, C: Chunk> {
    actor: Option<&'a dyn CommandSender>,
    entity: &'a C::Entity,
    chunk: &'a C,
    cancelled: bool,
}

impl<'a, C: Chunk> HangingPlaceEvent<'a, C> {
    pub fn new(actor: Option<&'a dyn CommandSender>, entity: &'a C::Entity, chunk: &'a C) -> Self {
        Self {
            actor,
            entity,
            chunk,
            cancelled: false,
        }
    }

    /// The player placing the entity, if any. Dispensers and similar sources
    /// have none.
    pub fn actor(&self) -> Option<&'a dyn CommandSender> {
        self.actor
    }

    pub fn entity(&self) -> &'a C::Entity {
        self.entity
    }

    pub fn chunk(&self) -> &'a C {
        self.chunk
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn set_cancelled(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
    }
}
