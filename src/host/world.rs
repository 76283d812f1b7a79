//! In-memory world used when running without a game server.

use std::collections::HashMap;

use crate::host::{Chunk, ChunkKey, CommandSender, EntityKind, HangingDisplay, HangingPlaceEvent};

#[derive(Debug, Clone)]
pub struct SimChunk {
    key: ChunkKey,
    entities: Vec<EntityKind>,
}

impl SimChunk {
    pub fn new(key: ChunkKey) -> Self {
        Self {
            key,
            entities: Vec::new(),
        }
    }

    pub fn spawn(&mut self, kind: EntityKind) {
        self.entities.push(kind);
    }
}

impl Chunk for SimChunk {
    type Entity = EntityKind;

    fn key(&self) -> ChunkKey {
        self.key
    }

    fn entities(&self) -> impl Iterator<Item = &EntityKind> + '_ {
        self.entities.iter()
    }
}

#[derive(Debug, Default)]
pub struct World {
    chunks: HashMap<ChunkKey, SimChunk>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chunk(&self, key: ChunkKey) -> Option<&SimChunk> {
        self.chunks.get(&key)
    }

    /// Spawn without raising a placement event (world generation, imports).
    pub fn spawn(&mut self, key: ChunkKey, kind: EntityKind) {
        self.chunks
            .entry(key)
            .or_insert_with(|| SimChunk::new(key))
            .spawn(kind);
    }

    /// Number of hanging displays in a chunk.
    pub fn hanging_displays(&self, key: ChunkKey) -> usize {
        self.chunk(key)
            .map(|chunk| chunk.entities().filter(|e| e.is_hanging_display()).count())
            .unwrap_or(0)
    }

    /// Raise a placement event, let `handler` decide, and spawn the entity
    /// unless the event was cancelled. Returns whether it was spawned.
    pub fn place<F>(
        &mut self,
        key: ChunkKey,
        kind: EntityKind,
        actor: Option<&dyn CommandSender>,
        handler: F,
    ) -> bool
    where
        F: FnOnce(&mut HangingPlaceEvent<'_, SimChunk>),
    {
        let chunk = self.chunks.entry(key).or_insert_with(|| SimChunk::new(key));

        let cancelled = {
            let mut event = HangingPlaceEvent::new(actor, &kind, &*chunk);
            handler(&mut event);
            event.is_cancelled()
        };
        if cancelled {
            return false;
        }
        chunk.spawn(kind);
        true
    }
}
