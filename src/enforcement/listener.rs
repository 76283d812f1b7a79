//! Placement event handler.

use crate::config::FrameLimit;
use crate::enforcement::limiter::{evaluate_with, Decision};
use crate::host::{Chunk, HangingDisplay, HangingPlaceEvent};
use crate::observability::metrics;

pub fn limit_reached_message(limit: FrameLimit) -> String {
    format!("You have reached the frame limit ({}) for this chunk.", limit)
}

/// Number of hanging displays already in the chunk.
pub fn count_hanging_displays<C: Chunk>(chunk: &C) -> usize {
    chunk.entities().filter(|e| e.is_hanging_display()).count()
}

/// Apply `limit` to a placement event.
///
/// Placements without a player, and entities that are not hanging displays,
/// are always allowed. On deny the event is cancelled and the player is told
/// the configured limit.
pub fn on_hanging_place<C: Chunk>(limit: FrameLimit, event: &mut HangingPlaceEvent<'_, C>) -> Decision {
    if limit.is_unlimited() {
        return Decision::Allow;
    }
    let Some(actor) = event.actor() else {
        return Decision::Allow;
    };
    if !event.entity().is_hanging_display() {
        return Decision::Allow;
    }

    let chunk = event.chunk();
    let decision = evaluate_with(limit, || count_hanging_displays(chunk));
    metrics::record_placement(decision);

    if decision == Decision::Deny {
        event.set_cancelled(true);
        actor.send_message(&limit_reached_message(limit));
        tracing::debug!(
            player = %actor.name(),
            chunk_x = chunk.key().x,
            chunk_z = chunk.key().z,
            limit = %limit,
            "Frame placement denied"
        );
    }
    decision
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{BufferedSender, ChunkKey, EntityKind, SimChunk};

    fn chunk_with(frames: usize) -> SimChunk {
        let mut chunk = SimChunk::new(ChunkKey::new(0, 0));
        for _ in 0..frames {
            chunk.spawn(EntityKind::ItemFrame);
        }
        chunk
    }

    #[test]
    fn test_deny_cancels_and_notifies() {
        let chunk = chunk_with(3);
        let player = BufferedSender::player("alex");
        let frame = EntityKind::GlowItemFrame;
        let mut event = HangingPlaceEvent::new(Some(&player), &frame, &chunk);

        let decision = on_hanging_place(FrameLimit::new(3).unwrap(), &mut event);

        assert_eq!(decision, Decision::Deny);
        assert!(event.is_cancelled());
        assert_eq!(
            player.take_messages(),
            vec!["You have reached the frame limit (3) for this chunk.".to_string()]
        );
    }

    #[test]
    fn test_allow_leaves_event_untouched() {
        let chunk = chunk_with(1);
        let player = BufferedSender::player("alex");
        let frame = EntityKind::ItemFrame;
        let mut event = HangingPlaceEvent::new(Some(&player), &frame, &chunk);

        assert_eq!(on_hanging_place(FrameLimit::new(2).unwrap(), &mut event), Decision::Allow);
        assert!(!event.is_cancelled());
        assert!(player.take_messages().is_empty());
    }

    #[test]
    fn test_non_display_entities_ignored() {
        let chunk = chunk_with(5);
        let player = BufferedSender::player("alex");
        let painting = EntityKind::Painting;
        let mut event = HangingPlaceEvent::new(Some(&player), &painting, &chunk);

        assert_eq!(on_hanging_place(FrameLimit::new(0).unwrap(), &mut event), Decision::Allow);
        assert!(!event.is_cancelled());
    }

    #[test]
    fn test_placement_without_player_allowed() {
        let chunk = chunk_with(5);
        let frame = EntityKind::ItemFrame;
        let mut event = HangingPlaceEvent::new(None, &frame, &chunk);

        assert_eq!(on_hanging_place(FrameLimit::new(0).unwrap(), &mut event), Decision::Allow);
        assert!(!event.is_cancelled());
    }
}
