//! Entity classification.

use std::fmt;
use std::str::FromStr;

/// Classifies an entity as a hanging item display.
///
/// Counting and enforcement only go through this predicate, so new display
/// variants are added here without touching the limiter.
pub trait HangingDisplay {
    fn is_hanging_display(&self) -> bool;
}

/// Entity variants the host can report inside a chunk.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityKind {
    ItemFrame,
    GlowItemFrame,
    Painting,
    ArmorStand,
    Other(String),
}

impl HangingDisplay for EntityKind {
    fn is_hanging_display(&self) -> bool {
        matches!(self, EntityKind::ItemFrame | EntityKind::GlowItemFrame)
    }
}

impl<T: HangingDisplay + ?Sized> HangingDisplay for &T {
    fn is_hanging_display(&self) -> bool {
        (**self).is_hanging_display()
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::ItemFrame => write!(f, "item_frame"),
            EntityKind::GlowItemFrame => write!(f, "glow_item_frame"),
            EntityKind::Painting => write!(f, "painting"),
            EntityKind::ArmorStand => write!(f, "armor_stand"),
            EntityKind::Other(name) => write!(f, "{}", name),
        }
    }
}

impl FromStr for EntityKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "frame" | "item_frame" => EntityKind::ItemFrame,
            "glow" | "glow_frame" | "glow_item_frame" => EntityKind::GlowItemFrame,
            "painting" => EntityKind::Painting,
            "armor_stand" => EntityKind::ArmorStand,
            other => EntityKind::Other(other.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_variants_are_equivalent() {
        assert!(EntityKind::ItemFrame.is_hanging_display());
        assert!(EntityKind::GlowItemFrame.is_hanging_display());
        assert!(!EntityKind::Painting.is_hanging_display());
        assert!(!EntityKind::ArmorStand.is_hanging_display());
        assert!(!EntityKind::Other("leash_knot".into()).is_hanging_display());
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!("glow".parse::<EntityKind>().unwrap(), EntityKind::GlowItemFrame);
        assert_eq!("ITEM_FRAME".parse::<EntityKind>().unwrap(), EntityKind::ItemFrame);
        assert_eq!(
            "boat".parse::<EntityKind>().unwrap(),
            EntityKind::Other("boat".into())
        );
    }
}
