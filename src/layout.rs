//! Carousel slot layout.
//!
//! Four fixed slots surround the camera's line of sight. Which section lands
//! in which slot depends only on the section's order index and the current
//! view index:
//!
//! | relative | slot  | position       | opacity | size |
//! |----------|-------|----------------|---------|------|
//! | 0        | Front | (0, 0, 2)      | 1.0     | 1.0  |
//! | 1        | Right | (20, 0, -15)   | 0.6     | 0.8  |
//! | 2        | Back  | (0, 15, -20)   | 0.3     | 0.6  |
//! | 3        | Left  | (-20, 0, -15)  | 0.6     | 0.8  |

use crate::section::{SectionId, SECTION_COUNT};
use glam::Vec3;

/// One of the four carousel positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Front,
    Right,
    Back,
    Left,
}

impl Slot {
    /// Slot for a relative position `0..4`, wrapping.
    pub fn from_relative(relative: usize) -> Self {
        match relative % SECTION_COUNT {
            0 => Slot::Front,
            1 => Slot::Right,
            2 => Slot::Back,
            _ => Slot::Left,
        }
    }

    /// World-space centre of the word placed in this slot.
    pub fn position(self) -> Vec3 {
        match self {
            Slot::Front => Vec3::new(0.0, 0.0, 2.0),
            Slot::Right => Vec3::new(20.0, 0.0, -15.0),
            Slot::Back => Vec3::new(0.0, 15.0, -20.0),
            Slot::Left => Vec3::new(-20.0, 0.0, -15.0),
        }
    }

    /// Color multiplier; farther slots are dimmer.
    pub fn opacity_factor(self) -> f32 {
        match self {
            Slot::Front => 1.0,
            Slot::Right | Slot::Left => 0.6,
            Slot::Back => 0.3,
        }
    }

    /// Particle size multiplier.
    pub fn size_factor(self) -> f32 {
        match self {
            Slot::Front => 1.0,
            Slot::Right | Slot::Left => 0.8,
            Slot::Back => 0.6,
        }
    }
}

/// Where and how a section is drawn for a given view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotPlacement {
    pub slot: Slot,
    pub position: Vec3,
    pub opacity_factor: f32,
    pub size_factor: f32,
}

/// `(order_index - view_index) mod 4`, computed without underflow.
#[inline]
pub fn relative_position(order_index: usize, view_index: usize) -> usize {
    (order_index % SECTION_COUNT + SECTION_COUNT - view_index % SECTION_COUNT) % SECTION_COUNT
}

/// Placement of the section with `order_index` when `view_index` is in front.
pub fn slot_for(order_index: usize, view_index: usize) -> SlotPlacement {
    let slot = Slot::from_relative(relative_position(order_index, view_index));
    SlotPlacement {
        slot,
        position: slot.position(),
        opacity_factor: slot.opacity_factor(),
        size_factor: slot.size_factor(),
    }
}

/// The section occupying the front slot for a view index.
#[inline]
pub fn section_at_front(view_index: usize) -> SectionId {
    SectionId::from_order_index(view_index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_front_slot_matches_view_index() {
        for view in 0..SECTION_COUNT {
            let front = section_at_front(view);
            assert_eq!(slot_for(front.order_index(), view).slot, Slot::Front);
        }
    }

    #[test]
    fn test_slot_table_is_a_bijection() {
        for view in 0..SECTION_COUNT {
            let slots: HashSet<Slot> = (0..SECTION_COUNT).map(|s| slot_for(s, view).slot).collect();
            assert_eq!(slots.len(), SECTION_COUNT);

            let positions: Vec<Vec3> = (0..SECTION_COUNT).map(|s| slot_for(s, view).position).collect();
            for i in 0..positions.len() {
                for j in (i + 1)..positions.len() {
                    assert!(positions[i].distance(positions[j]) > 1.0);
                }
            }
        }
    }

    #[test]
    fn test_relative_position_wraps() {
        assert_eq!(relative_position(0, 1), 3);
        assert_eq!(relative_position(3, 0), 3);
        assert_eq!(relative_position(2, 2), 0);
        assert_eq!(relative_position(1, 3), 2);
    }

    #[test]
    fn test_emphasis_factors() {
        let back = slot_for(2, 0);
        assert_eq!(back.slot, Slot::Back);
        assert_eq!(back.opacity_factor, 0.3);
        assert_eq!(back.size_factor, 0.6);

        let right = slot_for(1, 0);
        assert_eq!(right.slot, Slot::Right);
        assert_eq!(right.opacity_factor, 0.6);
    }
}
