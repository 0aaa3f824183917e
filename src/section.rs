//! Navigation sections and their fixed carousel order.

use glam::Vec3;
use std::fmt;

/// Number of sections on the carousel. The slot table is built for exactly this many.
pub const SECTION_COUNT: usize = 4;

/// A navigation target that forms a word in the particle field.
///
/// The declaration order is the cyclic carousel order, so `Home` sits in
/// front at view index 0, `Projects` at view index 1, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SectionId {
    Home,
    Projects,
    About,
    Contact,
}

impl SectionId {
    /// All sections in carousel order.
    pub const ALL: [SectionId; SECTION_COUNT] = [
        SectionId::Home,
        SectionId::Projects,
        SectionId::About,
        SectionId::Contact,
    ];

    /// Position of this section in the cyclic order (0..4).
    #[inline]
    pub fn order_index(self) -> usize {
        match self {
            SectionId::Home => 0,
            SectionId::Projects => 1,
            SectionId::About => 2,
            SectionId::Contact => 3,
        }
    }

    /// Section at the given order index, wrapping around the carousel.
    #[inline]
    pub fn from_order_index(index: usize) -> Self {
        Self::ALL[index % SECTION_COUNT]
    }

    /// Text drawn by the particles.
    pub fn label(self) -> &'static str {
        match self {
            SectionId::Home => "Home",
            SectionId::Projects => "Projects",
            SectionId::About => "About",
            SectionId::Contact => "Contact",
        }
    }

    /// Route handed to the navigator when this section is confirmed.
    pub fn route(self) -> &'static str {
        match self {
            SectionId::Home => "/home",
            SectionId::Projects => "/projects",
            SectionId::About => "/about",
            SectionId::Contact => "/contact",
        }
    }

    /// Base RGB color of the word, before slot opacity is applied.
    pub fn display_color(self) -> Vec3 {
        match self {
            SectionId::Home => rgb(0x47A0FF),
            SectionId::Projects => rgb(0x00E5BA),
            SectionId::About => rgb(0xB467FF),
            SectionId::Contact => rgb(0xFF6B47),
        }
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Convert a 0xRRGGBB literal into a normalized color.
fn rgb(hex: u32) -> Vec3 {
    Vec3::new(
        ((hex >> 16) & 0xFF) as f32 / 255.0,
        ((hex >> 8) & 0xFF) as f32 / 255.0,
        (hex & 0xFF) as f32 / 255.0,
    )
}
