//! Per-backend color-pair registry.
//!
//! Turns caller RGB into what the substrate can show. In fullcolor mode
//! every distinct RGB gets its own custom palette slot, starting at
//! [`CUSTOM_SLOT_BASE`] and never reused within a session; repeated
//! requests hit a cache. When slots run out, or the backend is in basic
//! mode, colors fall back to [`approximate_basic_color`].
//!
//! A registry belongs to exactly one backend instance. It is created at
//! `initialize()` and dropped at `shutdown()`.

use crate::color::{approximate_basic_color, BasicColor, Rgb};
use crate::error::ValidationError;
use std::collections::{BTreeMap, HashMap};

/// First custom slot; slots below it hold the fixed palette.
pub const CUSTOM_SLOT_BASE: u16 = 16;

/// Highest color-pair id.
pub const MAX_COLOR_PAIR: u8 = 255;

/// A color as the substrate will show it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolvedColor {
    /// Custom slot holding an exact RGB.
    Custom {
        /// Palette slot.
        slot: u16,
        /// Exact color stored in the slot.
        rgb: Rgb,
    },
    /// Entry of the fixed palette.
    Basic(BasicColor),
}

impl ResolvedColor {
    /// RGB this resolution displays as.
    #[must_use]
    pub const fn rgb(self) -> Rgb {
        match self {
            Self::Custom { rgb, .. } => rgb,
            Self::Basic(basic) => basic.to_rgb(),
        }
    }
}

/// A color pair as requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorPair {
    /// Pair id (1..=255).
    pub id: u8,
    /// Requested foreground.
    pub fg: Rgb,
    /// Requested background.
    pub bg: Rgb,
}

/// A registered pair with its resolved colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisteredPair {
    /// What the caller asked for.
    pub pair: ColorPair,
    /// Resolved foreground.
    pub fg: ResolvedColor,
    /// Resolved background.
    pub bg: ResolvedColor,
}

/// Check a `color_pair` argument of a drawing operation.
pub fn validate_color_pair(color_pair: i32) -> Result<u8, ValidationError> {
    u8::try_from(color_pair).map_err(|_| ValidationError::ColorPairOutOfRange {
        value: i64::from(color_pair),
    })
}

/// Check a `pair_id` argument of `init_color_pair`.
pub fn validate_pair_id(pair_id: i32) -> Result<u8, ValidationError> {
    match u8::try_from(pair_id) {
        Ok(0) => Err(ValidationError::ColorPairReserved),
        Ok(id) => Ok(id),
        Err(_) => Err(ValidationError::PairIdOutOfRange {
            value: i64::from(pair_id),
        }),
    }
}

/// Color-pair and custom-slot bookkeeping for one backend session.
#[derive(Debug, Clone)]
pub struct ColorRegistry {
    fullcolor: bool,
    /// Exclusive upper bound on slots; `None` means unbounded.
    slot_limit: Option<u16>,
    next_slot: u16,
    slot_cache: HashMap<Rgb, u16>,
    pairs: BTreeMap<u8, RegisteredPair>,
    /// Slots allocated since the last drain, for substrates that must define them.
    pending_slots: Vec<(u16, Rgb)>,
    default_fg: ResolvedColor,
    default_bg: ResolvedColor,
    exhaustion_logged: bool,
}

impl Default for ColorRegistry {
    fn default() -> Self {
        Self::basic()
    }
}

impl ColorRegistry {
    /// Create a registry.
    ///
    /// `slot_limit` is the substrate's color count (256 for a 256-color
    /// terminal); `None` for substrates that take arbitrary RGB.
    #[must_use]
    pub fn new(fullcolor: bool, slot_limit: Option<u16>) -> Self {
        Self {
            fullcolor,
            slot_limit,
            next_slot: CUSTOM_SLOT_BASE,
            slot_cache: HashMap::new(),
            pairs: BTreeMap::new(),
            pending_slots: Vec::new(),
            default_fg: ResolvedColor::Basic(BasicColor::White),
            default_bg: ResolvedColor::Basic(BasicColor::Black),
            exhaustion_logged: false,
        }
    }

    /// Registry restricted to the 8-color palette.
    #[must_use]
    pub fn basic() -> Self {
        Self::new(false, Some(CUSTOM_SLOT_BASE))
    }

    /// Fullcolor registry with no slot limit (pixel substrates).
    #[must_use]
    pub fn unbounded() -> Self {
        Self::new(true, None)
    }

    /// Whether new colors get exact custom slots.
    #[must_use]
    pub const fn is_fullcolor(&self) -> bool {
        self.fullcolor
    }

    /// Switch between fullcolor and approximation for colors resolved from now on.
    pub fn set_fullcolor(&mut self, enabled: bool) {
        self.fullcolor = enabled;
    }

    /// Next slot that would be allocated.
    #[must_use]
    pub const fn next_slot(&self) -> u16 {
        self.next_slot
    }

    /// Number of distinct RGB values holding a slot.
    #[must_use]
    pub fn slots_used(&self) -> usize {
        self.slot_cache.len()
    }

    /// Resolve one RGB value, allocating a slot if needed.
    pub fn resolve(&mut self, rgb: Rgb) -> ResolvedColor {
        if !self.fullcolor {
            return ResolvedColor::Basic(approximate_basic_color(rgb));
        }
        if let Some(&slot) = self.slot_cache.get(&rgb) {
            return ResolvedColor::Custom { slot, rgb };
        }
        if self.slot_limit.is_some_and(|limit| self.next_slot >= limit) || self.next_slot == u16::MAX {
            if !self.exhaustion_logged {
                tracing::warn!(
                    next_slot = self.next_slot,
                    "custom color slots exhausted, approximating remaining colors"
                );
                self.exhaustion_logged = true;
            }
            return ResolvedColor::Basic(approximate_basic_color(rgb));
        }
        let slot = self.next_slot;
        self.next_slot += 1;
        self.slot_cache.insert(rgb, slot);
        self.pending_slots.push((slot, rgb));
        tracing::trace!(slot, %rgb, "allocated custom color slot");
        ResolvedColor::Custom { slot, rgb }
    }

    /// Register a pair. The first registration of an id wins.
    ///
    /// Returns `Ok(true)` if the pair was added, `Ok(false)` if the id was
    /// already registered (nothing changes).
    pub fn register(&mut self, pair_id: i32, fg: Rgb, bg: Rgb) -> Result<bool, ValidationError> {
        let id = validate_pair_id(pair_id)?;
        if self.pairs.contains_key(&id) {
            return Ok(false);
        }
        let fg_resolved = self.resolve(fg);
        let bg_resolved = self.resolve(bg);
        self.pairs.insert(
            id,
            RegisteredPair {
                pair: ColorPair { id, fg, bg },
                fg: fg_resolved,
                bg: bg_resolved,
            },
        );
        Ok(true)
    }

    /// Check if a pair id is registered.
    #[must_use]
    pub fn is_registered(&self, id: u8) -> bool {
        self.pairs.contains_key(&id)
    }

    /// Registered pair, if any.
    #[must_use]
    pub fn get(&self, id: u8) -> Option<&RegisteredPair> {
        self.pairs.get(&id)
    }

    /// Colors to draw `color_pair` with. Pair 0 and unregistered ids use the defaults.
    #[must_use]
    pub fn colors(&self, color_pair: u8) -> (ResolvedColor, ResolvedColor) {
        self.pairs
            .get(&color_pair)
            .map_or((self.default_fg, self.default_bg), |p| (p.fg, p.bg))
    }

    /// Default foreground and background (pair 0).
    #[must_use]
    pub const fn defaults(&self) -> (ResolvedColor, ResolvedColor) {
        (self.default_fg, self.default_bg)
    }

    /// Change the background used by pair 0 and blank cells.
    pub fn set_default_background(&mut self, bg: Rgb) {
        self.default_bg = self.resolve(bg);
    }

    /// Forget every pair except 1 and every custom slot, then re-resolve pair 1.
    ///
    /// Used when the host switches color schemes.
    pub fn clear_cache(&mut self) {
        let keep = self.pairs.get(&1).map(|p| p.pair);
        self.pairs.clear();
        self.slot_cache.clear();
        self.pending_slots.clear();
        self.next_slot = CUSTOM_SLOT_BASE;
        self.exhaustion_logged = false;
        if let Some(pair) = keep {
            let fg = self.resolve(pair.fg);
            let bg = self.resolve(pair.bg);
            self.pairs.insert(1, RegisteredPair { pair, fg, bg });
        }
        tracing::debug!("color cache cleared");
    }

    /// Take slots allocated since the last call.
    pub fn drain_pending_slots(&mut self) -> Vec<(u16, Rgb)> {
        std::mem::take(&mut self.pending_slots)
    }

    /// Forget pending slots, for outputs that take RGB directly.
    pub fn discard_pending_slots(&mut self) {
        self.pending_slots.clear();
    }

    /// Slots allocated and not yet drained.
    #[must_use]
    pub fn pending_slot_count(&self) -> usize {
        self.pending_slots.len()
    }

    /// Number of registered pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Check if no pair is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Registered pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredPair> {
        self.pairs.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const RED: Rgb = Rgb::new(255, 0, 0);
    const GREEN: Rgb = Rgb::new(0, 255, 0);

    #[test]
    fn test_first_registration_wins() {
        let mut reg = ColorRegistry::unbounded();
        assert!(reg.register(1, RED, Rgb::BLACK).unwrap());
        assert!(!reg.register(1, GREEN, Rgb::WHITE).unwrap());
        let pair = reg.get(1).unwrap();
        assert_eq!(pair.pair.fg, RED);
        assert_eq!(pair.pair.bg, Rgb::BLACK);
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_pair_zero_reserved() {
        let mut reg = ColorRegistry::basic();
        assert_eq!(
            reg.register(0, RED, Rgb::BLACK),
            Err(ValidationError::ColorPairReserved)
        );
        assert!(reg.is_empty());
    }

    #[test]
    fn test_pair_id_range() {
        let mut reg = ColorRegistry::basic();
        assert!(matches!(
            reg.register(256, RED, Rgb::BLACK),
            Err(ValidationError::PairIdOutOfRange { value: 256 })
        ));
        assert!(matches!(
            reg.register(-1, RED, Rgb::BLACK),
            Err(ValidationError::PairIdOutOfRange { value: -1 })
        ));
        assert!(reg.register(255, RED, Rgb::BLACK).unwrap());
    }

    #[test]
    fn test_slots_start_at_base_and_are_cached() {
        let mut reg = ColorRegistry::new(true, Some(256));
        assert_eq!(reg.resolve(RED), ResolvedColor::Custom { slot: 16, rgb: RED });
        assert_eq!(reg.resolve(GREEN), ResolvedColor::Custom { slot: 17, rgb: GREEN });
        assert_eq!(reg.resolve(RED), ResolvedColor::Custom { slot: 16, rgb: RED });
        assert_eq!(reg.next_slot(), 18);
        assert_eq!(reg.slots_used(), 2);
    }

    #[test]
    fn test_slot_exhaustion_falls_back() {
        let mut reg = ColorRegistry::new(true, Some(18));
        reg.resolve(Rgb::new(1, 1, 1));
        reg.resolve(Rgb::new(2, 2, 2));
        assert_eq!(reg.resolve(RED), ResolvedColor::Basic(BasicColor::Red));
        assert_eq!(reg.next_slot(), 18);
    }

    #[test]
    fn test_basic_mode_approximates() {
        let mut reg = ColorRegistry::basic();
        reg.register(3, Rgb::new(255, 255, 0), Rgb::new(10, 10, 10)).unwrap();
        let (fg, bg) = reg.colors(3);
        assert_eq!(fg, ResolvedColor::Basic(BasicColor::Yellow));
        assert_eq!(bg, ResolvedColor::Basic(BasicColor::Black));
        assert!(reg.drain_pending_slots().is_empty());
    }

    #[test]
    fn test_unregistered_pair_uses_defaults() {
        let reg = ColorRegistry::basic();
        assert_eq!(reg.colors(0), reg.defaults());
        assert_eq!(reg.colors(42), reg.defaults());
    }

    #[test]
    fn test_default_background_update() {
        let mut reg = ColorRegistry::unbounded();
        reg.set_default_background(Rgb::new(0, 0, 40));
        assert_eq!(reg.colors(0).1.rgb(), Rgb::new(0, 0, 40));
    }

    #[test]
    fn test_clear_cache_keeps_pair_one() {
        let mut reg = ColorRegistry::new(true, Some(256));
        reg.register(1, Rgb::WHITE, Rgb::BLACK).unwrap();
        reg.register(2, RED, GREEN).unwrap();
        assert_eq!(reg.next_slot(), 20);

        reg.clear_cache();

        assert!(reg.is_registered(1));
        assert!(!reg.is_registered(2));
        // Pair 1 re-resolved into the first two slots.
        assert_eq!(reg.next_slot(), 18);
        assert!(reg.register(2, GREEN, RED).unwrap());
    }

    #[test]
    fn test_pending_slots_drain_once() {
        let mut reg = ColorRegistry::unbounded();
        reg.register(1, RED, GREEN).unwrap();
        assert_eq!(reg.drain_pending_slots(), vec![(16, RED), (17, GREEN)]);
        assert!(reg.drain_pending_slots().is_empty());
    }

    #[test]
    fn test_discard_pending_slots() {
        let mut reg = ColorRegistry::unbounded();
        reg.register(1, RED, GREEN).unwrap();
        assert_eq!(reg.pending_slot_count(), 2);
        reg.discard_pending_slots();
        assert_eq!(reg.pending_slot_count(), 0);
        assert!(reg.drain_pending_slots().is_empty());
        // Slot numbering is unaffected.
        let blue = Rgb::new(0, 0, 255);
        reg.register(2, blue, RED).unwrap();
        assert_eq!(reg.drain_pending_slots(), vec![(18, blue)]);
    }

    #[test]
    fn test_fullcolor_toggle() {
        let mut reg = ColorRegistry::unbounded();
        reg.set_fullcolor(false);
        assert!(!reg.is_fullcolor());
        assert_eq!(reg.resolve(RED), ResolvedColor::Basic(BasicColor::Red));
    }

    #[test]
    fn test_validate_color_pair() {
        assert_eq!(validate_color_pair(0), Ok(0));
        assert_eq!(validate_color_pair(255), Ok(255));
        assert!(validate_color_pair(256).is_err());
        assert!(validate_color_pair(-1).is_err());
    }

    proptest! {
        #[test]
        fn prop_invalid_pair_ids_rejected(id in prop_oneof![i32::MIN..=0, 256..=i32::MAX]) {
            let mut reg = ColorRegistry::basic();
            prop_assert!(reg.register(id, RED, GREEN).is_err());
            prop_assert!(reg.is_empty());
        }

        #[test]
        fn prop_reregistration_is_noop(id in 1i32..=255, r in 0u8..=255, g in 0u8..=255) {
            let mut reg = ColorRegistry::new(true, Some(256));
            reg.register(id, RED, GREEN).unwrap();
            let slots_before = reg.next_slot();
            let before = *reg.get(id as u8).unwrap();
            prop_assert!(!reg.register(id, Rgb::new(r, g, 0), Rgb::new(0, g, r)).unwrap());
            prop_assert_eq!(*reg.get(id as u8).unwrap(), before);
            prop_assert_eq!(reg.next_slot(), slots_before);
        }

        #[test]
        fn prop_slots_monotonic(colors in prop::collection::vec((0u8..=255, 0u8..=255, 0u8..=255), 1..64)) {
            let mut reg = ColorRegistry::unbounded();
            let mut last = CUSTOM_SLOT_BASE;
            for (r, g, b) in colors {
                reg.resolve(Rgb::new(r, g, b));
                prop_assert!(reg.next_slot() >= last);
                last = reg.next_slot();
            }
        }
    }
}
