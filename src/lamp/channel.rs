//! Channel model: per-lamp state, selection and the derived in-use flag.
//!
//! [`Channels`] owns the only copy of lamp state.  Every mutator
//! recomputes `lamps_in_use` from the array before returning, so the
//! aggregate can never drift from the channels it summarises.

use core::fmt;

use super::{LAMP_COUNT, MAX_BRIGHTNESS, MIN_BRIGHTNESS};

// ---------------------------------------------------------------------------
// Lamp identity
// ---------------------------------------------------------------------------

/// One of the three lamp channels.  Wire index 0..2, label A..C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LampId {
    A = 0,
    B = 1,
    C = 2,
}

impl LampId {
    /// Every lamp in channel order.
    pub const ALL: [LampId; LAMP_COUNT] = [LampId::A, LampId::B, LampId::C];

    /// Wire / array index.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Map a wire index back to a lamp.  `None` for anything but 0..2.
    pub const fn from_index(idx: usize) -> Option<Self> {
        match idx {
            0 => Some(Self::A),
            1 => Some(Self::B),
            2 => Some(Self::C),
            _ => None,
        }
    }

    /// Round-robin successor: A → B → C → A.
    pub const fn next(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::C,
            Self::C => Self::A,
        }
    }

    pub const fn label(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
        }
    }
}

impl fmt::Display for LampId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ---------------------------------------------------------------------------
// Single channel
// ---------------------------------------------------------------------------

/// State of one lamp.
///
/// `value` is kept while the lamp is off so it resumes at the same level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Channel {
    pin: i32,
    is_on: bool,
    is_on_default: bool,
    value: u8,
}

impl Channel {
    fn new(pin: i32, value: u8) -> Self {
        Self {
            pin,
            is_on: false,
            is_on_default: false,
            value: value.clamp(MIN_BRIGHTNESS, MAX_BRIGHTNESS),
        }
    }

    /// Output identifier fixed at construction.
    pub fn pin(&self) -> i32 {
        self.pin
    }

    pub fn is_on(&self) -> bool {
        self.is_on
    }

    /// Whether this lamp was on at the last group-off.
    pub fn is_on_default(&self) -> bool {
        self.is_on_default
    }

    /// Stored brightness (2..=255), preserved while off.
    pub fn value(&self) -> u8 {
        self.value
    }

    /// Level the physical output must settle at: `value` when on, else 0.
    pub fn output_level(&self) -> u8 {
        if self.is_on { self.value } else { 0 }
    }
}

// ---------------------------------------------------------------------------
// Read-only snapshot for observers
// ---------------------------------------------------------------------------

/// Per-lamp view handed to the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LampView {
    pub is_on: bool,
    pub value: u8,
}

/// Copy of everything the display needs; observers never hold live state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelSnapshot {
    pub selected: LampId,
    pub lamps: [LampView; LAMP_COUNT],
    pub lamps_in_use: bool,
}

// ---------------------------------------------------------------------------
// Channel array
// ---------------------------------------------------------------------------

/// The three channels plus the knob selection.
#[derive(Debug, Clone)]
pub struct Channels {
    lamps: [Channel; LAMP_COUNT],
    selected: LampId,
    in_use: bool,
}

impl Channels {
    /// All lamps off at `default_brightness`, lamp A selected.
    pub fn new(pins: [i32; LAMP_COUNT], default_brightness: u8) -> Self {
        Self {
            lamps: pins.map(|pin| Channel::new(pin, default_brightness)),
            selected: LampId::A,
            in_use: false,
        }
    }

    pub fn get(&self, lamp: LampId) -> &Channel {
        &self.lamps[lamp.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (LampId, &Channel)> {
        LampId::ALL.into_iter().zip(self.lamps.iter())
    }

    // ── Selection ─────────────────────────────────────────────

    pub fn selected(&self) -> LampId {
        self.selected
    }

    pub fn selected_channel(&self) -> &Channel {
        self.get(self.selected)
    }

    pub fn select(&mut self, lamp: LampId) {
        self.selected = lamp;
    }

    /// Advance the selection round-robin and return the new selection.
    pub fn select_next(&mut self) -> LampId {
        self.selected = self.selected.next();
        self.selected
    }

    // ── Mutators (all recompute the aggregate) ────────────────

    /// Store a new brightness.
    ///
    /// `0` switches the lamp off and keeps the previous value for resume;
    /// anything else is clamped to 2..=255.  Returns the stored value.
    pub fn set_brightness(&mut self, lamp: LampId, value: u8) -> u8 {
        let ch = &mut self.lamps[lamp.index()];
        if value == 0 {
            ch.is_on = false;
        } else {
            ch.value = value.clamp(MIN_BRIGHTNESS, MAX_BRIGHTNESS);
        }
        let stored = ch.value;
        self.recompute_in_use();
        stored
    }

    /// Set the power flag only.  Driving the output is the fade engine's job.
    pub fn set_on(&mut self, lamp: LampId, on: bool) {
        self.lamps[lamp.index()].is_on = on;
        self.recompute_in_use();
    }

    /// Copy every lamp's `is_on` into `is_on_default` (group-off snapshot).
    pub fn snapshot_defaults(&mut self) {
        for ch in &mut self.lamps {
            ch.is_on_default = ch.is_on;
        }
    }

    // ── Aggregate ─────────────────────────────────────────────

    /// True iff any lamp is on.  Always equal to a fresh recomputation.
    pub fn lamps_in_use(&self) -> bool {
        self.in_use
    }

    fn recompute_in_use(&mut self) {
        self.in_use = self.lamps.iter().any(|ch| ch.is_on);
    }

    /// Read-only copy for the display collaborator.
    pub fn snapshot(&self) -> ChannelSnapshot {
        ChannelSnapshot {
            selected: self.selected,
            lamps: self.lamps.map(|ch| LampView {
                is_on: ch.is_on,
                value: ch.value,
            }),
            lamps_in_use: self.in_use,
        }
    }
}
