//! Action vocabulary, the per-cycle [`ActionSet`], and aggregation.
//!
//! Every [`Action`] owns one bit of a `u8`; two adjacent bits belong to
//! one device class. An [`ActionSet`] is that bitmask, so "at most one
//! action per device class" is checked with a single AND against the
//! class mask.
//!
//! ```text
//!   bit   7          6         5      4     3       2      1         0
//!       BlindsDown BlindsUp  AcOff  AcOn  HeatOff HeatOn LightOff LightOn
//!       └──── Blinds ────┘  └─ Ac ──┘    └─ Heating ─┘  └──── Light ───┘
//! ```

use core::fmt;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::rules::DeviceClass;

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// A discrete actuation command for one device class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Action {
    NoAction = 0,
    LightOn = 0b0000_0001,
    LightOff = 0b0000_0010,
    HeatOn = 0b0000_0100,
    HeatOff = 0b0000_1000,
    AcOn = 0b0001_0000,
    AcOff = 0b0010_0000,
    BlindsUp = 0b0100_0000,
    BlindsDown = 0b1000_0000,
}

impl Action {
    /// Every action except `NoAction`, in bit order.
    pub const ALL: [Action; 8] = [
        Action::LightOn,
        Action::LightOff,
        Action::HeatOn,
        Action::HeatOff,
        Action::AcOn,
        Action::AcOff,
        Action::BlindsUp,
        Action::BlindsDown,
    ];

    /// Return the bitmask for this action (`0` for `NoAction`).
    pub const fn mask(self) -> u8 {
        self as u8
    }

    /// The device class this action drives, `None` for `NoAction`.
    pub fn device_class(self) -> Option<DeviceClass> {
        match self {
            Self::NoAction => None,
            Self::LightOn | Self::LightOff => Some(DeviceClass::Light),
            Self::HeatOn | Self::HeatOff => Some(DeviceClass::Heating),
            Self::AcOn | Self::AcOff => Some(DeviceClass::Ac),
            Self::BlindsUp | Self::BlindsDown => Some(DeviceClass::Blinds),
        }
    }

    /// True for the energy-saving side of each device pair.
    pub fn is_conservative(self) -> bool {
        matches!(
            self,
            Self::LightOff | Self::HeatOff | Self::AcOff | Self::BlindsDown
        )
    }

    /// Class name of this action in the smart-home knowledge base.
    pub fn kb_name(self) -> &'static str {
        match self {
            Self::NoAction => "NessunaAzione",
            Self::LightOn => "AccendiLuce",
            Self::LightOff => "SpegniLuce",
            Self::HeatOn => "AccendiRiscaldamento",
            Self::HeatOff => "SpegniRiscaldamento",
            Self::AcOn => "AccendiClimatizzatore",
            Self::AcOff => "SpegniClimatizzatore",
            Self::BlindsUp => "AlzaTapparelle",
            Self::BlindsDown => "AbbassaTapparelle",
        }
    }

    fn from_bit(bit: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.mask() == bit)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// ---------------------------------------------------------------------------
// ActionSet
// ---------------------------------------------------------------------------

/// Two different actions for the same device class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conflict {
    pub existing: Action,
    pub rejected: Action,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} conflicts with {}", self.rejected, self.existing)
    }
}

/// Set of actions issued in one cycle. Never holds `NoAction`, never holds
/// two actions for one device class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "Vec<Action>", try_from = "Vec<Action>")]
pub struct ActionSet {
    bits: u8,
}

impl ActionSet {
    pub const fn new() -> Self {
        Self { bits: 0 }
    }

    /// Insert an action.
    ///
    /// Returns `Ok(true)` if it was added, `Ok(false)` if it was already
    /// present or is `NoAction`, and `Err` if another action for the same
    /// device class is already in the set.
    pub fn insert(&mut self, action: Action) -> Result<bool, Conflict> {
        let Some(class) = action.device_class() else {
            return Ok(false);
        };
        if let Some(existing) = self.for_class(class) {
            if existing == action {
                return Ok(false);
            }
            return Err(Conflict {
                existing,
                rejected: action,
            });
        }
        self.bits |= action.mask();
        Ok(true)
    }

    pub fn contains(&self, action: Action) -> bool {
        action != Action::NoAction && self.bits & action.mask() != 0
    }

    /// The action issued for `class`, if any.
    pub fn for_class(&self, class: DeviceClass) -> Option<Action> {
        Action::from_bit(self.bits & class.mask())
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Iterate in bit order (Light, Heating, Ac, Blinds).
    pub fn iter(&self) -> impl Iterator<Item = Action> + '_ {
        Action::ALL.into_iter().filter(|a| self.bits & a.mask() != 0)
    }
}

impl From<ActionSet> for Vec<Action> {
    fn from(set: ActionSet) -> Self {
        set.iter().collect()
    }
}

impl TryFrom<Vec<Action>> for ActionSet {
    type Error = Conflict;

    fn try_from(actions: Vec<Action>) -> Result<Self, Self::Error> {
        let mut set = ActionSet::new();
        for a in actions {
            set.insert(a)?;
        }
        Ok(set)
    }
}

impl fmt::Display for ActionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, a) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{a}")?;
        }
        write!(f, "}}")
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Result of [`aggregate_detailed`]: the accepted set plus every action that
/// lost a same-class conflict.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Aggregation {
    pub actions: ActionSet,
    pub overridden: heapless::Vec<Action, 8>,
}

/// Collect per-device and combined actions into one [`ActionSet`].
///
/// `NoAction` is dropped and duplicates collapse. See [`aggregate_detailed`]
/// for how same-class conflicts are settled.
pub fn aggregate(per_device: &[Action], combined: &[Action]) -> ActionSet {
    aggregate_detailed(per_device, combined).actions
}

/// Like [`aggregate`], also reporting overridden actions.
///
/// For each device class, a per-device action beats a combined one; two
/// actions from the same source resolve to the conservative one. The
/// outcome depends only on which actions are present, never on order.
pub fn aggregate_detailed(per_device: &[Action], combined: &[Action]) -> Aggregation {
    let primary = mask_of(per_device);
    let secondary = mask_of(combined);

    let mut out = Aggregation::default();
    for class in DeviceClass::ALL {
        let class_bits = (primary | secondary) & class.mask();
        let chosen = pick(primary & class.mask()).or_else(|| pick(secondary & class.mask()));

        // Empty class bits are the only way to get no pick.
        let Some(kept) = chosen else { continue };
        out.actions.bits |= kept.mask();
        for dropped in Action::ALL {
            if class_bits & dropped.mask() != 0 && dropped != kept {
                debug!("{class:?}: {dropped} overridden by {kept}");
                let _ = out.overridden.push(dropped);
            }
        }
    }
    trace!("aggregate -> {}", out.actions);
    out
}

fn mask_of(actions: &[Action]) -> u8 {
    actions.iter().fold(0, |bits, a| bits | a.mask())
}

/// Choose one action from the bits of a single device class.
fn pick(class_bits: u8) -> Option<Action> {
    match class_bits.count_ones() {
        0 => None,
        1 => Action::from_bit(class_bits),
        _ => Action::ALL
            .into_iter()
            .find(|a| class_bits & a.mask() != 0 && a.is_conservative()),
    }
}

// ---------------------------------------------------------------------------
// Tally
// ---------------------------------------------------------------------------

/// Running count of issued actions per kind, across rooms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActionTally {
    counts: [u32; 8],
}

impl ActionTally {
    pub fn record(&mut self, set: &ActionSet) {
        for (i, a) in Action::ALL.into_iter().enumerate() {
            if set.contains(a) {
                self.counts[i] = self.counts[i].saturating_add(1);
            }
        }
    }

    pub fn count(&self, action: Action) -> u32 {
        Action::ALL
            .iter()
            .position(|a| *a == action)
            .map_or(0, |i| self.counts[i])
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// Non-zero counts in bit order.
    pub fn iter(&self) -> impl Iterator<Item = (Action, u32)> + '_ {
        Action::ALL
            .into_iter()
            .zip(self.counts)
            .filter(|(_, n)| *n > 0)
    }
}
