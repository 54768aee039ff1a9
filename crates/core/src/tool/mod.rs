//! Work Tool Abstraction
//!
//! Capability-tagged interface to the implements attached to a vehicle.
//!
//! # Capabilities
//!
//! Each tool reports a [`ToolCapabilities`] set. Capability-specific queries
//! (fill units, turn-on state, fold state) are only meaningful when the
//! matching capability is present; the checkers in [`readiness`] and
//! [`fill_level`] test the capability before calling them.
//!
//! # Ownership
//!
//! Tools are owned by the vehicle. The fieldwork driver only borrows them
//! for the duration of a single query.

pub mod fill_level;
pub mod readiness;

use bitflags::bitflags;

pub use fill_level::{all_fill_levels_ok, fill_level_warning, fill_levels_ok};
pub use readiness::{
    are_all_work_tools_raised, are_all_work_tools_ready, is_work_tool_raised, is_work_tool_ready,
};

bitflags! {
    /// Optional tool capabilities
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ToolCapabilities: u8 {
        /// Tool carries fill units (tanks, hoppers)
        const FILL_UNITS = 0b0000_0001;
        /// Tool has to be turned on to work
        const TURN_ON = 0b0000_0010;
        /// Tool can fold for transport
        const FOLDABLE = 0b0000_0100;
    }
}

/// Capacity-bearing compartment of a work tool
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FillUnit {
    /// Current fill level (liters)
    pub level: f32,
    /// Capacity (liters)
    pub capacity: f32,
}

impl FillUnit {
    /// Create a new fill unit
    pub const fn new(level: f32, capacity: f32) -> Self {
        Self { level, capacity }
    }

    /// Unit cannot take more material
    pub fn is_full(&self) -> bool {
        self.level >= self.capacity
    }

    /// Unit has nothing left to distribute
    pub fn is_empty(&self) -> bool {
        self.level <= 0.0
    }
}

/// Tool category
///
/// Decides what an acceptable fill level is. Harvesters collect material
/// and must stop when full; sprayers and seeders distribute material and
/// must stop when empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolCategory {
    /// Any fill level is acceptable
    #[default]
    Generic,
    /// Collects material into its fill units
    Harvester,
    /// Distributes liquid from its fill units
    Sprayer,
    /// Distributes seed or fertilizer from its fill units
    Seeder,
}

impl ToolCategory {
    /// Check a fill unit against this category's acceptability rule
    pub fn accepts(self, unit: &FillUnit) -> bool {
        match self {
            ToolCategory::Generic => true,
            ToolCategory::Harvester => !unit.is_full(),
            ToolCategory::Sprayer | ToolCategory::Seeder => !unit.is_empty(),
        }
    }

    /// Category name for logging
    pub fn as_str(self) -> &'static str {
        match self {
            ToolCategory::Generic => "generic",
            ToolCategory::Harvester => "harvester",
            ToolCategory::Sprayer => "sprayer",
            ToolCategory::Seeder => "seeder",
        }
    }
}

/// Attached implement
///
/// Only [`capabilities`](WorkTool::capabilities) and
/// [`is_lowered`](WorkTool::is_lowered) are mandatory. Every other query
/// has a default matching a tool without the corresponding capability.
pub trait WorkTool {
    /// Tool name for logging
    fn name(&self) -> &str;

    /// Capability set of this tool
    fn capabilities(&self) -> ToolCapabilities;

    /// Tool category (defines fill-level acceptability)
    fn category(&self) -> ToolCategory {
        ToolCategory::Generic
    }

    /// Fill units in order (requires [`ToolCapabilities::FILL_UNITS`])
    fn fill_units(&self) -> &[FillUnit] {
        &[]
    }

    /// Acceptability of a single fill unit
    ///
    /// Defaults to the category rule. Tools with special needs override it.
    fn is_fill_unit_ok(&self, unit: &FillUnit) -> bool {
        self.category().accepts(unit)
    }

    /// Human-readable warning shown when the fill level stops the vehicle
    fn fill_level_warning(&self) -> Option<&'static str> {
        None
    }

    /// Whether the driver must see the tool turned on before working
    ///
    /// Defaults to the presence of [`ToolCapabilities::TURN_ON`].
    fn requires_turn_on(&self) -> bool {
        self.capabilities().contains(ToolCapabilities::TURN_ON)
    }

    /// Turn-on state (requires [`ToolCapabilities::TURN_ON`])
    fn is_turned_on(&self) -> bool {
        false
    }

    /// Fold state (requires [`ToolCapabilities::FOLDABLE`])
    fn is_folded(&self) -> bool {
        false
    }

    /// Lowered into working position
    fn is_lowered(&self) -> bool;
}

/// Plain tool with public state, used by tests across the crate
#[cfg(test)]
pub(crate) mod mock {
    use super::*;

    #[derive(Debug, Clone, Copy)]
    pub struct MockTool {
        pub capabilities: ToolCapabilities,
        pub category: ToolCategory,
        pub fill_units: [FillUnit; 2],
        pub fill_unit_count: usize,
        pub turned_on: bool,
        pub folded: bool,
        pub lowered: bool,
        pub warning: Option<&'static str>,
    }

    impl MockTool {
        /// Plain implement: no capabilities, lowered
        pub fn lowered() -> Self {
            Self {
                capabilities: ToolCapabilities::empty(),
                category: ToolCategory::Generic,
                fill_units: [FillUnit::default(); 2],
                fill_unit_count: 0,
                turned_on: false,
                folded: false,
                lowered: true,
                warning: None,
            }
        }

        /// Plain implement: no capabilities, raised
        pub fn raised() -> Self {
            Self {
                lowered: false,
                ..Self::lowered()
            }
        }

        pub fn with_fill_unit(mut self, category: ToolCategory, unit: FillUnit) -> Self {
            self.capabilities |= ToolCapabilities::FILL_UNITS;
            self.category = category;
            self.fill_units[self.fill_unit_count] = unit;
            self.fill_unit_count += 1;
            self
        }
    }

    impl WorkTool for MockTool {
        fn name(&self) -> &str {
            "mock"
        }

        fn capabilities(&self) -> ToolCapabilities {
            self.capabilities
        }

        fn category(&self) -> ToolCategory {
            self.category
        }

        fn fill_units(&self) -> &[FillUnit] {
            &self.fill_units[..self.fill_unit_count]
        }

        fn fill_level_warning(&self) -> Option<&'static str> {
            self.warning
        }

        fn is_turned_on(&self) -> bool {
            self.turned_on
        }

        fn is_folded(&self) -> bool {
            self.folded
        }

        fn is_lowered(&self) -> bool {
            self.lowered
        }
    }
}
