//! Fill level monitoring
//!
//! Aggregates per-unit acceptability over a tool set. Unlike the readiness
//! checks, an absent tool set is *not* ok: without a configured tool set the
//! driver must not assume it can skip unload/refill cycles.
//!
//! The monitor never stops the vehicle. It reports, and the fieldwork driver
//! decides.

use super::{ToolCapabilities, WorkTool};

/// Check the fill units of a single tool
///
/// A tool without fill units is trivially ok.
pub fn fill_levels_ok<T: WorkTool + ?Sized>(tool: &T) -> bool {
    if !tool.capabilities().contains(ToolCapabilities::FILL_UNITS) {
        return true;
    }
    tool.fill_units().iter().all(|unit| tool.is_fill_unit_ok(unit))
}

/// Check the fill units of every attached tool
///
/// Returns `false` when no tool set is configured.
pub fn all_fill_levels_ok<T: WorkTool>(tools: Option<&[T]>) -> bool {
    let Some(tools) = tools else {
        return false;
    };

    tools.iter().all(|tool| {
        let ok = fill_levels_ok(tool);
        if !ok {
            log::debug!(
                "Fill level not acceptable on {} ({})",
                tool.name(),
                tool.category().as_str()
            );
        }
        ok
    })
}

/// Warning text of the first tool with an unacceptable fill level
pub fn fill_level_warning<T: WorkTool>(tools: Option<&[T]>) -> Option<&'static str> {
    tools?
        .iter()
        .find(|tool| !fill_levels_ok(*tool))
        .and_then(|tool| tool.fill_level_warning())
}
