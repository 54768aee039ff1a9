//! Implement readiness checks
//!
//! A tool is ready to work when it is unfolded, turned on (if it needs to
//! be) and lowered. The raised check is the mirror image used while
//! waiting for implements to lift before leaving the field.
//!
//! An absent tool set is vacuously ready and vacuously raised: a vehicle
//! without attachments never has to wait for them.

use super::{ToolCapabilities, WorkTool};

/// Check whether a single tool is ready to work
pub fn is_work_tool_ready<T: WorkTool + ?Sized>(tool: &T) -> bool {
    let caps = tool.capabilities();

    let unfolded = !(caps.contains(ToolCapabilities::FOLDABLE) && tool.is_folded());
    let turned_on = !caps.contains(ToolCapabilities::TURN_ON)
        || !tool.requires_turn_on()
        || tool.is_turned_on();

    unfolded && turned_on && tool.is_lowered()
}

/// Check whether every attached tool is ready to work
///
/// Returns `true` when no tool set is configured.
pub fn are_all_work_tools_ready<T: WorkTool>(tools: Option<&[T]>) -> bool {
    match tools {
        Some(tools) => tools.iter().all(|tool| {
            let ready = is_work_tool_ready(tool);
            if !ready {
                log::trace!("Waiting for {} to lower", tool.name());
            }
            ready
        }),
        None => true,
    }
}

/// Check whether a single tool is raised and switched off
pub fn is_work_tool_raised<T: WorkTool + ?Sized>(tool: &T) -> bool {
    let running = tool.capabilities().contains(ToolCapabilities::TURN_ON)
        && tool.requires_turn_on()
        && tool.is_turned_on();

    !tool.is_lowered() && !running
}

/// Check whether every attached tool is raised and switched off
///
/// Returns `true` when no tool set is configured.
pub fn are_all_work_tools_raised<T: WorkTool>(tools: Option<&[T]>) -> bool {
    tools.map_or(true, |tools| tools.iter().all(|tool| is_work_tool_raised(tool)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::mock::MockTool;

    fn turn_on_tool(turned_on: bool) -> MockTool {
        MockTool {
            capabilities: ToolCapabilities::TURN_ON,
            turned_on,
            ..MockTool::lowered()
        }
    }

    fn foldable_tool(folded: bool) -> MockTool {
        MockTool {
            capabilities: ToolCapabilities::FOLDABLE,
            folded,
            ..MockTool::lowered()
        }
    }

    #[test]
    fn test_absent_tool_set_is_ready() {
        assert!(are_all_work_tools_ready::<MockTool>(None));
    }

    #[test]
    fn test_empty_tool_set_is_ready() {
        assert!(are_all_work_tools_ready::<MockTool>(Some(&[])));
    }

    #[test]
    fn test_all_ready_tools() {
        let tools = [MockTool::lowered(), turn_on_tool(true), foldable_tool(false)];
        assert!(are_all_work_tools_ready(Some(&tools[..])));
    }

    #[test]
    fn test_not_lowered_tool_blocks() {
        let tools = [MockTool::lowered(), MockTool::raised()];
        assert!(!are_all_work_tools_ready(Some(&tools[..])));
    }

    #[test]
    fn test_folded_tool_blocks() {
        assert!(!is_work_tool_ready(&foldable_tool(true)));
    }

    #[test]
    fn test_turned_off_tool_blocks_when_required() {
        assert!(!is_work_tool_ready(&turn_on_tool(false)));
    }

    #[test]
    fn test_fold_state_ignored_without_capability() {
        // Reports folded, but cannot fold: treated as unfolded
        let tool = MockTool {
            folded: true,
            ..MockTool::lowered()
        };
        assert!(is_work_tool_ready(&tool));
    }

    #[test]
    fn test_tool_without_turn_on_counts_as_on() {
        let tool = MockTool {
            turned_on: false,
            ..MockTool::lowered()
        };
        assert!(is_work_tool_ready(&tool));
    }

    #[test]
    fn test_raised_checks() {
        assert!(are_all_work_tools_raised::<MockTool>(None));
        assert!(is_work_tool_raised(&MockTool::raised()));
        assert!(!is_work_tool_raised(&MockTool::lowered()));

        let still_running = MockTool {
            lowered: false,
            ..turn_on_tool(true)
        };
        assert!(!is_work_tool_raised(&still_running));

        let tools = [MockTool::raised(), MockTool::lowered()];
        assert!(!are_all_work_tools_raised(Some(&tools[..])));
    }
}
