//! Fieldwork Driver
//!
//! State machine deciding, on every tick, whether the vehicle works the
//! field, drives the unload/refill course, holds, or waits for its
//! implements.
//!
//! # Behavior
//!
//! - `start(ix)`: drive the alignment course if one is generated, otherwise
//!   enter fieldwork directly and request implements down
//! - Each tick: compute the target speed for the current state, re-assert
//!   it to the speed governor and hand it to the path follower as an upper
//!   bound
//! - Fieldwork: stand still until all implements are ready, then work at
//!   field speed until fill levels call for unload/refill
//! - End of any course: stop
//! - `stop(reason)`: request implements up, then stop the path follower
//!
//! Every transition completes within the call that triggers it. Events are
//! returned to the caller for telemetry; nothing is queued across ticks.

use log::{debug, info, warn};

use super::speed::SpeedPolicy;
use super::state::{FieldworkEvent, FieldworkEvents, FieldworkPhase, OperatingState, StopReason};
use super::traits::{AlignmentCourseGenerator, DrivingCore, PathEvent, PathFollower, Vehicle};
use crate::course::{Course, CourseSplit};
use crate::parameters::FieldworkParams;
use crate::tool::{
    all_fill_levels_ok, are_all_work_tools_raised, are_all_work_tools_ready, fill_level_warning,
};

/// Fieldwork driver
///
/// Owns its collaborators: the vehicle (tools, governor, actuation
/// requests), the path follower and the alignment course generator.
pub struct FieldworkDriver<V, P, A> {
    vehicle: V,
    follower: P,
    aligner: A,
    courses: CourseSplit,
    params: FieldworkParams,
    speed: SpeedPolicy,
    /// Current state (`None` = inactive)
    state: Option<OperatingState>,
    /// State to restore on release from hold
    held_from: Option<OperatingState>,
    /// Main course index given to `start`
    start_ix: usize,
    /// Main course index to resume fieldwork at
    resume_ix: usize,
}

impl<V, P, A> FieldworkDriver<V, P, A>
where
    V: Vehicle,
    P: PathFollower,
    A: AlignmentCourseGenerator,
{
    /// Create an inactive driver for already split courses
    pub fn new(
        vehicle: V,
        follower: P,
        aligner: A,
        courses: CourseSplit,
        params: FieldworkParams,
    ) -> Self {
        let speed = SpeedPolicy::new(&params);
        Self {
            vehicle,
            follower,
            aligner,
            courses,
            params,
            speed,
            state: None,
            held_from: None,
            start_ix: 0,
            resume_ix: 0,
        }
    }

    /// Current operating state (`None` while inactive)
    pub fn state(&self) -> Option<OperatingState> {
        self.state
    }

    /// Main and secondary course
    pub fn courses(&self) -> &CourseSplit {
        &self.courses
    }

    /// Course the path follower is driving, if it is one of ours
    ///
    /// `None` while inactive or on the alignment course.
    pub fn active_course(&self) -> Option<&Course> {
        match self.effective_state()? {
            OperatingState::Fieldwork(_) => Some(&self.courses.main),
            OperatingState::UnloadOrRefill => self.courses.secondary.as_ref(),
            OperatingState::Alignment | OperatingState::Held => None,
        }
    }

    /// Main course index fieldwork resumes at
    pub fn resume_index(&self) -> usize {
        self.resume_ix
    }

    /// Fieldwork parameters in use
    pub fn params(&self) -> &FieldworkParams {
        &self.params
    }

    /// Vehicle collaborator
    pub fn vehicle(&self) -> &V {
        &self.vehicle
    }

    /// Vehicle collaborator (mutable)
    pub fn vehicle_mut(&mut self) -> &mut V {
        &mut self.vehicle
    }

    /// Path follower collaborator
    pub fn follower(&self) -> &P {
        &self.follower
    }

    /// Path follower collaborator (mutable)
    pub fn follower_mut(&mut self) -> &mut P {
        &mut self.follower
    }

    /// Field speed clamped by the vehicle speed limit
    pub fn field_speed(&self) -> f32 {
        self.speed.field_speed(self.vehicle.speed_limit())
    }

    /// Current target speed, re-asserted to the vehicle speed governor
    pub fn speed(&mut self) -> f32 {
        self.speed.speed(&mut self.vehicle)
    }

    /// Target speed computed by the last tick
    pub fn target_speed(&self) -> Option<f32> {
        self.speed.target()
    }

    /// Leave fieldwork for the unload/refill course
    ///
    /// Requests implements up, remembers where to resume fieldwork and
    /// restarts the path follower on the secondary course. Without a
    /// secondary course the driver stops.
    pub fn change_to_unload_or_refill(&mut self) -> FieldworkEvents {
        let mut events = FieldworkEvents::new();
        if self.state.is_none() {
            warn!("Fieldwork: unload/refill requested while inactive, ignored");
            return events;
        }

        if !self.courses.has_secondary() {
            warn!("Fieldwork: no unload/refill course");
            self.stop_into(StopReason::NeedUnloadOrRefill { warning: None }, &mut events);
            return events;
        }

        self.stop_work(&mut events);
        self.record_resume_index();
        self.begin_unload_or_refill(&mut events);
        events
    }

    /// Return to the fieldwork course at the resume index
    ///
    /// A hold over a fieldwork phase is released at the follower's current
    /// waypoint. Implements were never raised, so no new lower request is
    /// issued.
    pub fn change_to_fieldwork(&mut self) -> FieldworkEvents {
        let mut events = FieldworkEvents::new();
        match (self.state, self.effective_state()) {
            (Some(OperatingState::Held), Some(OperatingState::Fieldwork(phase))) => {
                self.record_resume_index();
                self.follower.initialize(self.resume_ix);
                self.held_from = None;
                self.set_state(OperatingState::Fieldwork(phase), &mut events);
            }
            (_, Some(OperatingState::Fieldwork(_))) => {
                debug!("Fieldwork: already on fieldwork course");
            }
            _ => self.start_fieldwork_course(self.resume_ix, &mut events),
        }
        events
    }

    /// Alignment course finished: start fieldwork at the start index
    pub fn on_alignment_course_completed(&mut self) -> FieldworkEvents {
        let mut events = FieldworkEvents::new();
        if self.state == Some(OperatingState::Alignment) {
            self.complete_alignment(&mut events);
        } else {
            debug!("Fieldwork: alignment completion outside alignment, ignored");
        }
        events
    }

    /// Active course ran out of waypoints
    ///
    /// Ending the alignment course starts fieldwork; any other course end
    /// stops the driver.
    pub fn on_end_of_course(&mut self) -> FieldworkEvents {
        let mut events = FieldworkEvents::new();
        self.handle_course_end(&mut events);
        events
    }

    /// Hold the vehicle in place, remembering the current state
    pub fn hold(&mut self) -> FieldworkEvents {
        let mut events = FieldworkEvents::new();
        match self.state {
            None | Some(OperatingState::Held) => {}
            Some(state) => {
                self.held_from = Some(state);
                self.set_state(OperatingState::Held, &mut events);
            }
        }
        events
    }

    /// Release a hold, restoring the state it interrupted
    pub fn release(&mut self) -> FieldworkEvents {
        let mut events = FieldworkEvents::new();
        if self.state == Some(OperatingState::Held) {
            if let Some(previous) = self.held_from.take() {
                self.set_state(previous, &mut events);
            }
        }
        events
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    /// State with a hold looked through
    fn effective_state(&self) -> Option<OperatingState> {
        match self.state? {
            OperatingState::Held => self.held_from,
            state => Some(state),
        }
    }

    fn set_state(&mut self, next: OperatingState, events: &mut FieldworkEvents) {
        if self.state == Some(next) {
            return;
        }
        match self.state {
            Some(previous) => info!("Fieldwork: {} -> {}", previous, next),
            None => info!("Fieldwork: entering {}", next),
        }
        self.state = Some(next);
        let _ = events.push(FieldworkEvent::StateChanged(next));
    }

    /// Implement-start side effect
    fn start_work(&mut self, events: &mut FieldworkEvents) {
        self.vehicle.lower_and_turn_on_all_tools();
        self.vehicle.on_work_start();
        let _ = events.push(FieldworkEvent::WorkStarted);
    }

    /// Implement-stop side effect
    fn stop_work(&mut self, events: &mut FieldworkEvents) {
        self.vehicle.raise_and_turn_off_all_tools();
        self.vehicle.on_work_stop();
        let _ = events.push(FieldworkEvent::WorkStopped);
    }

    fn start_fieldwork_course(&mut self, start_ix: usize, events: &mut FieldworkEvents) {
        let start_ix = self.courses.main.clamp_index(start_ix);
        self.follower.set_course(&self.courses.main);
        self.follower.initialize(start_ix);
        self.held_from = None;
        self.start_work(events);
        self.set_state(
            OperatingState::Fieldwork(FieldworkPhase::WaitingForLower),
            events,
        );
    }

    fn complete_alignment(&mut self, events: &mut FieldworkEvents) {
        info!("Fieldwork: alignment course completed");
        self.start_fieldwork_course(self.start_ix, events);
    }

    fn begin_unload_or_refill(&mut self, events: &mut FieldworkEvents) {
        let Some(course) = self.courses.secondary.as_ref() else {
            self.finish(StopReason::NeedUnloadOrRefill { warning: None }, events);
            return;
        };
        self.follower.set_course(course);
        self.follower.initialize(0);
        self.held_from = None;
        self.set_state(OperatingState::UnloadOrRefill, events);
    }

    fn record_resume_index(&mut self) {
        if self.effective_state().is_some_and(OperatingState::is_fieldwork) {
            self.resume_ix = self
                .courses
                .main
                .clamp_index(self.follower.current_waypoint_index());
            debug!("Fieldwork: resume index {}", self.resume_ix);
        }
    }

    /// Per-tick fieldwork decision, returns the target speed
    fn drive_fieldwork(&mut self, phase: FieldworkPhase, events: &mut FieldworkEvents) -> f32 {
        match phase {
            FieldworkPhase::WaitingForLower => {
                if are_all_work_tools_ready(self.vehicle.work_tools()) {
                    self.set_state(OperatingState::Fieldwork(FieldworkPhase::Working), events);
                    self.field_speed()
                } else {
                    0.0
                }
            }
            FieldworkPhase::Working => {
                if all_fill_levels_ok(self.vehicle.work_tools()) {
                    self.field_speed()
                } else {
                    self.on_fill_levels_not_ok(events)
                }
            }
            FieldworkPhase::WaitingForRaise => {
                if are_all_work_tools_raised(self.vehicle.work_tools()) {
                    self.begin_unload_or_refill(events);
                }
                0.0
            }
        }
    }

    fn on_fill_levels_not_ok(&mut self, events: &mut FieldworkEvents) -> f32 {
        if self.courses.has_secondary() {
            info!("Fieldwork: fill level reached, raising implements");
            self.stop_work(events);
            self.record_resume_index();
            self.set_state(
                OperatingState::Fieldwork(FieldworkPhase::WaitingForRaise),
                events,
            );
            0.0
        } else if self.params.stop_on_fill_level {
            let warning = fill_level_warning(self.vehicle.work_tools());
            self.stop_into(StopReason::NeedUnloadOrRefill { warning }, events);
            0.0
        } else {
            self.field_speed()
        }
    }

    fn handle_course_end(&mut self, events: &mut FieldworkEvents) {
        match self.state {
            Some(OperatingState::Alignment) => self.complete_alignment(events),
            Some(_) => self.stop_into(StopReason::EndOfCourse, events),
            None => {}
        }
    }

    fn stop_into(&mut self, reason: StopReason, events: &mut FieldworkEvents) {
        self.stop_work(events);
        self.finish(reason, events);
    }

    /// Leave the state machine without another implement request
    fn finish(&mut self, reason: StopReason, events: &mut FieldworkEvents) {
        self.follower.stop(reason);
        self.speed.set_target(0.0);
        if reason.warning().is_some() {
            warn!("Fieldwork stopped: {}", reason);
        } else {
            info!("Fieldwork stopped: {}", reason);
        }
        self.state = None;
        self.held_from = None;
        let _ = events.push(FieldworkEvent::Stopped(reason));
    }
}

impl<V, P, A> DrivingCore for FieldworkDriver<V, P, A>
where
    V: Vehicle,
    P: PathFollower,
    A: AlignmentCourseGenerator,
{
    fn start(&mut self, start_ix: usize) -> FieldworkEvents {
        let mut events = FieldworkEvents::new();

        let ix = self.courses.main.clamp_index(start_ix);
        if ix != start_ix {
            warn!("Fieldwork: start index {} beyond course end, using {}", start_ix, ix);
        }
        self.start_ix = ix;
        self.resume_ix = ix;
        self.held_from = None;
        self.speed.clear_target();

        match self.aligner.alignment_course(&self.courses.main, ix) {
            Some(alignment) => {
                info!(
                    "Fieldwork: alignment course with {} waypoints",
                    alignment.len()
                );
                self.follower.set_course(&alignment);
                self.follower.initialize(0);
                self.set_state(OperatingState::Alignment, &mut events);
            }
            None => self.start_fieldwork_course(ix, &mut events),
        }

        events
    }

    fn drive(&mut self, dt: f32) -> FieldworkEvents {
        let mut events = FieldworkEvents::new();
        let Some(state) = self.state else {
            return events;
        };

        let target = match state {
            OperatingState::Alignment => self.field_speed(),
            OperatingState::Fieldwork(phase) => self.drive_fieldwork(phase, &mut events),
            OperatingState::UnloadOrRefill => self.speed.road_speed(),
            OperatingState::Held => 0.0,
        };

        // Fill level handling may have stopped the driver
        if self.state.is_none() {
            return events;
        }

        self.speed.set_target(target);
        let max_speed = self.speed();
        if let Some(PathEvent::EndOfCourse) = self.follower.drive(dt, max_speed) {
            self.handle_course_end(&mut events);
        }

        events
    }

    fn stop(&mut self, reason: StopReason) -> FieldworkEvents {
        let mut events = FieldworkEvents::new();
        self.stop_into(reason, &mut events);
        events
    }

    fn is_active(&self) -> bool {
        self.state.is_some()
    }

    fn name(&self) -> &'static str {
        "Fieldwork"
    }
}
