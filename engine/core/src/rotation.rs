//! Procedural Rotation
//!
//! Per-axis sinusoidal rotation for the button mesh, with independently
//! pausable axes, plus the exponential glides behind hover/press feedback.
//!
//! # Freeze Semantics
//!
//! A paused axis is simply not recomputed: it holds whatever angle it last
//! had, which is not necessarily zero or any canonical resting pose. The
//! held value keeps flowing to consumers every tick so telemetry shows the
//! frozen angle.

use serde::{Deserialize, Serialize};

use crate::events::Axis;

/// Sinusoid parameters for one axis.
///
/// The instantaneous angle at elapsed time `t` seconds is
/// `phase + sin(t * frequency) * amplitude`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AxisProfile {
    /// Peak deflection in degrees.
    pub amplitude_deg: f32,
    /// Multiplier applied to elapsed seconds inside the sine.
    pub frequency: f32,
    /// Constant offset in radians.
    pub phase: f32,
}

impl AxisProfile {
    /// Closed-form angle in radians at elapsed time `t` seconds.
    #[must_use]
    pub fn angle_at(&self, t: f32) -> f32 {
        self.phase + (t * self.frequency).sin() * self.amplitude_deg.to_radians()
    }
}

/// Default axis profiles, X/Y/Z order.
///
/// X tilts forward/back with a constant -0.3 rad lean, Y swings east/west,
/// Z rolls with a slightly smaller sweep.
#[must_use]
pub fn default_profiles() -> [AxisProfile; 3] {
    [
        AxisProfile {
            amplitude_deg: 30.0,
            frequency: 0.8,
            phase: -0.3,
        },
        AxisProfile {
            amplitude_deg: 30.0,
            frequency: 0.6,
            phase: 0.0,
        },
        AxisProfile {
            amplitude_deg: 25.0,
            frequency: 0.7,
            phase: 0.0,
        },
    ]
}

/// Live rotation telemetry in radians. Frozen axes report their held value.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RotationSnapshot {
    /// X-axis angle.
    pub x: f32,
    /// Y-axis angle.
    pub y: f32,
    /// Z-axis angle.
    pub z: f32,
}

/// Drives the button mesh rotation.
#[derive(Clone, Debug)]
pub struct AxisRotationController {
    /// Per-axis sinusoid parameters.
    profiles: [AxisProfile; 3],
    /// Last computed angle per axis.
    angles: [f32; 3],
    /// Pause flag per axis.
    paused: [bool; 3],
}

impl AxisRotationController {
    /// Create a controller posed at `t = 0` so the first frame already
    /// matches the curve.
    #[must_use]
    pub fn new(profiles: [AxisProfile; 3]) -> Self {
        let angles = [
            profiles[0].angle_at(0.0),
            profiles[1].angle_at(0.0),
            profiles[2].angle_at(0.0),
        ];
        Self {
            profiles,
            angles,
            paused: [false; 3],
        }
    }

    /// Recompute unpaused axes for elapsed time `t` seconds. Paused axes
    /// hold their last value.
    pub fn advance(&mut self, t: f32) {
        for axis in Axis::ALL {
            let i = axis.index();
            if !self.paused[i] {
                self.angles[i] = self.profiles[i].angle_at(t);
            }
        }
    }

    /// Toggle the pause flag for one axis. Returns the new flag.
    pub fn toggle(&mut self, axis: Axis) -> bool {
        let i = axis.index();
        self.paused[i] = !self.paused[i];
        self.paused[i]
    }

    /// Whether an axis is paused.
    #[must_use]
    pub fn is_paused(&self, axis: Axis) -> bool {
        self.paused[axis.index()]
    }

    /// Current angles, frozen axes included.
    #[must_use]
    pub fn angles(&self) -> RotationSnapshot {
        RotationSnapshot {
            x: self.angles[0],
            y: self.angles[1],
            z: self.angles[2],
        }
    }
}

impl Default for AxisRotationController {
    fn default() -> Self {
        Self::new(default_profiles())
    }
}

/// One exponentially interpolated scalar.
#[derive(Clone, Copy, Debug)]
pub struct Glide {
    value: f32,
    target: f32,
    rate: f32,
}

impl Glide {
    /// Create a glide resting at `initial`, moving `rate` of the remaining
    /// distance per tick.
    #[must_use]
    pub fn new(initial: f32, rate: f32) -> Self {
        Self {
            value: initial,
            target: initial,
            rate,
        }
    }

    /// Retarget the glide; the value eases over the following ticks.
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Move a fixed fraction of the remaining distance. Once per tick.
    pub fn tick(&mut self) {
        self.value += (self.target - self.value) * self.rate;
    }

    /// Current value.
    #[must_use]
    pub fn value(&self) -> f32 {
        self.value
    }
}

/// Hover/press feedback for the button: scale, glow, press depth.
///
/// Targets come from discrete pointer booleans; the values ease toward them
/// every tick and are never gated by axis pause.
#[derive(Clone, Copy, Debug)]
pub struct ButtonDynamics {
    scale: Glide,
    glow: Glide,
    depth: Glide,
}

/// Interpolation factor per tick for all button glides.
const GLIDE_RATE: f32 = 0.1;

impl ButtonDynamics {
    /// Create the dynamics at their resting pose.
    #[must_use]
    pub fn new() -> Self {
        Self {
            scale: Glide::new(1.0, GLIDE_RATE),
            glow: Glide::new(0.2, GLIDE_RATE),
            depth: Glide::new(0.0, GLIDE_RATE),
        }
    }

    /// Pointer entered or left the button.
    pub fn set_hovered(&mut self, hovered: bool) {
        self.scale.set_target(if hovered { 1.2 } else { 1.0 });
        self.glow.set_target(if hovered { 1.0 } else { 0.2 });
    }

    /// Button pressed down or released. Pressing sinks the mesh slightly.
    pub fn set_pressed(&mut self, pressed: bool) {
        self.depth.set_target(if pressed { -1.0 } else { 0.0 });
    }

    /// Advance all glides by one tick.
    pub fn tick(&mut self) {
        self.scale.tick();
        self.glow.tick();
        self.depth.tick();
    }

    /// Current scale multiplier.
    #[must_use]
    pub fn scale(&self) -> f32 {
        self.scale.value()
    }

    /// Current emissive glow intensity.
    #[must_use]
    pub fn glow(&self) -> f32 {
        self.glow.value()
    }

    /// Current press depth along Z.
    #[must_use]
    pub fn depth(&self) -> f32 {
        self.depth.value()
    }
}

impl Default for ButtonDynamics {
    fn default() -> Self {
        Self::new()
    }
}
