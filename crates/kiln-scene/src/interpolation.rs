//! Time to progress mappings.

/// A pure mapping from elapsed time to progress in `[0, 1]`.
///
/// `Linear` carries the instant it was last sampled at alongside its
/// bounds; `Complete` is the terminal value frozen at 1. Progress never
/// decreases as an instance is advanced, and once the end instant is
/// reached the interpolation collapses to `Complete` for good.
///
/// # Examples
///
/// ```
/// use kiln_scene::Interpolation;
///
/// let ramp = Interpolation::linear(100, 50);
/// assert_eq!(ramp.update(99).value(), 0.0);
/// assert_eq!(ramp.update(125).value(), 0.5);
/// assert_eq!(ramp.update(150), Interpolation::Complete);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Interpolation {
    /// Terminal interpolation, frozen at 1.
    Complete,
    /// Straight-line progress between `start` and `end` (milliseconds).
    Linear {
        /// The instant this sample was taken at.
        time: u64,
        /// Progress is 0 at or before this instant.
        start: u64,
        /// Progress reaches 1 at this instant.
        end: u64,
    },
}

impl Interpolation {
    /// A linear ramp starting at `start` and lasting `duration` ms.
    ///
    /// The returned instance has not been sampled yet (its time is 0), so
    /// it reports zero progress until the first `update`.
    pub fn linear(start: u64, duration: u64) -> Self {
        Self::Linear {
            time: 0,
            start,
            end: start.saturating_add(duration),
        }
    }

    /// Current progress in `[0, 1]`.
    pub fn value(&self) -> f32 {
        match *self {
            Self::Complete => 1.0,
            Self::Linear { time, start, end } => {
                if time < start {
                    return 0.0;
                }
                if end <= start || time >= end {
                    return 1.0;
                }
                (time - start) as f32 / (end - start) as f32
            }
        }
    }

    /// Whether further updates can still change the value.
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::Linear { .. })
    }

    /// Sample at `time`, collapsing to [`Complete`](Self::Complete) once
    /// `time` reaches the end instant.
    pub fn update(&self, time: u64) -> Self {
        match *self {
            Self::Complete => Self::Complete,
            Self::Linear { start, end, .. } if time < end => Self::Linear { time, start, end },
            Self::Linear { .. } => Self::Complete,
        }
    }

    /// Jump straight to the terminal value.
    pub fn finish(&self) -> Self {
        Self::Complete
    }
}
