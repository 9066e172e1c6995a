//! Animation mapping for sheet transitions.

/// Residual displacement a spring is allowed at the end of its duration.
const SETTLE_EPSILON: f32 = 0.001;

/// Spring step response sampled over a normalized duration.
///
/// Input: linear progress in [0.0, 1.0].
/// Output: displacement that starts at 0.0 and rests at exactly 1.0 when
/// progress reaches 1.0. Damping ratios below 1.0 overshoot before settling;
/// the natural frequency is chosen so the envelope has decayed to
/// [`SETTLE_EPSILON`] at the end of the duration.
pub(crate) fn spring(progress: f32, damping_ratio: f32) -> f32 {
    if progress <= 0.0 {
        return 0.0;
    }
    if progress >= 1.0 {
        return 1.0;
    }

    let zeta = damping_ratio.max(0.05);
    let decay = -SETTLE_EPSILON.ln();
    if zeta >= 1.0 {
        // Critically damped (overdamped ratios are treated the same way).
        let omega = decay * 1.3;
        let x = omega * progress;
        return 1.0 - (-x).exp() * (1.0 + x);
    }

    let omega = decay / zeta;
    let omega_d = omega * (1.0 - zeta * zeta).sqrt();
    let envelope = (-zeta * omega * progress).exp();
    let phase = omega_d * progress;
    1.0 - envelope * (phase.cos() + (zeta * omega / omega_d) * phase.sin())
}
