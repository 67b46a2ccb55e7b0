//! Acoustic-physics helpers: depth from pressure, speed of sound, and
//! maximum achievable frame rate. Pure functions, no I/O.

use crate::ping_mode::PingMode;

/// Water type for the depth conversion-factor lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalinityBand {
    /// `[0, 15)` ppt.
    Fresh,
    /// `[15, 35)` ppt.
    Brackish,
    /// `>= 35` ppt.
    Sea,
}

impl SalinityBand {
    /// Classify a salinity value in parts per thousand.
    #[must_use]
    pub fn from_ppt(salinity_ppt: u32) -> Self {
        if salinity_ppt >= 35 {
            Self::Sea
        } else if salinity_ppt >= 15 {
            Self::Brackish
        } else {
            Self::Fresh
        }
    }
}

/// Conversion factors by temperature band (0/5/10/15/20/25/30 °C), indexed
/// `[fresh, brackish, sea]`.
const CONVERSION_FACTORS: [[f64; 7]; 3] = [
    // Fresh
    [1.000, 1.000, 1.000, 0.999, 0.998, 0.997, 0.996],
    // Brackish
    [1.012, 1.012, 1.011, 1.011, 1.010, 1.008, 1.007],
    // Sea
    [1.028, 1.028, 1.027, 1.026, 1.025, 1.023, 1.022],
];

/// Classify a temperature (°C) into one of the seven 5-degree bands,
/// clamping out-of-range values and rounding (not flooring) within range.
///
/// The oldest source revision used a floor-based lookup that misclassified
/// e.g. `T=29.6` as the 25°C bucket. This implements the current,
/// round-based revision instead: `round(T/5)` saturating at the 0°C/30°C
/// ends.
fn temperature_band_index(temperature_c: f64) -> usize {
    if temperature_c <= 0.0 {
        return 0;
    }
    if temperature_c >= 30.0 {
        return 6;
    }
    (temperature_c / 5.0).round() as usize
}

/// Conversion factor `cf` for a given salinity/temperature pair.
#[must_use]
pub fn conversion_factor(salinity_ppt: u32, temperature_c: f64) -> f64 {
    let band = SalinityBand::from_ppt(salinity_ppt);
    let index = temperature_band_index(temperature_c);
    CONVERSION_FACTORS[band as usize][index]
}

/// Depth in meters from pressure (PSI), salinity (ppt), and temperature
/// (°C).
#[must_use]
pub fn depth_m(pressure_psi: f64, salinity_ppt: u32, temperature_c: f64) -> f64 {
    let cf = conversion_factor(salinity_ppt, temperature_c);
    (pressure_psi - 14.6959) * 0.702398 / cf
}

/// Speed of sound in water (m/s) from temperature (°C), depth (m), and
/// salinity (ppt).
#[must_use]
pub fn speed_of_sound(temperature_c: f64, depth_m: f64, salinity_ppt: f64) -> f64 {
    let t = temperature_c;
    let z = depth_m;
    let s = salinity_ppt;
    1402.5 + 5.0 * t - 5.44e-2 * t.powi(2) + 2.1e-4 * t.powi(3) + 1.33 * s - 1.23e-2 * s * t
        + 8.7e-5 * s * t.powi(2)
        + 1.56e-2 * z
        + 2.55e-7 * z.powi(2)
        - 7.3e-12 * z.powi(3)
}

/// Inputs to the maximum-frame-rate calculation.
#[derive(Debug, Clone, Copy)]
pub struct FrameRateInputs {
    /// System type (1800, 3000, or 1200).
    pub system_type: u32,
    /// Ping mode.
    pub ping_mode: PingMode,
    /// Samples captured per beam.
    pub samples_per_beam: u32,
    /// Delay, in microseconds, before the first sample.
    pub sample_start_delay_us: u32,
    /// Sample period, in microseconds.
    pub sample_period_us: u32,
    /// Anti-aliasing delay, in microseconds.
    pub anti_aliasing_us: u32,
    /// Whether an interpacket delay is inserted between UDP fragments.
    pub enable_interpacket_delay: bool,
    /// Interpacket delay, in microseconds, if enabled.
    pub interpacket_delay_us: u32,
}

const CYCLE_PERIOD_FUDGE_US: f64 = 420.0;

fn cpa_factor(system_type: u32, sample_period_us: u32) -> f64 {
    match system_type {
        3000 => {
            if sample_period_us <= 4 {
                0.076
            } else {
                0.026
            }
        },
        1800 => {
            if sample_period_us <= 4 {
                0.053
            } else {
                0.026
            }
        },
        _ => 0.011,
    }
}

/// Maximum achievable frame rate (fps), clamped to `[1.0, 15.0]`.
#[must_use]
pub fn max_frame_rate(inputs: FrameRateInputs) -> f64 {
    let ppf = f64::from(inputs.ping_mode.pings_per_frame());
    let nob = f64::from(inputs.ping_mode.beams());
    let samples_per_beam = f64::from(inputs.samples_per_beam);

    let mcp = f64::from(inputs.sample_start_delay_us)
        + f64::from(inputs.sample_period_us) * samples_per_beam
        + CYCLE_PERIOD_FUDGE_US;

    let cpa1 =
        mcp * cpa_factor(inputs.system_type, inputs.sample_period_us) + f64::from(inputs.anti_aliasing_us);

    let mfp = if inputs.enable_interpacket_delay {
        let packets = ((nob * samples_per_beam + 1024.0) / 1392.0).floor();
        ppf * (mcp + cpa1) + packets * (16.6 + f64::from(inputs.interpacket_delay_us))
    } else {
        ppf * (mcp + cpa1)
    };

    (1_000_000.0 / mfp).clamp(1.0, 15.0)
}
