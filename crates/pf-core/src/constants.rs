//! Physical constants shared by components and metrics.

/// Standard gravity, m/s^2.
pub const G0_MPS2: f64 = 9.806_65;

/// Universal gas constant, J/(kmol K).
pub const R_UNIVERSAL: f64 = 8314.5;

/// Standard atmospheric pressure, Pa.
pub const P_ATM_PA: f64 = 101_325.0;
