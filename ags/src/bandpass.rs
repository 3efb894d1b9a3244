//! Magnitude band and Strehl scale factor selection.

use ags_types::{Band, GroupKind};

use crate::context::{ImageQuality, Instrument, ObservationContext};

/// Scale factor used whenever the instrument/band/conditions give no better answer.
pub const DEFAULT_STREHL_FACTOR: f64 = 0.3;

/// Band in which the asterism search should evaluate the tip-tilt stars.
///
/// ODGW asterisms use the catalog band equivalent of the GSAOI filter when
/// there is one; everything else uses the reference band.
pub fn select_bandpass(group: GroupKind, instrument: &Instrument) -> Band {
    match (group, instrument) {
        (
            GroupKind::Odgw,
            Instrument::Gsaoi {
                catalog_band: Some(band),
            },
        ) => *band,
        _ => Band::REFERENCE,
    }
}

/// Strehl scale factor for a GSAOI filter band and image quality.
///
/// | band | IQ20 | IQ70 | IQ85  | otherwise |
/// |------|------|------|-------|-----------|
/// | J    | 0.12 | 0.06 | 0.024 | 0.01      |
/// | H    | 0.18 | 0.14 | 0.06  | 0.01      |
/// | K    | 0.35 | 0.18 | 0.12  | 0.01      |
///
/// Returns `None` for bands outside the table.
pub fn scale_for(band: Band, image_quality: Option<ImageQuality>) -> Option<f64> {
    let row = match band {
        Band::J => [0.12, 0.06, 0.024],
        Band::H => [0.18, 0.14, 0.06],
        Band::K => [0.35, 0.18, 0.12],
        _ => return None,
    };
    let factor = match image_quality {
        Some(ImageQuality::Percent20) => row[0],
        Some(ImageQuality::Percent70) => row[1],
        Some(ImageQuality::Percent85) => row[2],
        Some(ImageQuality::Any) | None => 0.01,
    };
    Some(factor)
}

/// Strehl scale factor for an observation; [`DEFAULT_STREHL_FACTOR`] unless
/// the instrument is GSAOI with a J, H or K catalog band.
pub fn strehl_factor(ctx: Option<&ObservationContext>) -> f64 {
    let Some(ctx) = ctx else {
        return DEFAULT_STREHL_FACTOR;
    };
    match &ctx.instrument {
        Instrument::Gsaoi {
            catalog_band: Some(band),
        } => scale_for(*band, ctx.conditions.map(|c| c.image_quality))
            .unwrap_or(DEFAULT_STREHL_FACTOR),
        _ => DEFAULT_STREHL_FACTOR,
    }
}
