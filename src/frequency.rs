use crate::error::{require_positive, CalcError};
use faer::Row;
use std::f64::consts::PI;

// Frequency stores values in Hz
#[derive(Clone, Debug, PartialEq)]
pub struct Frequency {
    pts: Row<f64>,
}

impl Frequency {
    pub fn new(pts: Row<f64>) -> Frequency {
        Frequency { pts }
    }

    /// `npts` points spread linearly over `center ± span/2` (Hz)
    pub fn from_center_span(center: f64, span: f64, npts: usize) -> Result<Frequency, CalcError> {
        require_positive("center frequency", center)?;
        if npts < 2 {
            return Err(CalcError::invalid("points", "need at least two sweep points"));
        }
        if !(span >= 0.0) || span / 2.0 >= center {
            return Err(CalcError::invalid(
                "span",
                "must be non-negative and keep every point above 0 Hz",
            ));
        }
        let start = center - span / 2.0;
        let step = span / ((npts - 1) as f64);

        Ok(Frequency {
            pts: Row::<f64>::from_fn(npts, |i| start + (i as f64) * step),
        })
    }

    pub fn freq_at(&self, pt: usize) -> f64 {
        self.pts.read(pt)
    }

    pub fn npts(&self) -> usize {
        self.pts.ncols()
    }

    pub fn w_at(&self, pt: usize) -> f64 {
        2.0 * PI * self.pts.read(pt)
    }
}

/// Angular frequency of a single design frequency
pub fn angular(freq_hz: f64) -> f64 {
    2.0 * PI * freq_hz
}
