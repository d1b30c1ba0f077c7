use crate::error::MetricsError;

/// Successive inter-beat intervals in milliseconds, derived from a strictly
/// increasing sequence of beat-onset timestamps. Immutable once built; every
/// element is positive by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct RrIntervals(Vec<f64>);

impl RrIntervals {
    /// Builds `rr[i] = t[i+1] - t[i]` from beat-onset timestamps in
    /// milliseconds.
    ///
    /// # Errors
    ///
    /// `InsufficientData` when fewer than two timestamps are supplied,
    /// `NonMonotonicTimestamps` when any interval is zero or negative. The
    /// reported index is that of the offending timestamp.
    pub fn from_beat_timings(timings: &[i64]) -> Result<Self, MetricsError> {
        if timings.len() < 2 {
            return Err(MetricsError::InsufficientData {
                metric: "RR intervals",
                needed: 2,
                got: timings.len(),
            });
        }

        let mut rr = Vec::with_capacity(timings.len() - 1);
        for (i, pair) in timings.windows(2).enumerate() {
            let dt = pair[1] - pair[0];
            if dt <= 0 {
                return Err(MetricsError::NonMonotonicTimestamps { index: i + 1 });
            }
            rr.push(dt as f64);
        }

        Ok(Self(rr))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rr_from_beat_timings() {
        let rr = RrIntervals::from_beat_timings(&[0, 1000, 2000, 2800, 3800]).unwrap();
        assert_eq!(rr.as_slice(), &[1000.0, 1000.0, 800.0, 1000.0]);
        assert_eq!(rr.len(), 4);
    }

    #[test]
    fn test_rr_length_is_one_less_than_timestamps() {
        let timings: Vec<i64> = (0..50).map(|i| i * 900).collect();
        let rr = RrIntervals::from_beat_timings(&timings).unwrap();
        assert_eq!(rr.len(), timings.len() - 1);
        for (i, &interval) in rr.as_slice().iter().enumerate() {
            assert_eq!(interval, (timings[i + 1] - timings[i]) as f64);
        }
    }

    #[test]
    fn test_too_few_timestamps() {
        let err = RrIntervals::from_beat_timings(&[100]).unwrap_err();
        assert_eq!(
            err,
            MetricsError::InsufficientData {
                metric: "RR intervals",
                needed: 2,
                got: 1
            }
        );
    }

    #[test]
    fn test_non_monotonic_timestamps() {
        let err = RrIntervals::from_beat_timings(&[0, 1000, 900, 2000]).unwrap_err();
        assert_eq!(err, MetricsError::NonMonotonicTimestamps { index: 2 });

        // Repeated timestamps are also invalid (interval of zero).
        let err = RrIntervals::from_beat_timings(&[0, 1000, 1000]).unwrap_err();
        assert_eq!(err, MetricsError::NonMonotonicTimestamps { index: 2 });
    }
}
