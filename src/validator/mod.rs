use thiserror::Error;

use crate::config::JobConfig;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{name} must be a finite number (got {value})")]
    NotFinite { name: &'static str, value: f64 },

    #[error("{name} must be positive (got {value})")]
    NonPositive { name: &'static str, value: f64 },

    #[error("safe height Z{safe_z} must be above cut depth Z{cut_z}")]
    RetractBelowCut { safe_z: f64, cut_z: f64 },

    #[error("arc sampling needs at least 2 points per arc (got {0})")]
    ArcSamples(usize),
}

/// Sanity checks on job parameters, run before a conversion is attempted
pub struct Validator {
    min_arc_samples: usize,
}

impl Default for Validator {
    fn default() -> Self {
        Self { min_arc_samples: 2 }
    }
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate_job(&self, job: &JobConfig) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        let mut numbers = vec![
            ("feed_xy", job.feed_xy),
            ("feed_z", job.feed_z),
            ("safe_z", job.safe_z),
            ("cut_z", job.cut_z),
            ("spindle_rpm", job.spindle_rpm),
            ("offset.x", job.offset.x),
            ("offset.y", job.offset.y),
        ];
        if let Some(p) = job.start {
            numbers.extend([("start.x", p.x), ("start.y", p.y)]);
        }
        if let Some(p) = job.end {
            numbers.extend([("end.x", p.x), ("end.y", p.y)]);
        }

        for (name, value) in numbers {
            if !value.is_finite() {
                errors.push(ValidationError::NotFinite { name, value });
            }
        }

        for (name, value) in [
            ("feed_xy", job.feed_xy),
            ("feed_z", job.feed_z),
            ("spindle_rpm", job.spindle_rpm),
        ] {
            if value.is_finite() && value <= 0.0 {
                errors.push(ValidationError::NonPositive { name, value });
            }
        }

        if job.safe_z.is_finite() && job.cut_z.is_finite() && job.safe_z <= job.cut_z {
            errors.push(ValidationError::RetractBelowCut {
                safe_z: job.safe_z,
                cut_z: job.cut_z,
            });
        }

        if job.arc_samples < self.min_arc_samples {
            errors.push(ValidationError::ArcSamples(job.arc_samples));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Point;

    #[test]
    fn test_default_job_valid() {
        assert_eq!(Validator::new().validate_job(&JobConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_every_error() {
        let job = JobConfig {
            feed_xy: 0.0,
            feed_z: -5.0,
            safe_z: -1.0,
            cut_z: 0.0,
            arc_samples: 1,
            ..JobConfig::default()
        };
        let errors = Validator::new().validate_job(&job).expect_err("invalid job");

        assert_eq!(
            errors,
            vec![
                ValidationError::NonPositive { name: "feed_xy", value: 0.0 },
                ValidationError::NonPositive { name: "feed_z", value: -5.0 },
                ValidationError::RetractBelowCut { safe_z: -1.0, cut_z: 0.0 },
                ValidationError::ArcSamples(1),
            ]
        );
    }

    #[test]
    fn test_non_finite_override() {
        let job = JobConfig {
            end: Some(Point::new(f64::NAN, 0.0)),
            ..JobConfig::default()
        };
        let errors = Validator::new().validate_job(&job).expect_err("invalid job");

        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], ValidationError::NotFinite { name: "end.x", .. }));
    }
}
