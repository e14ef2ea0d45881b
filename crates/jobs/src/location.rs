//! Live position of a job in transit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use haulnet_core::{DomainError, DomainResult, JobId, ValueObject};

/// A driver-reported position, as received.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl ValueObject for GeoPoint {}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: Some(latitude),
            longitude: Some(longitude),
        }
    }

    /// Both coordinates present, finite and inside their ranges.
    pub fn validate(&self) -> DomainResult<(f64, f64)> {
        let latitude = coordinate("latitude", self.latitude, 90.0)?;
        let longitude = coordinate("longitude", self.longitude, 180.0)?;
        Ok((latitude, longitude))
    }
}

fn coordinate(field: &'static str, value: Option<f64>, bound: f64) -> DomainResult<f64> {
    let value = value.ok_or_else(|| DomainError::validation(field, "is required"))?;
    if !value.is_finite() || value.abs() > bound {
        return Err(DomainError::validation(
            field,
            format!("must be a number between -{bound} and {bound}"),
        ));
    }
    Ok(value)
}

/// Last known position of a job. One per job; each report replaces the last.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobLocation {
    pub job_id: JobId,
    pub latitude: f64,
    pub longitude: f64,
    pub updated_at: DateTime<Utc>,
}

impl JobLocation {
    pub fn report(job_id: JobId, point: GeoPoint, at: DateTime<Utc>) -> DomainResult<Self> {
        let (latitude, longitude) = point.validate()?;
        Ok(Self {
            job_id,
            latitude,
            longitude,
            updated_at: at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_points_inside_range() {
        let loc = JobLocation::report(JobId::new(), GeoPoint::new(-25.43, -49.27), Utc::now()).unwrap();
        assert_eq!(loc.latitude, -25.43);
        assert_eq!(loc.longitude, -49.27);
    }

    #[test]
    fn missing_or_out_of_range_coordinates_name_the_field() {
        let err = GeoPoint { latitude: Some(10.0), longitude: None }.validate().unwrap_err();
        assert_eq!(err.field(), Some("longitude"));

        let err = GeoPoint::new(91.0, 0.0).validate().unwrap_err();
        assert_eq!(err.field(), Some("latitude"));

        let err = GeoPoint::new(0.0, f64::NAN).validate().unwrap_err();
        assert_eq!(err.field(), Some("longitude"));
    }

    #[test]
    fn serializes_with_camel_case_timestamp() {
        let loc = JobLocation::report(JobId::new(), GeoPoint::new(1.0, 2.0), Utc::now()).unwrap();
        let json = serde_json::to_value(loc).unwrap();
        assert!(json.get("updatedAt").is_some());
        assert_eq!(json["latitude"], 1.0);
    }
}
