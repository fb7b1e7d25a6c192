//! Dashboard metrics derived from a single reading and its outcome

use pdm_common::{BinaryOutcome, SensorReading};

/// Tool efficiency in percent: `100 - tool_wear / 2.5`
pub fn efficiency(tool_wear: i64) -> f64 {
    100.0 - tool_wear as f64 / 2.5
}

/// Tool advice bucketed on efficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recommendation {
    /// efficiency <= 35
    ChangeTools,
    /// 35 < efficiency <= 60
    MonitorTools,
    /// efficiency > 60
    AllGood,
}

impl Recommendation {
    pub fn for_efficiency(efficiency: f64) -> Self {
        if efficiency <= 35.0 {
            Recommendation::ChangeTools
        } else if efficiency <= 60.0 {
            Recommendation::MonitorTools
        } else {
            Recommendation::AllGood
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::ChangeTools => "Change of Tools required",
            Recommendation::MonitorTools => "Monitor Tools",
            Recommendation::AllGood => "Everything is working fine.",
        }
    }
}

/// Everything the dashboard page shows
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardReport {
    pub reading: SensorReading,
    pub outcome: BinaryOutcome,
    pub efficiency: f64,
    /// Only present when no maintenance is needed
    pub recommendation: Option<Recommendation>,
}

impl DashboardReport {
    pub fn new(reading: SensorReading, outcome: BinaryOutcome) -> Self {
        let efficiency = efficiency(reading.tool_wear);
        let recommendation = match outcome {
            BinaryOutcome::No => Some(Recommendation::for_efficiency(efficiency)),
            BinaryOutcome::Yes => None,
        };
        Self { reading, outcome, efficiency, recommendation }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(tool_wear: i64) -> SensorReading {
        SensorReading {
            air_temperature: 298.6,
            process_temperature: 308.9,
            rotational_speed: 2986,
            torque: 30.9,
            tool_wear,
            machine_type: "Low".to_string(),
        }
    }

    #[test]
    fn test_efficiency_reference_value() {
        assert!((efficiency(206) - 17.6).abs() < 1e-9);
        assert_eq!(format!("{:.1}", efficiency(206)), "17.6");
        assert_eq!(efficiency(0), 100.0);
    }

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(Recommendation::for_efficiency(35.0), Recommendation::ChangeTools);
        assert_eq!(Recommendation::for_efficiency(35.4), Recommendation::MonitorTools);
        assert_eq!(Recommendation::for_efficiency(60.0), Recommendation::MonitorTools);
        assert_eq!(Recommendation::for_efficiency(60.4), Recommendation::AllGood);
        assert_eq!(Recommendation::for_efficiency(-20.0), Recommendation::ChangeTools);
    }

    #[test]
    fn test_tool_wear_100_is_exactly_sixty() {
        let report = DashboardReport::new(reading(100), BinaryOutcome::No);
        assert_eq!(report.efficiency, 60.0);
        assert_eq!(report.recommendation, Some(Recommendation::MonitorTools));
    }

    #[test]
    fn test_reference_reading() {
        let report = DashboardReport::new(reading(206), BinaryOutcome::No);
        assert_eq!(
            report.recommendation.map(|r| r.as_str()),
            Some("Change of Tools required")
        );
    }

    #[test]
    fn test_no_recommendation_when_maintenance_needed() {
        let report = DashboardReport::new(reading(10), BinaryOutcome::Yes);
        assert_eq!(report.recommendation, None);
        assert_eq!(report.efficiency, 96.0);
    }
}
