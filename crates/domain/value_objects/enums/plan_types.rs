use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::billing_periods::add_months_rolling;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanType {
    Monthly,
    Annual,
}

impl PlanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanType::Monthly => "MONTHLY",
            PlanType::Annual => "ANNUAL",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "MONTHLY" => Some(PlanType::Monthly),
            "ANNUAL" => Some(PlanType::Annual),
            _ => None,
        }
    }

    /// Flat price in minor currency units.
    pub fn amount_minor(&self) -> i64 {
        match self {
            PlanType::Monthly => 4_900,
            PlanType::Annual => 49_900,
        }
    }

    pub fn period_months(&self) -> u32 {
        match self {
            PlanType::Monthly => 1,
            PlanType::Annual => 12,
        }
    }

    /// The instant one billing period after `from`, using calendar rollover.
    pub fn next_renewal(&self, from: DateTime<Utc>) -> Option<DateTime<Utc>> {
        add_months_rolling(from, self.period_months())
    }
}

impl Display for PlanType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn annual_renewal_from_leap_day_rolls_into_march() {
        let leap_day = Utc.with_ymd_and_hms(2024, 2, 29, 9, 0, 0).unwrap();
        assert_eq!(
            PlanType::Annual.next_renewal(leap_day),
            Some(Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap())
        );
    }

    #[test]
    fn plan_prices() {
        assert_eq!(PlanType::Monthly.amount_minor(), 4_900);
        assert_eq!(PlanType::Annual.amount_minor(), 49_900);
    }

    #[test]
    fn parses_only_known_plans() {
        assert_eq!(PlanType::from_str("MONTHLY"), Some(PlanType::Monthly));
        assert_eq!(PlanType::from_str("weekly"), None);
    }
}
