use std::collections::BTreeMap;

use sea_orm::entity::prelude::*;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Category of a smart hub location.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
    strum::Display,
    strum::EnumString,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "hub_type")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum HubType {
    #[sea_orm(string_value = "TRUCK_STOP")]
    TruckStop,
    #[sea_orm(string_value = "DISTRIBUTION_CENTER")]
    DistributionCenter,
    #[sea_orm(string_value = "REST_AREA")]
    RestArea,
    #[sea_orm(string_value = "WAREHOUSE")]
    Warehouse,
    #[sea_orm(string_value = "TERMINAL")]
    Terminal,
    #[sea_orm(string_value = "YARD")]
    Yard,
    #[sea_orm(string_value = "OTHER")]
    Other,
}

/// Amenity tags available at a hub ("parking", "fuel", "showers", ...).
/// Stored as a JSON array column.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult, ToSchema,
)]
#[serde(transparent)]
pub struct Amenities(pub Vec<String>);

/// Operating hours keyed by day name, values like "06:00-22:00" or "closed".
/// Schema-flexible by design; stored as a JSON object column.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult, ToSchema,
)]
#[serde(transparent)]
pub struct OperatingHours(pub BTreeMap<String, String>);

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveEnum;

    #[test]
    fn hub_type_database_spelling() {
        assert_eq!(HubType::TruckStop.to_value(), "TRUCK_STOP");
        assert_eq!(HubType::DistributionCenter.to_value(), "DISTRIBUTION_CENTER");
        assert_eq!("YARD".parse::<HubType>().unwrap(), HubType::Yard);
        assert!("SPACEPORT".parse::<HubType>().is_err());
    }

    #[test]
    fn hub_type_has_seven_values() {
        use sea_orm::Iterable;
        assert_eq!(HubType::iter().count(), 7);
    }

    #[test]
    fn amenities_round_trip_as_plain_array() {
        let amenities = Amenities(vec!["parking".into(), "fuel".into()]);
        let json = serde_json::to_string(&amenities).unwrap();
        assert_eq!(json, r#"["parking","fuel"]"#);
        let back: Amenities = serde_json::from_str(&json).unwrap();
        assert_eq!(back, amenities);
    }

    #[test]
    fn operating_hours_round_trip_as_plain_object() {
        let mut hours = BTreeMap::new();
        hours.insert("monday".to_string(), "06:00-22:00".to_string());
        hours.insert("sunday".to_string(), "closed".to_string());
        let hours = OperatingHours(hours);
        let json = serde_json::to_string(&hours).unwrap();
        let back: OperatingHours = serde_json::from_str(&json).unwrap();
        assert_eq!(back, hours);
    }
}
