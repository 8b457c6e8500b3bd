use sea_orm::entity::prelude::*;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Lifecycle status of a load. The database stores these exact strings; the
/// main path runs CREATED through COMPLETED with side branches to CANCELLED,
/// EXPIRED, DELAYED, and EXCEPTION/RESOLVED. No transition graph is enforced
/// anywhere: any status may follow any other.
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
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "load_status")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LoadStatus {
    #[sea_orm(string_value = "CREATED")]
    Created,
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "OPTIMIZING")]
    Optimizing,
    #[sea_orm(string_value = "AVAILABLE")]
    Available,
    #[sea_orm(string_value = "RESERVED")]
    Reserved,
    #[sea_orm(string_value = "ASSIGNED")]
    Assigned,
    #[sea_orm(string_value = "IN_TRANSIT")]
    InTransit,
    #[sea_orm(string_value = "AT_PICKUP")]
    AtPickup,
    #[sea_orm(string_value = "LOADED")]
    Loaded,
    #[sea_orm(string_value = "AT_DROPOFF")]
    AtDropoff,
    #[sea_orm(string_value = "DELIVERED")]
    Delivered,
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
    #[sea_orm(string_value = "EXPIRED")]
    Expired,
    #[sea_orm(string_value = "DELAYED")]
    Delayed,
    #[sea_orm(string_value = "EXCEPTION")]
    Exception,
    #[sea_orm(string_value = "RESOLVED")]
    Resolved,
}

/// Trailer/truck category required to carry a load.
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
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "equipment_type")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EquipmentType {
    #[sea_orm(string_value = "DRY_VAN")]
    DryVan,
    #[sea_orm(string_value = "REFRIGERATED")]
    Refrigerated,
    #[sea_orm(string_value = "FLATBED")]
    Flatbed,
}

/// Cargo dimensions in feet. Persisted as a JSON column; the shape is
/// validated here at the application boundary, not by the schema.
#[derive(
    Clone, Debug, PartialEq, Serialize, Deserialize, FromJsonQueryResult, ToSchema, Validate,
)]
pub struct Dimensions {
    #[validate(range(min = 0.1, message = "Length must be a positive number of feet"))]
    pub length: f64,
    #[validate(range(min = 0.1, message = "Width must be a positive number of feet"))]
    pub width: f64,
    #[validate(range(min = 0.1, message = "Height must be a positive number of feet"))]
    pub height: f64,
}

impl Dimensions {
    /// Cubic feet implied by the dimensions. Informational only: the stored
    /// `volume` column is taken as given and never checked against this.
    pub fn cubic_feet(&self) -> f64 {
        self.length * self.width * self.height
    }
}

/// Temperature band for refrigerated cargo, degrees Fahrenheit. Stored as a
/// JSON column. Not cross-checked against the load's equipment type.
#[derive(
    Clone, Debug, PartialEq, Serialize, Deserialize, FromJsonQueryResult, ToSchema, Validate,
)]
pub struct TemperatureRequirements {
    #[validate(range(min = -100.0, max = 150.0))]
    pub min_f: f64,
    #[validate(range(min = -100.0, max = 150.0))]
    pub max_f: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use sea_orm::ActiveEnum;

    #[rstest]
    #[case(LoadStatus::Created, "CREATED")]
    #[case(LoadStatus::InTransit, "IN_TRANSIT")]
    #[case(LoadStatus::AtPickup, "AT_PICKUP")]
    #[case(LoadStatus::AtDropoff, "AT_DROPOFF")]
    #[case(LoadStatus::Exception, "EXCEPTION")]
    #[case(LoadStatus::Resolved, "RESOLVED")]
    fn load_status_database_spelling(#[case] status: LoadStatus, #[case] expected: &str) {
        assert_eq!(status.to_value(), expected);
        assert_eq!(expected.parse::<LoadStatus>().unwrap(), status);
    }

    #[test]
    fn load_status_has_seventeen_values() {
        use sea_orm::Iterable;
        assert_eq!(LoadStatus::iter().count(), 17);
    }

    #[test]
    fn unknown_status_string_is_rejected() {
        assert!("TELEPORTED".parse::<LoadStatus>().is_err());
        // Wire format is exact; alternate casings are not accepted.
        assert!("in_transit".parse::<LoadStatus>().is_err());
    }

    #[rstest]
    #[case(EquipmentType::DryVan, "DRY_VAN")]
    #[case(EquipmentType::Refrigerated, "REFRIGERATED")]
    #[case(EquipmentType::Flatbed, "FLATBED")]
    fn equipment_type_database_spelling(#[case] equipment: EquipmentType, #[case] expected: &str) {
        assert_eq!(equipment.to_value(), expected);
        assert_eq!(expected.parse::<EquipmentType>().unwrap(), equipment);
    }

    #[test]
    fn dimensions_validate_positive_extents() {
        let good = Dimensions {
            length: 48.0,
            width: 8.5,
            height: 9.0,
        };
        assert!(good.validate().is_ok());
        assert!((good.cubic_feet() - 3672.0).abs() < 1e-9);

        let bad = Dimensions {
            length: 0.0,
            width: 8.5,
            height: 9.0,
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn load_status_serde_uses_wire_spelling() {
        let json = serde_json::to_string(&LoadStatus::AtDropoff).unwrap();
        assert_eq!(json, "\"AT_DROPOFF\"");
        let parsed: LoadStatus = serde_json::from_str("\"OPTIMIZING\"").unwrap();
        assert_eq!(parsed, LoadStatus::Optimizing);
    }
}
