use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::errors::ErrorResponse;
use crate::models::load::{Dimensions, EquipmentType, LoadStatus, TemperatureRequirements};
use crate::models::smart_hub::{Amenities, HubType, OperatingHours};
use crate::services::loads::{
    CreateLoadRequest, LoadListResponse, LoadResponse, UpdateLoadRequest, UpdateLoadStatusRequest,
};
use crate::services::shippers::{CreateShipperRequest, ShipperListResponse, ShipperResponse};
use crate::services::smart_hubs::{
    CreateHubRequest, HubListResponse, HubResponse, NearbyHubResponse, UpdateHubRequest,
    UpdateHubScoresRequest,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Carrier Portal API",
        description = "Load, shipper, and smart hub management for the carrier portal"
    ),
    paths(
        crate::handlers::shippers::create_shipper,
        crate::handlers::shippers::list_shippers,
        crate::handlers::shippers::get_shipper,
        crate::handlers::shippers::get_shipper_loads,
        crate::handlers::shippers::delete_shipper,
        crate::handlers::loads::create_load,
        crate::handlers::loads::list_loads,
        crate::handlers::loads::get_load,
        crate::handlers::loads::get_load_by_reference,
        crate::handlers::loads::update_load,
        crate::handlers::loads::update_load_status,
        crate::handlers::loads::delete_load,
        crate::handlers::smart_hubs::create_hub,
        crate::handlers::smart_hubs::list_hubs,
        crate::handlers::smart_hubs::nearby_hubs,
        crate::handlers::smart_hubs::get_hub,
        crate::handlers::smart_hubs::update_hub,
        crate::handlers::smart_hubs::update_hub_scores,
        crate::handlers::smart_hubs::deactivate_hub,
    ),
    components(schemas(
        ErrorResponse,
        LoadStatus,
        EquipmentType,
        Dimensions,
        TemperatureRequirements,
        HubType,
        Amenities,
        OperatingHours,
        CreateLoadRequest,
        UpdateLoadRequest,
        UpdateLoadStatusRequest,
        LoadResponse,
        LoadListResponse,
        CreateShipperRequest,
        ShipperResponse,
        ShipperListResponse,
        CreateHubRequest,
        UpdateHubRequest,
        UpdateHubScoresRequest,
        HubResponse,
        HubListResponse,
        NearbyHubResponse,
    )),
    tags(
        (name = "shippers", description = "Shipper management"),
        (name = "loads", description = "Load lifecycle and search"),
        (name = "smart-hubs", description = "Smart hub network management")
    )
)]
pub struct ApiDoc;

/// Swagger UI router serving the generated document.
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}
