pub mod health;
pub mod loads;
pub mod shippers;
pub mod smart_hubs;

use crate::db::DbPool;
use crate::events::EventSender;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub shippers: Arc<crate::services::shippers::ShipperService>,
    pub loads: Arc<crate::services::loads::LoadService>,
    pub smart_hubs: Arc<crate::services::smart_hubs::SmartHubService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        let shippers = Arc::new(crate::services::shippers::ShipperService::new(
            db_pool.clone(),
            event_sender.clone(),
        ));
        let loads = Arc::new(crate::services::loads::LoadService::new(
            db_pool.clone(),
            event_sender.clone(),
        ));
        let smart_hubs = Arc::new(crate::services::smart_hubs::SmartHubService::new(
            db_pool,
            event_sender,
        ));

        Self {
            shippers,
            loads,
            smart_hubs,
        }
    }
}
