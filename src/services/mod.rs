pub mod loads;
pub mod shippers;
pub mod smart_hubs;
