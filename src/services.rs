pub mod asset_service;
pub mod auth;
pub mod document_service;
pub mod fault_service;
pub mod maintenance_service;
pub mod object_store;
pub mod outage_service;
pub mod payment_service;
pub mod plan_service;
pub mod shift_service;
pub mod site_service;
pub mod stock_service;
pub mod storage_service;
pub mod subscription_service;
pub mod team_service;
pub mod upgrade_service;
pub mod visibility;
