pub mod user_repo;
pub use user_repo::UserRepository;
pub mod company_repo;
pub use company_repo::CompanyRepository;
pub mod plan_repo;
pub use plan_repo::PlanRepository;
pub mod site_repo;
pub use site_repo::SiteRepository;
pub mod fault_repo;
pub use fault_repo::FaultRepository;
pub mod maintenance_repo;
pub use maintenance_repo::{MaintenanceRepository, WorkReportRepository};
pub mod outage_repo;
pub use outage_repo::OutageRepository;
pub mod shift_repo;
pub use shift_repo::ShiftRepository;
pub mod stock_repo;
pub use stock_repo::StockRepository;
pub mod asset_repo;
pub use asset_repo::AssetRepository;
pub mod storage_repo;
pub use storage_repo::StorageRepository;
pub mod upgrade_repo;
pub use upgrade_repo::UpgradeRepository;
pub mod payment_repo;
pub use payment_repo::PaymentRepository;
