pub mod admin;
pub mod assets;
pub mod auth;
pub mod company;
pub mod exports;
pub mod faults;
pub mod maintenance;
pub mod outages;
pub mod payments;
pub mod rbac;
pub mod shifts;
pub mod sites;
pub mod stock;
pub mod storage;
pub mod subscription;
pub mod team;
pub mod work_reports;
