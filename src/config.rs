// src/config.rs

use std::{collections::HashMap, path::PathBuf, sync::Arc, time::Duration};

use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;

use crate::{
    common::i18n::I18nStore,
    db::{
        AssetRepository, CompanyRepository, FaultRepository, MaintenanceRepository,
        OutageRepository, PaymentRepository, PlanRepository, ShiftRepository, SiteRepository,
        StockRepository, StorageRepository, UpgradeRepository, UserRepository, WorkReportRepository,
    },
    services::{
        asset_service::AssetService, auth::AuthService, document_service::DocumentService,
        fault_service::FaultService, maintenance_service::MaintenanceService,
        object_store::LocalObjectStore, outage_service::OutageService,
        payment_service::PaymentService, plan_service::PlanService, shift_service::ShiftService,
        site_service::SiteService,
        stock_service::StockService, storage_service::StorageService,
        subscription_service::SubscriptionService, team_service::TeamService,
        upgrade_service::UpgradeService,
    },
};

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} deve ser definida")]
    Missing(&'static str),

    #[error("Valor inválido para {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub storage_root: PathBuf,
    pub fonts_dir: String,
    pub db_max_connections: u32,
    pub plan_cache_ttl_secs: u64,
    pub trial_days: i64,
    pub max_upload_mb: u64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| lookup(key).filter(|v| !v.is_empty()).ok_or(ConfigError::Missing(key));
        let or_default = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            bind_addr: or_default("BIND_ADDR", "0.0.0.0:3000"),
            storage_root: PathBuf::from(or_default("STORAGE_ROOT", "./storage")),
            fonts_dir: or_default("FONTS_DIR", "./fonts"),
            db_max_connections: parse_number(&lookup, "DB_MAX_CONNECTIONS", 5)?,
            plan_cache_ttl_secs: parse_number(&lookup, "PLAN_CACHE_TTL_SECS", 300)?,
            trial_days: parse_number(&lookup, "TRIAL_DAYS", 14)?,
            max_upload_mb: parse_number(&lookup, "MAX_UPLOAD_MB", 10)?,
        })
    }
}

fn parse_number<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Arc<AppConfig>,
    pub i18n_store: Arc<I18nStore>,

    pub auth_service: AuthService,
    pub team_service: TeamService,
    pub plan_service: PlanService,
    pub subscription_service: SubscriptionService,
    pub storage_service: StorageService,
    pub site_service: SiteService,
    pub fault_service: FaultService,
    pub maintenance_service: MaintenanceService,
    pub outage_service: OutageService,
    pub shift_service: ShiftService,
    pub stock_service: StockService,
    pub asset_service: AssetService,
    pub upgrade_service: UpgradeService,
    pub payment_service: PaymentService,
    pub document_service: DocumentService,
}

impl AppState {
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::with_pool(config, db_pool))
    }

    // --- Monta o gráfico de dependências ---
    pub fn with_pool(config: AppConfig, db_pool: PgPool) -> Self {
        let user_repo = UserRepository::new(db_pool.clone());
        let company_repo = CompanyRepository::new(db_pool.clone());

        let plan_service = PlanService::new(
            PlanRepository::new(db_pool.clone()),
            Duration::from_secs(config.plan_cache_ttl_secs),
        );
        let storage_repo = StorageRepository::new(db_pool.clone());
        let subscription_service =
            SubscriptionService::new(company_repo.clone(), storage_repo.clone(), plan_service.clone());

        let object_store = Arc::new(LocalObjectStore::new(config.storage_root.clone()));
        let storage_service = StorageService::new(
            object_store,
            storage_repo,
            company_repo.clone(),
            subscription_service.clone(),
            config.max_upload_mb,
        );

        let auth_service = AuthService::new(
            user_repo.clone(),
            company_repo.clone(),
            config.jwt_secret.clone(),
            config.trial_days,
            db_pool.clone(),
        );
        let team_service = TeamService::new(user_repo, subscription_service.clone());
        let site_service = SiteService::new(SiteRepository::new(db_pool.clone()), subscription_service.clone());
        let fault_service = FaultService::new(
            FaultRepository::new(db_pool.clone()),
            subscription_service.clone(),
            storage_service.clone(),
        );
        let maintenance_service = MaintenanceService::new(
            MaintenanceRepository::new(db_pool.clone()),
            WorkReportRepository::new(db_pool.clone()),
            subscription_service.clone(),
            storage_service.clone(),
        );
        let outage_service = OutageService::new(OutageRepository::new(db_pool.clone()));
        let shift_service = ShiftService::new(ShiftRepository::new(db_pool.clone()), storage_service.clone());
        let stock_service = StockService::new(StockRepository::new(db_pool.clone()), db_pool.clone());
        let asset_service = AssetService::new(AssetRepository::new(db_pool.clone()));
        let upgrade_service = UpgradeService::new(
            UpgradeRepository::new(db_pool.clone()),
            plan_service.clone(),
            subscription_service.clone(),
        );
        let payment_service = PaymentService::new(
            PaymentRepository::new(db_pool.clone()),
            plan_service.clone(),
            subscription_service.clone(),
        );
        let document_service = DocumentService::new(config.fonts_dir.clone());

        Self {
            db_pool,
            config: Arc::new(config),
            i18n_store: Arc::new(I18nStore::new()),
            auth_service,
            team_service,
            plan_service,
            subscription_service,
            storage_service,
            site_service,
            fault_service,
            maintenance_service,
            outage_service,
            shift_service,
            stock_service,
            asset_service,
            upgrade_service,
            payment_service,
            document_service,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_optional_keys_are_absent() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/solarops"),
            ("JWT_SECRET", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.storage_root, PathBuf::from("./storage"));
        assert_eq!(config.plan_cache_ttl_secs, 300);
        assert_eq!(config.trial_days, 14);
        assert_eq!(config.max_upload_mb, 10);
    }

    #[test]
    fn missing_secret_is_reported() {
        let err = AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://x")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("JWT_SECRET"));
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://x"),
            ("JWT_SECRET", "s"),
            ("TRIAL_DAYS", "two weeks"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Invalid { key: "TRIAL_DAYS", value: "two weeks".into() });
    }
}
