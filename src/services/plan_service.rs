// src/services/plan_service.rs

use std::{collections::BTreeMap, sync::Arc, time::Duration};

use moka::sync::Cache;
use rust_decimal::Decimal;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::PlanRepository,
    models::plan::{Plan, PlanLimits, PlanMap},
};

pub const TRIAL_PLAN_ID: &str = "trial";
const CACHE_KEY: &str = "saas_plans";

/// Planos de assinatura. A fonte é o documento único em `saas_config`;
/// a tabela embutida só fornece o plano `trial` como fallback.
#[derive(Clone)]
pub struct PlanService {
    repo: PlanRepository,
    cache: Cache<&'static str, Arc<PlanMap>>,
}

impl PlanService {
    pub fn new(repo: PlanRepository, ttl: Duration) -> Self {
        let cache = Cache::builder().max_capacity(1).time_to_live(ttl).build();
        Self { repo, cache }
    }

    /// Lê o documento remoto. `None` quando nunca foi salvo.
    pub async fn fetch_remote_plans(&self) -> Result<Option<PlanMap>, AppError> {
        Ok(self.repo.fetch().await?.map(parse_plan_document))
    }

    /// Planos remotos como estão, ou mapa vazio.
    pub async fn merged_plans(&self) -> Result<Arc<PlanMap>, AppError> {
        if let Some(plans) = self.cache.get(CACHE_KEY) {
            return Ok(plans);
        }
        let plans = Arc::new(self.fetch_remote_plans().await?.unwrap_or_default());
        self.cache.insert(CACHE_KEY, plans.clone());
        Ok(plans)
    }

    pub async fn resolve_plan(&self, plan_id: &str) -> Result<Option<Plan>, AppError> {
        let plans = self.merged_plans().await?;
        Ok(resolve_from(&plans, plan_id))
    }

    pub async fn save_plans(&self, plans: &PlanMap, updated_by: Uuid) -> Result<(), AppError> {
        let document = serde_json::to_value(plans).map_err(anyhow::Error::from)?;
        self.repo.save(&document, updated_by).await?;
        self.cache.invalidate(CACHE_KEY);
        tracing::info!("📦 Planos SaaS salvos ({} planos)", plans.len());
        Ok(())
    }

    /// Mescla (rasa) `partial` no plano `plan_id` e salva o documento inteiro.
    pub async fn update_plan(&self, plan_id: &str, partial: &Value, updated_by: Uuid) -> Result<PlanMap, AppError> {
        let mut document = match self.repo.fetch().await? {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };

        let merged = merge_plan_json(document.get(plan_id), partial);
        // Valida antes de gravar
        let plan: Plan = serde_json::from_value(merged.clone()).map_err(anyhow::Error::from)?;
        document.insert(plan_id.to_string(), merged);

        self.repo.save(&Value::Object(document.clone()), updated_by).await?;
        self.cache.invalidate(CACHE_KEY);

        tracing::info!("📦 Plano '{}' atualizado (preço {})", plan_id, plan.price);
        Ok(parse_plan_document(Value::Object(document)))
    }
}

/// Converte o documento em mapa de planos. Entradas inválidas são ignoradas.
pub fn parse_plan_document(document: Value) -> PlanMap {
    let Value::Object(entries) = document else {
        tracing::warn!("Documento de planos não é um objeto; ignorando");
        return PlanMap::new();
    };

    let mut plans = BTreeMap::new();
    for (id, raw) in entries {
        match serde_json::from_value::<Plan>(raw) {
            Ok(mut plan) => {
                if plan.id.is_empty() {
                    plan.id = id.clone();
                }
                plans.insert(id, plan);
            }
            Err(e) => tracing::warn!("Plano '{}' inválido no documento: {}", id, e),
        }
    }
    plans
}

pub fn merge_plan_json(existing: Option<&Value>, partial: &Value) -> Value {
    let mut merged = match existing {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    };
    if let Value::Object(fields) = partial {
        for (key, value) in fields {
            merged.insert(key.clone(), value.clone());
        }
    }
    Value::Object(merged)
}

pub fn resolve_from(plans: &PlanMap, plan_id: &str) -> Option<Plan> {
    plans
        .get(plan_id)
        .cloned()
        .or_else(|| (plan_id == TRIAL_PLAN_ID).then(trial_plan))
}

pub fn trial_plan() -> Plan {
    let features = [
        ("dashboard", true),
        ("arizaYonetimi", true),
        ("bakimTakibi", true),
        ("uretimTakibi", true),
        ("stokYonetimi", true),
        ("vardiyaTakibi", true),
        ("aiAnomaliTespiti", false),
        ("aiTahminleme", false),
        ("customReports", false),
        ("apiAccess", false),
        ("webhooks", false),
        ("whatsappIntegration", false),
        ("smsNotification", false),
        ("emailNotification", true),
        ("exportPDF", true),
        ("exportExcel", false),
        ("dataImport", false),
        ("sla", false),
        ("training", false),
    ]
    .into_iter()
    .map(|(name, enabled)| (name.to_string(), json!(enabled)))
    .collect();

    Plan {
        id: TRIAL_PLAN_ID.to_string(),
        name: "Deneme".to_string(),
        display_name: "14 Gün Ücretsiz Deneme".to_string(),
        description: Some("Tüm özellikleri 14 gün boyunca ücretsiz deneyin".to_string()),
        price: Decimal::ZERO,
        currency: "TRY".to_string(),
        billing_period: "trial".to_string(),
        duration_days: Some(14),
        limits: PlanLimits {
            users: 3,
            sites: 2,
            plants: 3,
            storage_gb: 1.0,
            fault_records: 50,
            maintenance_records: 20,
            monthly_api_calls: 1000,
        },
        features,
        support: Some("email".to_string()),
        popular: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn starter() -> Value {
        json!({
            "name": "starter",
            "displayName": "Starter",
            "price": 499,
            "limits": { "users": 5, "sahalar": 3, "santraller": 5, "storageGB": 5 }
        })
    }

    #[test]
    fn document_keys_become_plan_ids() {
        let plans = parse_plan_document(json!({ "starter": starter() }));
        assert_eq!(plans["starter"].id, "starter");
        assert_eq!(plans["starter"].limits.sites, 3);
    }

    #[test]
    fn invalid_entries_are_skipped() {
        let plans = parse_plan_document(json!({ "starter": starter(), "broken": { "price": "abc" } }));
        assert_eq!(plans.len(), 1);
        assert!(parse_plan_document(json!([1, 2])).is_empty());
    }

    #[test]
    fn remote_plans_win_and_trial_falls_back_to_builtin() {
        let mut plans = parse_plan_document(json!({ "starter": starter() }));
        assert!(resolve_from(&plans, "starter").is_some());
        assert_eq!(resolve_from(&plans, "trial").unwrap().limits.users, 3);
        assert!(resolve_from(&plans, "enterprise").is_none());

        let mut remote_trial = trial_plan();
        remote_trial.limits.users = 10;
        plans.insert("trial".into(), remote_trial);
        assert_eq!(resolve_from(&plans, "trial").unwrap().limits.users, 10);
    }

    #[test]
    fn partial_update_is_shallow() {
        let merged = merge_plan_json(Some(&starter()), &json!({ "price": 599, "limits": { "users": 8 } }));

        assert_eq!(merged["price"], json!(599));
        assert_eq!(merged["displayName"], json!("Starter"));
        // objetos aninhados são substituídos, não mesclados
        assert_eq!(merged["limits"], json!({ "users": 8 }));
    }

    #[test]
    fn partial_update_of_missing_plan_creates_it() {
        let merged = merge_plan_json(None, &json!({ "name": "pro", "price": 999 }));
        let plan: Plan = serde_json::from_value(merged).unwrap();
        assert_eq!(plan.name, "pro");
    }
}
