// src/services/storage_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        format::{bytes_to_mb, format_file_size},
    },
    db::{CompanyRepository, StorageRepository},
    models::{
        plan::UNLIMITED,
        storage::{RecountSummary, StorageStatus, StorageUsage, StoredObject, UsageDelta},
    },
    services::{
        object_store::{validate_key, ObjectMeta, ObjectStore},
        subscription_service::SubscriptionService,
    },
};

pub const MAX_WALK_DEPTH: usize = 10;
const MB: u64 = 1024 * 1024;

pub fn tenant_prefix(company_id: Uuid) -> String {
    format!("companies/{company_id}")
}

/// Garante que a chave pertence ao prefixo da empresa.
pub fn ensure_tenant_key(company_id: Uuid, key: &str) -> Result<(), AppError> {
    validate_key(key)?;
    let prefix = format!("{}/", tenant_prefix(company_id));
    if !key.starts_with(&prefix) || key.len() == prefix.len() {
        return Err(AppError::InvalidPath);
    }
    Ok(())
}

/// Percorre todos os objetos sob `prefix` até `max_depth` níveis.
/// Sub-prefixos ilegíveis são ignorados com aviso.
pub async fn collect_objects(
    store: &dyn ObjectStore,
    prefix: &str,
    max_depth: usize,
) -> Result<Vec<ObjectMeta>, AppError> {
    let mut objects = Vec::new();
    let mut pending = vec![(prefix.to_string(), 0usize)];

    while let Some((current, depth)) = pending.pop() {
        let listing = match store.list(&current).await {
            Ok(listing) => listing,
            // A raiz precisa ser legível; subníveis não
            Err(e) if depth == 0 => return Err(e),
            Err(e) => {
                tracing::warn!("⚠️ Ignorando '{}' na recontagem: {}", current, e);
                continue;
            }
        };

        objects.extend(listing.objects);

        if depth + 1 < max_depth {
            pending.extend(listing.prefixes.into_iter().map(|p| (p, depth + 1)));
        } else if !listing.prefixes.is_empty() {
            tracing::warn!("⚠️ Profundidade máxima atingida em '{}'", current);
        }
    }

    Ok(objects)
}

#[derive(Clone)]
pub struct StorageService {
    store: Arc<dyn ObjectStore>,
    repo: StorageRepository,
    company_repo: CompanyRepository,
    subscription: SubscriptionService,
    max_upload_bytes: u64,
}

impl StorageService {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        repo: StorageRepository,
        company_repo: CompanyRepository,
        subscription: SubscriptionService,
        max_upload_mb: u64,
    ) -> Self {
        Self {
            store,
            repo,
            company_repo,
            subscription,
            max_upload_bytes: max_upload_mb * MB,
        }
    }

    async fn current_usage(&self, company_id: Uuid) -> Result<StorageUsage, AppError> {
        Ok(self.repo.find(company_id).await?.map(|row| row.usage()).unwrap_or_default())
    }

    // =========================================================================
    //  CAMINHO INCREMENTAL
    // =========================================================================

    /// Grava o arquivo em `companies/{id}/{relative_path}` e incrementa os contadores.
    pub async fn upload(&self, company_id: Uuid, relative_path: &str, bytes: &[u8]) -> Result<StoredObject, AppError> {
        let size = bytes.len() as u64;
        if size > self.max_upload_bytes {
            return Err(AppError::FileTooLarge { max_mb: self.max_upload_bytes / MB });
        }

        validate_key(relative_path)?;
        let key = format!("{}/{}", tenant_prefix(company_id), relative_path);
        let previous = self.store.size_of(&key).await?;

        let limit_mb = self.subscription.storage_limit_mb(company_id).await?;
        if limit_mb != UNLIMITED {
            let usage = self.current_usage(company_id).await?;
            let projected = usage.used_bytes - previous.unwrap_or(0) as i64 + size as i64;
            if projected > limit_mb * MB as i64 {
                return Err(AppError::StorageQuotaExceeded {
                    used_mb: bytes_to_mb(usage.used_bytes),
                    limit_mb,
                });
            }
        }

        self.store.put(&key, bytes).await?;

        // Sobrescrita: desconta o tamanho anterior
        if let Some(old_size) = previous {
            self.repo.apply_delta(company_id, &UsageDelta::delete(&key, old_size)).await?;
        }
        let delta = UsageDelta::upload(&key, size);
        self.repo.apply_delta(company_id, &delta).await?;

        tracing::debug!("Arquivo '{}' enviado ({})", key, format_file_size(size));
        Ok(StoredObject { key, size, category: delta.category })
    }

    pub async fn delete(&self, company_id: Uuid, key: &str) -> Result<(), AppError> {
        ensure_tenant_key(company_id, key)?;

        let size = self.store.size_of(key).await?.ok_or(AppError::RecordNotFound("file"))?;
        self.store.delete(key).await?;
        self.repo.apply_delta(company_id, &UsageDelta::delete(key, size)).await?;
        Ok(())
    }

    /// Remove anexos de um registro apagado. Falhas individuais só geram aviso.
    pub async fn delete_attachments(&self, company_id: Uuid, keys: &[String]) {
        for key in keys {
            match self.delete(company_id, key).await {
                Ok(()) | Err(AppError::RecordNotFound(_)) => {}
                Err(e) => tracing::warn!("⚠️ Falha ao remover anexo '{}': {}", key, e),
            }
        }
    }

    // =========================================================================
    //  RECONTAGEM
    // =========================================================================

    pub async fn recount(&self, company_id: Uuid) -> Result<StorageStatus, AppError> {
        let objects = collect_objects(self.store.as_ref(), &tenant_prefix(company_id), MAX_WALK_DEPTH).await?;
        let usage = StorageUsage::recount(objects.iter().map(|o| (o.key.as_str(), o.size)));

        let row = self.repo.overwrite(company_id, &usage).await?;
        tracing::info!(
            "🔄 Recontagem da empresa {}: {} arquivos, {} MB",
            company_id,
            usage.file_count,
            bytes_to_mb(usage.used_bytes)
        );

        let limit_mb = self.subscription.storage_limit_mb(company_id).await?;
        let mut status = StorageStatus::new(&usage, limit_mb);
        status.is_recount = true;
        status.last_calculated = Some(row.last_calculated);
        Ok(status)
    }

    /// Recontagem de todas as empresas ativas, sequencial (para job periódico).
    pub async fn recount_all(&self) -> Result<RecountSummary, AppError> {
        let ids = self.company_repo.list_active_ids().await?;
        let mut summary = RecountSummary { companies: ids.len(), ..Default::default() };

        for company_id in ids {
            match self.recount(company_id).await {
                Ok(_) => summary.succeeded += 1,
                Err(e) => {
                    summary.failed += 1;
                    tracing::error!("Falha na recontagem da empresa {}: {}", company_id, e);
                }
            }
        }

        tracing::info!(
            "🔄 Recontagem geral concluída: {} ok, {} falhas",
            summary.succeeded,
            summary.failed
        );
        Ok(summary)
    }

    pub async fn status(&self, company_id: Uuid) -> Result<StorageStatus, AppError> {
        let row = self.repo.find(company_id).await?;
        let usage = row.as_ref().map(|r| r.usage()).unwrap_or_default();
        let limit_mb = self.subscription.storage_limit_mb(company_id).await?;

        let mut status = StorageStatus::new(&usage, limit_mb);
        if let Some(row) = row {
            status.is_recount = row.is_recount;
            status.last_calculated = Some(row.last_calculated);
        }
        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::object_store::{Listing, LocalObjectStore};

    // Disco local com um prefixo que sempre falha ao listar
    struct FailingPrefix {
        inner: LocalObjectStore,
        broken: &'static str,
    }

    #[async_trait::async_trait]
    impl ObjectStore for FailingPrefix {
        async fn put(&self, key: &str, bytes: &[u8]) -> Result<u64, AppError> {
            self.inner.put(key, bytes).await
        }

        async fn size_of(&self, key: &str) -> Result<Option<u64>, AppError> {
            self.inner.size_of(key).await
        }

        async fn delete(&self, key: &str) -> Result<bool, AppError> {
            self.inner.delete(key).await
        }

        async fn list(&self, prefix: &str) -> Result<Listing, AppError> {
            if prefix == self.broken {
                return Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into());
            }
            self.inner.list(prefix).await
        }
    }

    #[test]
    fn tenant_keys_must_live_under_the_company_prefix() {
        let company = Uuid::new_v4();
        let other = Uuid::new_v4();

        assert!(ensure_tenant_key(company, &format!("companies/{company}/ariza/1.jpg")).is_ok());
        assert!(ensure_tenant_key(company, &format!("companies/{other}/ariza/1.jpg")).is_err());
        assert!(ensure_tenant_key(company, &format!("companies/{company}/")).is_err());
        assert!(ensure_tenant_key(company, &format!("companies/{company}/../{other}/x")).is_err());
    }

    #[tokio::test]
    async fn walk_collects_nested_objects() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path());
        store.put("companies/c/logo/l.png", &[0; 10]).await.unwrap();
        store.put("companies/c/ariza/2024/05/a.jpg", &[0; 20]).await.unwrap();
        store.put("companies/c/top.txt", &[0; 5]).await.unwrap();
        store.put("companies/other/x.bin", &[0; 99]).await.unwrap();

        let mut keys: Vec<_> = collect_objects(&store, "companies/c", MAX_WALK_DEPTH)
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.key)
            .collect();
        keys.sort();

        assert_eq!(
            keys,
            vec!["companies/c/ariza/2024/05/a.jpg", "companies/c/logo/l.png", "companies/c/top.txt"]
        );
    }

    #[tokio::test]
    async fn walk_skips_only_the_unreadable_folder() {
        let dir = tempfile::tempdir().unwrap();
        let store = FailingPrefix { inner: LocalObjectStore::new(dir.path()), broken: "companies/c/ariza" };
        store.put("companies/c/ariza/a.jpg", &[0; 20]).await.unwrap();
        store.put("companies/c/bakim/b.jpg", &[0; 30]).await.unwrap();
        store.put("companies/c/top.txt", &[0; 5]).await.unwrap();

        let objects = collect_objects(&store, "companies/c", MAX_WALK_DEPTH).await.unwrap();
        let total: u64 = objects.iter().map(|o| o.size).sum();
        assert_eq!(objects.len(), 2);
        assert_eq!(total, 35);
    }

    #[tokio::test]
    async fn unreadable_root_fails_the_walk() {
        let dir = tempfile::tempdir().unwrap();
        let store = FailingPrefix { inner: LocalObjectStore::new(dir.path()), broken: "companies/c" };

        assert!(collect_objects(&store, "companies/c", MAX_WALK_DEPTH).await.is_err());
    }

    #[tokio::test]
    async fn walk_stops_at_max_depth() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path());
        store.put("companies/c/a.txt", b"1").await.unwrap();
        store.put("companies/c/d1/b.txt", b"22").await.unwrap();
        store.put("companies/c/d1/d2/c.txt", b"333").await.unwrap();

        let objects = collect_objects(&store, "companies/c", 2).await.unwrap();
        let total: u64 = objects.iter().map(|o| o.size).sum();
        assert_eq!(objects.len(), 2);
        assert_eq!(total, 3);
    }

    #[tokio::test]
    async fn incremental_counters_converge_with_recount() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path());
        let mut counters = StorageUsage::default();

        let uploads: [(&str, &[u8]); 4] = [
            ("companies/c/logo/main.png", &[1; 300]),
            ("companies/c/ariza/f1.jpg", &[2; 1_000]),
            ("companies/c/bakim/m1.jpg", &[3; 2_500]),
            ("companies/c/belge/contract.pdf", &[4; 4_096]),
        ];
        for (key, bytes) in uploads {
            let size = store.put(key, bytes).await.unwrap();
            counters.apply(&UsageDelta::upload(key, size));
        }

        let removed = "companies/c/ariza/f1.jpg";
        let size = store.size_of(removed).await.unwrap().unwrap();
        store.delete(removed).await.unwrap();
        counters.apply(&UsageDelta::delete(removed, size));

        let objects = collect_objects(&store, "companies/c", MAX_WALK_DEPTH).await.unwrap();
        let recount = StorageUsage::recount(objects.iter().map(|o| (o.key.as_str(), o.size)));

        assert_eq!(counters, recount);
        assert_eq!(recount.used_bytes, 300 + 2_500 + 4_096);
        assert_eq!(recount.breakdown.fault_photos, 0);
        assert_eq!(recount.breakdown.documents, 4_096);
    }
}
