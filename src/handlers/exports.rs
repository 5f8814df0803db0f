// src/handlers/exports.rs

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{PermReportsExport, RequirePermission},
        tenancy::TenantContext,
    },
    models::{fault::FaultFilter, maintenance::MaintenanceFilter, outage::OutageFilter},
    services::document_service::{
        fault_table, maintenance_table, outage_table, render_csv, stock_table, ReportTable,
    },
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Pdf,
    Csv,
}

impl ExportFormat {
    fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Csv => "text/csv; charset=utf-8",
        }
    }

    fn extension(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Csv => "csv",
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    pub format: ExportFormat,
}

/// Monta a tabela do relatório respeitando a visibilidade do usuário.
async fn build_table(
    app_state: &AppState,
    user: &AuthenticatedUser,
    tenant: TenantContext,
    kind: &str,
) -> Result<ReportTable, AppError> {
    match kind {
        "faults" => {
            let faults = app_state.fault_service.list(&user.0, tenant.0, &FaultFilter::default()).await?;
            Ok(fault_table(&faults))
        }
        "maintenance" => {
            let records = app_state
                .maintenance_service
                .list(&user.0, tenant.0, &MaintenanceFilter::default())
                .await?;
            Ok(maintenance_table(&records))
        }
        "outages" => {
            let outages = app_state.outage_service.list(&user.0, tenant.0, &OutageFilter::default()).await?;
            Ok(outage_table(&outages))
        }
        "stock" => {
            let items = app_state.stock_service.list_items(&user.0, tenant.0).await?;
            Ok(stock_table(&items))
        }
        _ => Err(AppError::RecordNotFound("report")),
    }
}

// GET /api/exports/{kind}?format=pdf|csv
pub async fn export_report(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    _guard: RequirePermission<PermReportsExport>,
    Path(kind): Path<String>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ApiError> {
    let to_api = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

    let table = build_table(&app_state, &user, tenant, &kind).await.map_err(to_api)?;

    let bytes = match query.format {
        ExportFormat::Csv => render_csv(&table).map_err(to_api)?,
        ExportFormat::Pdf => {
            let company = app_state.subscription_service.load_company(tenant.0).await.map_err(to_api)?;
            app_state.document_service.render_pdf(&company.name, &table).map_err(to_api)?
        }
    };

    tracing::info!("📄 Relatório '{}' exportado ({} bytes)", kind, bytes.len());

    let headers = [
        (header::CONTENT_TYPE, query.format.content_type().to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}.{}\"", kind, query.format.extension()),
        ),
    ];

    Ok((headers, bytes).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_defaults_to_pdf() {
        let query: ExportQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.format, ExportFormat::Pdf);
    }

    #[test]
    fn csv_format_carries_text_content_type() {
        let query: ExportQuery = serde_json::from_str(r#"{"format":"csv"}"#).unwrap();
        assert_eq!(query.format.content_type(), "text/csv; charset=utf-8");
        assert_eq!(query.format.extension(), "csv");
    }
}
