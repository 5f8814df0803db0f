// src/services/document_service.rs

use chrono::Utc;
use genpdf::{elements, style, Element};
use image::Luma;
use qrcode::QrCode;
use serde::Serialize;

use crate::{
    common::{
        error::AppError,
        format::{format_currency, format_date, format_datetime, format_duration},
    },
    models::{
        asset::InventoryAsset,
        fault::Fault,
        maintenance::MaintenanceRecord,
        outage::PowerOutage,
        stock::StockItemView,
    },
};

/// Tabela genérica usada tanto no PDF quanto no CSV.
#[derive(Debug, Clone)]
pub struct ReportTable {
    pub title: &'static str,
    pub columns: Vec<&'static str>,
    pub weights: Vec<usize>,
    pub rows: Vec<Vec<String>>,
}

// Nome do enum como aparece no JSON
fn wire_name<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => s,
        _ => String::new(),
    }
}

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

pub fn fault_table(faults: &[Fault]) -> ReportTable {
    ReportTable {
        title: "Arıza Kayıtları",
        columns: vec!["Tarih", "Başlık", "Durum", "Öncelik", "Çözüm"],
        weights: vec![2, 4, 2, 2, 4],
        rows: faults
            .iter()
            .map(|f| {
                vec![
                    format_date(f.created_at.date_naive()),
                    f.title.clone(),
                    wire_name(&f.status),
                    wire_name(&f.priority),
                    opt(f.resolution.as_deref()),
                ]
            })
            .collect(),
    }
}

pub fn maintenance_table(records: &[MaintenanceRecord]) -> ReportTable {
    ReportTable {
        title: "Bakım Kayıtları",
        columns: vec!["Tarih", "Tür", "Yapan", "Genel Durum", "Notlar"],
        weights: vec![2, 2, 3, 2, 4],
        rows: records
            .iter()
            .map(|r| {
                vec![
                    format_date(r.performed_at.date_naive()),
                    wire_name(&r.kind),
                    r.performed_by.clone(),
                    wire_name(&r.general_status),
                    opt(r.notes.as_deref()),
                ]
            })
            .collect(),
    }
}

pub fn outage_table(outages: &[PowerOutage]) -> ReportTable {
    ReportTable {
        title: "Elektrik Kesintileri",
        columns: vec!["Başlangıç", "Bitiş", "Süre", "Neden", "Kayıp Üretim (kWh)", "Kayıp Gelir"],
        weights: vec![3, 3, 2, 3, 2, 2],
        rows: outages
            .iter()
            .map(|o| {
                vec![
                    format_datetime(o.started_at),
                    o.ended_at.map(format_datetime).unwrap_or_else(|| "Devam ediyor".into()),
                    o.duration_minutes.map(format_duration).unwrap_or_default(),
                    o.cause.clone(),
                    opt(o.lost_production_kwh),
                    o.lost_revenue.map(format_currency).unwrap_or_default(),
                ]
            })
            .collect(),
    }
}

pub fn stock_table(items: &[StockItemView]) -> ReportTable {
    ReportTable {
        title: "Stok Listesi",
        columns: vec!["Malzeme", "Kategori", "Miktar", "Birim", "Min.", "Durum", "Birim Fiyat"],
        weights: vec![4, 2, 2, 1, 1, 2, 2],
        rows: items
            .iter()
            .map(|v| {
                vec![
                    v.item.name.clone(),
                    v.item.category.clone(),
                    v.item.quantity.normalize().to_string(),
                    v.item.unit.clone(),
                    v.item.minimum_quantity.normalize().to_string(),
                    wire_name(&v.status),
                    v.item.unit_price.map(format_currency).unwrap_or_default(),
                ]
            })
            .collect(),
    }
}

/// CSV em UTF-8 com linha de cabeçalho.
pub fn render_csv(table: &ReportTable) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(&table.columns)
        .map_err(|e| AppError::ExportError(e.to_string()))?;
    for row in &table.rows {
        writer.write_record(row).map_err(|e| AppError::ExportError(e.to_string()))?;
    }
    writer.into_inner().map_err(|e| AppError::ExportError(e.to_string()))
}

/// Conteúdo do QR da etiqueta: id do ativo + número de série.
pub fn qr_payload(asset: &InventoryAsset) -> String {
    format!("{}|{}", asset.id, asset.serial_number.as_deref().unwrap_or("-"))
}

fn export_error(e: impl std::fmt::Display) -> AppError {
    AppError::ExportError(e.to_string())
}

#[derive(Clone)]
pub struct DocumentService {
    fonts_dir: String,
}

impl DocumentService {
    pub fn new(fonts_dir: String) -> Self {
        Self { fonts_dir }
    }

    fn new_document(&self, title: &str) -> Result<genpdf::Document, AppError> {
        let font_family = genpdf::fonts::from_files(&self.fonts_dir, "Roboto", None)
            .map_err(|_| AppError::FontNotFound(self.fonts_dir.clone()))?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(title);
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);
        Ok(doc)
    }

    fn render(doc: genpdf::Document) -> Result<Vec<u8>, AppError> {
        let mut buffer = Vec::new();
        doc.render(&mut buffer).map_err(export_error)?;
        Ok(buffer)
    }

    pub fn render_pdf(&self, company_name: &str, table: &ReportTable) -> Result<Vec<u8>, AppError> {
        let mut doc = self.new_document(table.title)?;

        // --- CABEÇALHO ---
        doc.push(elements::Paragraph::new(company_name).styled(style::Style::new().bold().with_font_size(16)));
        doc.push(elements::Paragraph::new(table.title).styled(style::Style::new().bold().with_font_size(13)));
        doc.push(
            elements::Paragraph::new(format!("Oluşturma: {}", format_datetime(Utc::now())))
                .styled(style::Style::new().with_font_size(9)),
        );
        doc.push(elements::Break::new(1.5));

        // --- TABELA ---
        let mut layout = elements::TableLayout::new(table.weights.clone());
        layout.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let bold = style::Style::new().bold().with_font_size(9);
        let mut header = layout.row();
        for column in &table.columns {
            header.push_element(elements::Paragraph::new(*column).styled(bold));
        }
        header.push().map_err(export_error)?;

        let cell = style::Style::new().with_font_size(8);
        for row in &table.rows {
            let mut table_row = layout.row();
            for value in row {
                table_row.push_element(elements::Paragraph::new(value.as_str()).styled(cell));
            }
            table_row.push().map_err(export_error)?;
        }
        doc.push(layout);

        doc.push(elements::Break::new(1));
        doc.push(
            elements::Paragraph::new(format!("Toplam kayıt: {}", table.rows.len()))
                .styled(style::Style::new().italic().with_font_size(8)),
        );

        Self::render(doc)
    }

    /// Etiqueta do ativo com QR code.
    pub fn asset_label_pdf(&self, company_name: &str, asset: &InventoryAsset) -> Result<Vec<u8>, AppError> {
        let mut doc = self.new_document("Demirbaş Etiketi")?;

        doc.push(elements::Paragraph::new(company_name).styled(style::Style::new().bold().with_font_size(14)));
        doc.push(elements::Paragraph::new(format!(
            "{} {} ({})",
            asset.brand.as_deref().unwrap_or(""),
            asset.model.as_deref().unwrap_or(""),
            wire_name(&asset.category)
        )));
        doc.push(elements::Paragraph::new(format!(
            "Seri No: {}",
            asset.serial_number.as_deref().unwrap_or("-")
        )));
        if let Some(end) = asset.warranty_end {
            doc.push(elements::Paragraph::new(format!("Garanti bitişi: {}", format_date(end))));
        }
        doc.push(elements::Break::new(1));

        let code = QrCode::new(qr_payload(asset).as_bytes()).map_err(export_error)?;
        let image_buffer = code.render::<Luma<u8>>().build();
        let dynamic_image = image::DynamicImage::ImageLuma8(image_buffer);

        let pdf_image = elements::Image::from_dynamic_image(dynamic_image)
            .map_err(export_error)?
            .with_scale(genpdf::Scale::new(0.5, 0.5));
        doc.push(pdf_image);

        Self::render(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        asset::{AssetCategory, AssetStatus},
        fault::{FaultPriority, FaultStatus},
        stock::StockItem,
    };
    use chrono::{Duration, TimeZone};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn fault() -> Fault {
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap();
        Fault {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            site_id: None,
            plant_id: None,
            title: "String 4 düşük akım, kontrol".into(),
            description: String::new(),
            status: FaultStatus::InProgress,
            priority: FaultPriority::High,
            photos: vec![],
            reported_by: Uuid::new_v4(),
            assigned_to: None,
            resolution: None,
            resolved_at: None,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn fault_rows_use_wire_names_and_local_dates() {
        let table = fault_table(&[fault()]);
        assert_eq!(table.columns.len(), table.weights.len());
        assert_eq!(table.rows[0][0], "05.03.2024");
        assert_eq!(table.rows[0][2], "in_progress");
        assert_eq!(table.rows[0][3], "high");
    }

    #[test]
    fn csv_has_header_and_quotes_commas() {
        let csv = String::from_utf8(render_csv(&fault_table(&[fault()])).unwrap()).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("Tarih,Başlık,Durum,Öncelik,Çözüm"));
        assert_eq!(lines.next(), Some("05.03.2024,\"String 4 düşük akım, kontrol\",in_progress,high,"));
    }

    #[test]
    fn ongoing_outage_is_labelled() {
        let start = Utc.with_ymd_and_hms(2024, 7, 1, 8, 0, 0).unwrap();
        let outage = PowerOutage {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            site_id: Uuid::new_v4(),
            plant_id: None,
            started_at: start,
            ended_at: None,
            duration_minutes: None,
            cause: "Şebeke".into(),
            affected_capacity_kw: None,
            lost_production_kwh: None,
            lost_revenue: None,
            description: None,
            created_by: Uuid::new_v4(),
            created_at: start,
            updated_at: start + Duration::minutes(1),
        };
        let table = outage_table(&[outage]);
        assert_eq!(table.rows[0][1], "Devam ediyor");
        assert_eq!(table.rows[0][2], "");
    }

    #[test]
    fn stock_rows_include_computed_status() {
        let item = StockItem {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            site_id: None,
            plant_id: None,
            name: "Sigorta 15A".into(),
            category: "elektrik".into(),
            unit: "adet".into(),
            quantity: Decimal::from(2),
            minimum_quantity: Decimal::from(5),
            maximum_quantity: None,
            unit_price: None,
            supplier: None,
            location: None,
            notes: None,
            last_movement_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let table = stock_table(&[StockItemView::from(item)]);
        assert_eq!(table.rows[0][2], "2");
        assert_eq!(table.rows[0][5], "low");
    }

    #[test]
    fn qr_payload_joins_id_and_serial() {
        let asset = InventoryAsset {
            id: Uuid::nil(),
            company_id: Uuid::new_v4(),
            site_id: Uuid::new_v4(),
            plant_id: None,
            category: AssetCategory::Panel,
            brand: None,
            model: None,
            serial_number: Some("JA-550".into()),
            quantity: 1,
            status: AssetStatus::Active,
            installed_at: None,
            warranty_start: None,
            warranty_months: None,
            warranty_end: None,
            warranty_scope: None,
            supplier: None,
            invoice_no: None,
            location: None,
            notes: None,
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(qr_payload(&asset), "00000000-0000-0000-0000-000000000000|JA-550");
    }

    #[test]
    fn missing_fonts_are_reported() {
        let service = DocumentService::new("/nonexistent/fonts".into());
        let result = service.render_pdf("Güneş", &fault_table(&[]));
        assert!(matches!(result, Err(AppError::FontNotFound(_))));
    }
}
