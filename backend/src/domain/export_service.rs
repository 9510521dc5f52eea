//! Data export for the UI layer.
//!
//! Renders the inventory and the usage log as CSV text, and the whole state as
//! pretty JSON, so the UI can offer a download without knowing the storage
//! format.

use anyhow::Result;
use csv::Writer;
use log::info;

use crate::domain::state::RefillrState;

#[derive(Debug, Clone, Default)]
pub struct ExportService;

fn finish(writer: Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV export: {}", e.error()))?;
    Ok(String::from_utf8(bytes)?)
}

impl ExportService {
    pub fn new() -> Self {
        Self
    }

    /// One row per item, header first
    pub fn inventory_csv(&self, state: &RefillrState) -> Result<String> {
        let mut writer = Writer::from_writer(Vec::new());
        writer.write_record([
            "id",
            "name",
            "category",
            "quantity",
            "unit",
            "calories_per_unit",
            "purchase_date",
            "expiry_date",
            "auto_subtract_daily",
            "daily_usage",
            "refill_threshold",
        ])?;

        for item in &state.items {
            writer.write_record([
                item.id.clone(),
                item.name.clone(),
                item.category.to_string(),
                item.quantity.to_string(),
                item.unit.to_string(),
                item.calories_per_unit.to_string(),
                item.purchase_date.format("%Y-%m-%d").to_string(),
                item.expiry_date.format("%Y-%m-%d").to_string(),
                item.auto_subtract_daily.to_string(),
                item.daily_usage.map(|v| v.to_string()).unwrap_or_default(),
                item.refill_threshold.map(|v| v.to_string()).unwrap_or_default(),
            ])?;
        }

        let csv = finish(writer)?;
        info!("Exported {} items as CSV", state.items.len());
        Ok(csv)
    }

    /// One row per usage record in log order. Records of removed items have an empty name.
    pub fn usage_csv(&self, state: &RefillrState) -> Result<String> {
        let mut writer = Writer::from_writer(Vec::new());
        writer.write_record(["date", "item_id", "item_name", "quantity", "calories"])?;

        for record in &state.usage_records {
            let item_name = state
                .find_item(&record.item_id)
                .map(|item| item.name.as_str())
                .unwrap_or("");
            writer.write_record([
                record.date.format("%Y-%m-%d").to_string(),
                record.item_id.clone(),
                item_name.to_string(),
                record.quantity.to_string(),
                record.calories.to_string(),
            ])?;
        }

        let csv = finish(writer)?;
        info!("Exported {} usage records as CSV", state.usage_records.len());
        Ok(csv)
    }

    pub fn state_json(&self, state: &RefillrState) -> Result<String> {
        Ok(serde_json::to_string_pretty(state)?)
    }
}
