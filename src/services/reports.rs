//! Spreadsheet exports of the listing endpoints

use chrono::FixedOffset;
use rust_xlsxwriter::{Format, Workbook};

use crate::{
    dates::format_audit,
    error::AppResult,
    models::{
        account::{AccountQuery, RequestContext},
        equipment::EquipmentQuery,
        location::LocationQuery,
        maintenance::MaintenanceQuery,
        person::PersonQuery,
    },
    repository::Repository,
};

const COLUMN_WIDTH: f64 = 18.0;

pub const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Clone)]
pub struct ReportsService {
    repository: Repository,
    offset: FixedOffset,
}

impl ReportsService {
    pub fn new(repository: Repository, offset: FixedOffset) -> Self {
        Self { repository, offset }
    }

    pub async fn equipment(&self, query: &EquipmentQuery) -> AppResult<Vec<u8>> {
        let rows = self.repository.equipment_list(query).await?;
        let rows = rows
            .into_iter()
            .map(|e| {
                vec![
                    e.inventory_code,
                    e.serial,
                    e.brand,
                    e.model,
                    e.equipment_type.to_string(),
                    e.state.to_string(),
                    e.location_code.unwrap_or_default(),
                    e.custodian_area.unwrap_or_default(),
                ]
            })
            .collect();
        render(
            "Equipment",
            &["Inventory code", "Serial", "Brand", "Model", "Type", "State", "Location", "Custodian"],
            rows,
        )
    }

    pub async fn locations(&self, query: &LocationQuery) -> AppResult<Vec<u8>> {
        let rows = self.repository.locations_list(query).await?;
        let rows = rows
            .into_iter()
            .map(|l| vec![l.code, l.site, l.building, l.floor, l.room])
            .collect();
        render("Locations", &["Code", "Site", "Building", "Floor", "Room"], rows)
    }

    pub async fn people(&self, query: &PersonQuery) -> AppResult<Vec<u8>> {
        let rows = self.repository.people_list(query).await?;
        let rows = rows
            .into_iter()
            .map(|p| {
                vec![
                    p.national_id,
                    p.given_names,
                    p.family_names,
                    p.position_name.unwrap_or_default(),
                    p.email.unwrap_or_default(),
                    p.phone.unwrap_or_default(),
                ]
            })
            .collect();
        render(
            "Maintenance people",
            &["National ID", "Given names", "Family names", "Position", "Email", "Phone"],
            rows,
        )
    }

    pub async fn maintenance(&self, query: &MaintenanceQuery) -> AppResult<Vec<u8>> {
        let filter = query.to_filter()?;
        let rows = self.repository.maintenance_list(&filter).await?;
        let rows = rows
            .iter()
            .map(|m| {
                let v = m.view(self.offset);
                vec![
                    v.inventory_code.unwrap_or_default(),
                    v.equipment.unwrap_or_default(),
                    v.person.unwrap_or_default(),
                    v.kind.to_string(),
                    v.priority.to_string(),
                    v.result.map(|r| r.to_string()).unwrap_or_default(),
                    v.scheduled_at.unwrap_or_default(),
                    v.executed_at.unwrap_or_default(),
                    v.next_due.unwrap_or_default(),
                    v.description.unwrap_or_default(),
                    v.notes.unwrap_or_default(),
                ]
            })
            .collect();
        render(
            "Maintenance",
            &[
                "Inventory code",
                "Equipment",
                "Responsible",
                "Kind",
                "Priority",
                "Result",
                "Scheduled",
                "Executed",
                "Next due",
                "Description",
                "Notes",
            ],
            rows,
        )
    }

    pub async fn accounts(&self, ctx: &RequestContext, query: &AccountQuery) -> AppResult<Vec<u8>> {
        ctx.require_admin()?;
        let rows = self.repository.accounts_list(query).await?;
        let rows = rows
            .into_iter()
            .map(|a| {
                vec![
                    a.username,
                    a.role.to_string(),
                    format_audit(&a.created_at, self.offset),
                    format_audit(&a.updated_at, self.offset),
                ]
            })
            .collect();
        render("Accounts", &["Username", "Role", "Created", "Updated"], rows)
    }
}

/// One worksheet with a bold header row and uniform column width
fn render(sheet: &str, headers: &[&str], rows: Vec<Vec<String>>) -> AppResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet)?;

    for (col, header) in headers.iter().enumerate() {
        let col = col as u16;
        worksheet.set_column_width(col, COLUMN_WIDTH)?;
        worksheet.write_string_with_format(0, col, *header, &bold)?;
    }
    for (row, cells) in rows.iter().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            worksheet.write_string(row as u32 + 1, col as u16, cell)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_a_zip_container() {
        let bytes = render(
            "Locations",
            &["Code", "Site"],
            vec![vec!["LAB-1".into(), "Norte".into()], vec!["LAB-2".into(), String::new()]],
        )
        .unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn empty_listing_still_renders() {
        let bytes = render("Accounts", &["Username", "Role"], Vec::new()).unwrap();
        assert!(!bytes.is_empty());
    }

    #[test]
    fn invalid_sheet_names_are_errors() {
        assert!(render("bad[name]", &["A"], Vec::new()).is_err());
    }
}
