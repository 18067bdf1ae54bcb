//! Text and JSON views of the portal.
//!
//! The tables mirror the web page's two cards; an empty list renders a
//! single placeholder row.

use std::fmt;

use serde::Serialize;

use crate::model::{Donation, Donor};
use crate::portal::DonorOption;

/// Placeholder row for an empty donor list.
pub const NO_DONORS: &str = "No donors";
/// Placeholder row for an empty donation list.
pub const NO_DONATIONS: &str = "No donations";
/// First line of the donor selector.
pub const SELECT_DONOR: &str = "-- Select Donor --";
/// Shown in place of a donor name the server did not embed.
pub const UNKNOWN_DONOR: &str = "—";
/// Shown in place of a missing or unreadable donation date.
pub const UNKNOWN_DATE: &str = "—";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A plain-text table with left-aligned columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    headers: Vec<&'static str>,
    rows: Vec<Vec<String>>,
    placeholder: &'static str,
}

impl Table {
    /// Create a table; `placeholder` is rendered when it has no rows.
    #[must_use]
    pub fn new(headers: Vec<&'static str>, placeholder: &'static str) -> Self {
        Self {
            headers,
            rows: Vec::new(),
            placeholder,
        }
    }

    /// Append a row.
    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }
        widths
    }
}

fn write_row<S: AsRef<str>>(
    f: &mut fmt::Formatter<'_>,
    cells: &[S],
    widths: &[usize],
) -> fmt::Result {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell.as_ref(), width = *width))
        .collect::<Vec<_>>()
        .join("  ");
    writeln!(f, "{}", line.trim_end())
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.widths();
        write_row(f, self.headers.as_slice(), &widths)?;

        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        write_row(f, rule.as_slice(), &widths)?;

        if self.rows.is_empty() {
            return writeln!(f, "{}", self.placeholder);
        }
        for row in &self.rows {
            write_row(f, row.as_slice(), &widths)?;
        }
        Ok(())
    }
}

/// The donor card: `#`, name, blood group, city and the id used to delete.
#[must_use]
pub fn donor_table(donors: &[Donor]) -> Table {
    let mut table = Table::new(vec!["#", "Name", "Blood", "City", "ID"], NO_DONORS);
    for (i, donor) in donors.iter().enumerate() {
        table.push(vec![
            (i + 1).to_string(),
            donor.name.clone(),
            donor.blood_group.clone(),
            donor.city.clone().unwrap_or_default(),
            donor.id.clone(),
        ]);
    }
    table
}

/// The donation card: `#`, donor name, quantity, date and location.
#[must_use]
pub fn donation_table(donations: &[Donation]) -> Table {
    let mut table = Table::new(vec!["#", "Donor", "Qty", "Date", "Location"], NO_DONATIONS);
    for (i, donation) in donations.iter().enumerate() {
        table.push(vec![
            (i + 1).to_string(),
            donation.donor_name().unwrap_or(UNKNOWN_DONOR).to_string(),
            donation.quantity.to_string(),
            donation
                .date
                .map_or_else(|| UNKNOWN_DATE.to_string(), |d| d.format(DATE_FORMAT).to_string()),
            donation.location.clone().unwrap_or_default(),
        ]);
    }
    table
}

/// The donor selector, one `id  label` line per option after the placeholder.
#[must_use]
pub fn donor_selector(options: &[DonorOption]) -> String {
    let width = options
        .iter()
        .map(|o| o.value.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = format!("{SELECT_DONOR}\n");
    for option in options {
        out.push_str(&format!(
            "{:<width$}  {}\n",
            option.value,
            option.label,
            width = width
        ));
    }
    out
}

/// Everything the page shows, for `--format json`.
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    /// Last status message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'a str>,
    /// Current donors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub donors: Option<&'a [Donor]>,
    /// Current donations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub donations: Option<&'a [Donation]>,
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::model::{DonorRef, DonorSummary};

    fn donor(id: &str, name: &str, blood_group: &str, city: Option<&str>) -> Donor {
        Donor {
            id: id.to_string(),
            name: name.to_string(),
            blood_group: blood_group.to_string(),
            phone: None,
            email: None,
            city: city.map(str::to_string),
        }
    }

    fn donation(donor: Option<DonorRef>) -> Donation {
        Donation {
            id: "n1".to_string(),
            donor,
            quantity: 2,
            date: NaiveDate::from_ymd_opt(2024, 2, 29),
            location: Some("Camp".to_string()),
            notes: None,
        }
    }

    #[test]
    fn test_empty_donor_table_has_placeholder() {
        let out = donor_table(&[]).to_string();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("#  Name"));
        assert_eq!(lines[2], NO_DONORS);
    }

    #[test]
    fn test_empty_donation_table_has_placeholder() {
        let table = donation_table(&[]);
        assert!(table.is_empty());
        assert_eq!(table.to_string().lines().last(), Some(NO_DONATIONS));
    }

    #[test]
    fn test_donor_table_rows() {
        let donors = vec![
            donor("d1", "Asha", "A+", Some("Pune")),
            donor("d2", "Benedict", "O-", None),
        ];
        let out = donor_table(&donors).to_string();
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "#  Name      Blood  City  ID");
        assert_eq!(lines[2], "1  Asha      A+     Pune  d1");
        assert_eq!(lines[3], "2  Benedict  O-           d2");
        assert!(!out.contains(NO_DONORS));
    }

    #[test]
    fn test_donation_table_rows() {
        let embedded = DonorRef::Summary(DonorSummary {
            id: Some("d1".to_string()),
            name: Some("Asha".to_string()),
            blood_group: None,
        });
        let donations = vec![
            donation(Some(embedded)),
            donation(Some(DonorRef::Id("d9".to_string()))),
        ];
        let table = donation_table(&donations);
        assert_eq!(table.len(), 2);

        let out = table.to_string();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[2], "1  Asha   2    2024-02-29  Camp");
        assert_eq!(lines[3], "2  —      2    2024-02-29  Camp");
    }

    #[test]
    fn test_donation_table_missing_date_and_name() {
        let nameless = DonorRef::Summary(DonorSummary {
            id: Some("d2".to_string()),
            name: None,
            blood_group: None,
        });
        let mut row = donation(Some(nameless));
        row.date = None;
        let out = donation_table(&[row]).to_string();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[2], "1  —      2    —     Camp");
    }

    #[test]
    fn test_donor_selector() {
        let options = vec![
            DonorOption {
                value: "d1".to_string(),
                label: "Asha (A+)".to_string(),
            },
            DonorOption {
                value: "d10".to_string(),
                label: "Ben (B-)".to_string(),
            },
        ];
        let out = donor_selector(&options);
        assert_eq!(out, "-- Select Donor --\nd1   Asha (A+)\nd10  Ben (B-)\n");
    }

    #[test]
    fn test_donor_selector_empty() {
        assert_eq!(donor_selector(&[]), "-- Select Donor --\n");
    }

    #[test]
    fn test_snapshot_json() {
        let donors = vec![donor("d1", "Asha", "A+", None)];
        let snapshot = Snapshot {
            message: Some("Donor added"),
            donors: Some(&donors),
            donations: None,
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["message"], "Donor added");
        assert_eq!(json["donors"][0]["_id"], "d1");
        assert_eq!(json["donors"][0]["bloodGroup"], "A+");
        assert!(json.get("donations").is_none());
    }
}
