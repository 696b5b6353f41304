//! Filing status business logic
//!
//! Derives the traffic-light annual filing status of an LLC from its
//! `filing_current` flag and a calendar date. The status is never stored; it is
//! recomputed on every read so it flips on its own when the date crosses the
//! April 15 deadline or the flag is toggled.

use crate::{
    entities::{Llc, llc},
    errors::Result,
};
use chrono::{Datelike, NaiveDate};
use sea_orm::{QueryOrder, prelude::*};
use serde::Serialize;
use std::fmt;

const DEADLINE_MONTH: u32 = 4;
const DEADLINE_DAY: u32 = 15;

/// Traffic-light classification of an LLC's annual filing
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilingStatus {
    /// Filing for the current year is done
    Green,
    /// Not filed yet, deadline still ahead
    Yellow,
    /// Not filed and the deadline has passed
    Red,
}

impl FilingStatus {
    /// Lowercase label used by the display layer
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Red => "red",
        }
    }
}

impl fmt::Display for FilingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// April 15 of the given year.
#[must_use]
pub fn filing_deadline(year: i32) -> NaiveDate {
    // April 15 exists in every year chrono can represent
    NaiveDate::from_ymd_opt(year, DEADLINE_MONTH, DEADLINE_DAY).unwrap_or(NaiveDate::MAX)
}

/// Classifies an LLC's filing status as of `today`.
///
/// A current filing is always green. Otherwise the LLC is yellow before April 15 of
/// `today`'s year and red on or after it.
#[must_use]
pub fn classify_filing_status(filing_current: bool, today: NaiveDate) -> FilingStatus {
    if filing_current {
        return FilingStatus::Green;
    }

    if today >= filing_deadline(today.year()) {
        FilingStatus::Red
    } else {
        FilingStatus::Yellow
    }
}

/// One line of the filing report
#[derive(Debug, Clone)]
pub struct FilingReportRow {
    /// The LLC being reported on
    pub llc: llc::Model,
    /// Its status on the report date
    pub status: FilingStatus,
}

/// Classifies every LLC as of `today`, ordered by name.
pub async fn filing_report<C>(db: &C, today: NaiveDate) -> Result<Vec<FilingReportRow>>
where
    C: ConnectionTrait,
{
    let llcs = Llc::find().order_by_asc(llc::Column::Name).all(db).await?;

    Ok(llcs
        .into_iter()
        .map(|llc| {
            let status = llc.filing_status_on(today);
            FilingReportRow { llc, status }
        })
        .collect())
}

/// Formats a filing report into a human-readable summary string.
#[must_use]
pub fn format_filing_report(rows: &[FilingReportRow], today: NaiveDate) -> String {
    use std::fmt::Write;

    let mut summary = format!(
        "Filing status as of {} (deadline {})\n",
        today.format("%Y-%m-%d"),
        filing_deadline(today.year()).format("%B %-d")
    );

    for row in rows {
        let last_filed = row
            .llc
            .last_filing_date
            .map_or_else(|| "never".to_string(), |d| d.format("%Y-%m-%d").to_string());
        // write! into a String cannot fail
        let _ = writeln!(
            summary,
            "  [{:<6}] {} (last filed: {})",
            row.status, row.llc.name, last_filed
        );
    }

    summary
}
