//! Notification text rendering.
//!
//! Items are rendered in the order the tracking service returned them; the
//! service is trusted to send newest first, so `First(n)` yields the latest
//! `n` events.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};

use crate::tracking::{HistoryItem, RecordStatus, TrackingId, TrackingRecord};

use super::types::ItemLimit;

/// Rendered in place of a date the service sent in an unknown shape.
pub const INVALID_DATE: &str = "Invalid Date";

const BLOCK_SEPARATOR: &str = "\n\n";

/// Naive timestamp layouts accepted after RFC 3339 fails.
const NAIVE_LAYOUTS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Turns tracking records into notification text.
#[derive(Debug, Clone)]
pub struct MessageFormatter {
    limit: ItemLimit,
    offset: FixedOffset,
}

impl MessageFormatter {
    pub fn new(limit: ItemLimit) -> Self {
        Self {
            limit,
            offset: Utc.fix(),
        }
    }

    /// Render dates at `minutes` east of UTC. Out-of-range values keep UTC.
    pub fn with_utc_offset_minutes(mut self, minutes: i32) -> Self {
        if let Some(offset) = FixedOffset::east_opt(minutes.saturating_mul(60)) {
            self.offset = offset;
        }
        self
    }

    /// Render the single message for one identifier.
    pub fn format(&self, id: &TrackingId, record: &TrackingRecord) -> String {
        let mut blocks = vec![header(id)];

        match record.status {
            RecordStatus::Error => {
                blocks.push(format!(
                    "❌ {}",
                    record.message.as_deref().unwrap_or_default()
                ));
            }
            RecordStatus::Success if record.total() > 0 => {
                let up_to = match self.limit {
                    ItemLimit::All => usize::try_from(record.total()).unwrap_or(usize::MAX),
                    ItemLimit::First(n) => n,
                };
                blocks.extend(
                    record
                        .items()
                        .iter()
                        .take(up_to)
                        .map(|item| self.format_item(item)),
                );
            }
            RecordStatus::Success | RecordStatus::Unknown => {}
        }

        blocks.join(BLOCK_SEPARATOR)
    }

    fn format_item(&self, item: &HistoryItem) -> String {
        let mut block = format!(
            "📅 {}\n🚧 {}\n🏪 {}",
            self.format_date(&item.date),
            item.status_desc,
            item.warehouse.name
        );

        if let Some(batch) = &item.batch {
            block.push_str(&format!(
                "\nℹ️ <b>{}</b> (<code>{}</code>)",
                batch.kind, batch.code
            ));
        }

        block
    }

    /// Long US-English form, e.g. `January 1, 2024 at 10:00 AM`.
    pub fn format_date(&self, raw: &str) -> String {
        match self.parse_date(raw) {
            Some(date) => date.format("%B %-d, %Y at %-I:%M %p").to_string(),
            None => INVALID_DATE.to_string(),
        }
    }

    /// Timestamps with a zone are converted; naive ones are read as display
    /// time; bare dates are midnight UTC.
    fn parse_date(&self, raw: &str) -> Option<DateTime<FixedOffset>> {
        let raw = raw.trim();

        if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
            return Some(date.with_timezone(&self.offset));
        }

        for layout in NAIVE_LAYOUTS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, layout) {
                return self.offset.from_local_datetime(&naive).single();
            }
        }

        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| Utc.from_utc_datetime(&naive).with_timezone(&self.offset))
    }
}

fn header(id: &TrackingId) -> String {
    format!("🚚 <b>Parcel tracking history</b>: <code>{}</code>", id)
}
