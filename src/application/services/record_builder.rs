use crate::domain::entities::form::{DIRTY_CATEGORIES, TICKET_PRODUCTS};
use crate::domain::entities::{
    EventDetail, FormSnapshot, PoolCounter, QueuePayload, WashCategory,
};
use crate::domain::value_objects::text_input::{as_text, is_blank};
use crate::domain::value_objects::{BaseDate, Quantity};
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

/// Reasons a batch is refused before anything is built. Nothing is queued on rejection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchRejection {
    #[error("base date is missing")]
    MissingBaseDate,
    #[error("{0}")]
    InvalidBaseDate(String),
    #[error("cage #{index} has no gross weight")]
    CageMissingGross { index: usize },
    #[error("cage #{index} has no category")]
    CageMissingCategory { index: usize },
    #[error("ticket line #{index} has no units")]
    TicketMissingUnits { index: usize },
}

/// Identity shared by every row of one saved batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchStamp {
    pub batch_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl BatchStamp {
    pub fn now() -> Self {
        Self {
            batch_id: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }
}

/// Checks the form; returns the parsed base date when the batch may be built.
pub fn validate(form: &FormSnapshot) -> Result<BaseDate, BatchRejection> {
    if is_blank(&form.base_date) {
        return Err(BatchRejection::MissingBaseDate);
    }
    let base_date = BaseDate::parse(as_text(&form.base_date).unwrap_or_default())
        .map_err(BatchRejection::InvalidBaseDate)?;

    for (i, cage) in form.cages.iter().enumerate() {
        if is_blank(&cage.gross) {
            return Err(BatchRejection::CageMissingGross { index: i + 1 });
        }
        if is_blank(&cage.category) {
            return Err(BatchRejection::CageMissingCategory { index: i + 1 });
        }
    }

    for (i, ticket) in form.tickets.iter().enumerate() {
        if is_blank(&ticket.units) {
            return Err(BatchRejection::TicketMissingUnits { index: i + 1 });
        }
    }

    Ok(base_date)
}

/// Turns a form snapshot into flat business events, in the order cages, tickets,
/// extra weight, wash loads, pool counters.
pub fn build(form: &FormSnapshot, stamp: BatchStamp) -> Result<Vec<QueuePayload>, BatchRejection> {
    let base_date = validate(form)?;
    let note = form
        .note
        .as_ref()
        .map(|n| n.trimmed().to_string())
        .unwrap_or_default();
    let created_at = stamp.created_at.timestamp_millis();

    let mut details = Vec::new();

    for cage in &form.cages {
        let category = cage.category_text().to_string();
        if !DIRTY_CATEGORIES.contains(&category.as_str()) {
            warn!(category = %category, "unknown dirty-linen category");
        }
        details.push(EventDetail::DirtyCage {
            category,
            cage_number: cage.cage_number_text().to_string(),
            gross_kg: Quantity::new(cage.gross_kg()),
            tare_kg: Quantity::new(cage.tare_kg()),
            net_kg: Quantity::new(cage.net_kg()),
        });
    }

    for ticket in &form.tickets {
        let product = ticket.product_text().to_string();
        if !TICKET_PRODUCTS.contains(&product.as_str()) {
            warn!(product = %product, "unknown ticket product");
        }
        details.push(EventDetail::TicketUnits {
            product,
            units: Quantity::coerce(as_text(&ticket.units)),
        });
    }

    if !is_blank(&form.extra_kg) {
        details.push(EventDetail::ExtraBags {
            net_kg: Quantity::coerce(as_text(&form.extra_kg)),
        });
    }

    for category in WashCategory::ALL {
        let buckets = form.wash.buckets(category).counts();
        // absence means "not run", not "zero reported"
        if !buckets.has_any() {
            continue;
        }
        details.push(EventDetail::HotelWash { category, buckets });
    }

    for counter in PoolCounter::ALL {
        let input = form.pool.input(counter);
        if is_blank(input) {
            continue;
        }
        details.push(EventDetail::PoolControl {
            counter,
            units: Quantity::coerce(as_text(input)),
        });
    }

    Ok(details
        .into_iter()
        .enumerate()
        .map(|(seq, detail)| QueuePayload {
            id: format!("{}:{}", stamp.batch_id, seq + 1),
            created_at,
            base_date,
            note: note.clone(),
            detail,
        })
        .collect())
}
