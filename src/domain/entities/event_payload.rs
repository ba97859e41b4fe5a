use super::form::{BucketCounts, PoolCounter, WashCategory};
use crate::domain::value_objects::{BaseDate, EventKind, Quantity};
use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use serde_json::Value;

pub const EXTRA_DETAIL: &str = "Extra (mezcla)";

/// Kind-specific content of a business event. Each variant carries exactly its fields.
#[derive(Debug, Clone, PartialEq)]
pub enum EventDetail {
    DirtyCage {
        category: String,
        cage_number: String,
        gross_kg: Quantity,
        tare_kg: Quantity,
        net_kg: Quantity,
    },
    TicketUnits {
        product: String,
        units: Quantity,
    },
    ExtraBags {
        net_kg: Quantity,
    },
    HotelWash {
        category: WashCategory,
        buckets: BucketCounts,
    },
    PoolControl {
        counter: PoolCounter,
        units: Quantity,
    },
}

impl EventDetail {
    pub fn kind(&self) -> EventKind {
        match self {
            EventDetail::DirtyCage { .. } => EventKind::SucioJaulas,
            EventDetail::TicketUnits { .. } => EventKind::TicketUnidades,
            EventDetail::ExtraBags { .. } => EventKind::ExtraBolsas,
            EventDetail::HotelWash { .. } => EventKind::LavadoHotel,
            EventDetail::PoolControl { .. } => EventKind::PiscinaControl,
        }
    }
}

/// A business event ready to be queued.
#[derive(Debug, Clone, PartialEq)]
pub struct QueuePayload {
    pub id: String,
    pub created_at: i64,
    pub base_date: BaseDate,
    pub note: String,
    pub detail: EventDetail,
}

impl QueuePayload {
    pub fn kind(&self) -> EventKind {
        self.detail.kind()
    }

    pub fn event_date(&self) -> NaiveDate {
        self.base_date.plus_days(self.kind().day_offset())
    }

    /// Flattens the event into the row layout the collection endpoint expects.
    pub fn to_wire(&self) -> WireRow {
        let mut row = WireRow {
            id: self.id.clone(),
            created_at: self.created_at,
            base_date: self.base_date.to_string(),
            event_date: self.event_date().format("%Y-%m-%d").to_string(),
            kind: self.kind(),
            category: String::new(),
            detail: String::new(),
            units: WireNumber::Empty,
            gross_kg: WireNumber::Empty,
            tare_kg: WireNumber::Empty,
            net_kg: WireNumber::Empty,
            n55: WireNumber::Empty,
            n24: WireNumber::Empty,
            n13: WireNumber::Empty,
            n8: WireNumber::Empty,
            note: self.note.clone(),
        };

        match &self.detail {
            EventDetail::DirtyCage {
                category,
                cage_number,
                gross_kg,
                tare_kg,
                net_kg,
            } => {
                row.category = category.clone();
                row.detail = cage_number.clone();
                row.gross_kg = WireNumber::Number(*gross_kg);
                row.tare_kg = WireNumber::Number(*tare_kg);
                row.net_kg = WireNumber::Number(*net_kg);
            }
            EventDetail::TicketUnits { product, units } => {
                row.detail = product.clone();
                row.units = WireNumber::Number(*units);
            }
            EventDetail::ExtraBags { net_kg } => {
                row.detail = EXTRA_DETAIL.to_string();
                row.net_kg = WireNumber::Number(*net_kg);
            }
            EventDetail::HotelWash { category, buckets } => {
                row.category = category.as_str().to_string();
                row.n55 = WireNumber::count(buckets.n55);
                row.n24 = WireNumber::count(buckets.n24);
                row.n13 = WireNumber::count(buckets.n13);
                row.n8 = WireNumber::count(buckets.n8);
            }
            EventDetail::PoolControl { counter, units } => {
                row.detail = counter.as_str().to_string();
                row.units = WireNumber::Number(*units);
            }
        }

        row
    }

    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self.to_wire())
    }
}

/// Number-or-empty wire field: unused fields are sent as `""`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WireNumber {
    Empty,
    Number(Quantity),
}

impl WireNumber {
    fn count(value: u32) -> Self {
        WireNumber::Number(Quantity::new(value as f64))
    }
}

impl Serialize for WireNumber {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            WireNumber::Empty => serializer.serialize_str(""),
            WireNumber::Number(quantity) => quantity.serialize(serializer),
        }
    }
}

/// Flat record schema shared by the queue, the export file and the sync request.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WireRow {
    pub id: String,
    #[serde(rename = "createdAt")]
    pub created_at: i64,
    #[serde(rename = "fecha_base")]
    pub base_date: String,
    #[serde(rename = "fecha_evento")]
    pub event_date: String,
    #[serde(rename = "evento")]
    pub kind: EventKind,
    #[serde(rename = "categoria")]
    pub category: String,
    #[serde(rename = "detalle")]
    pub detail: String,
    #[serde(rename = "unidades")]
    pub units: WireNumber,
    #[serde(rename = "kg_bruto")]
    pub gross_kg: WireNumber,
    #[serde(rename = "tara_kg")]
    pub tare_kg: WireNumber,
    #[serde(rename = "kg_neto")]
    pub net_kg: WireNumber,
    pub n55: WireNumber,
    pub n24: WireNumber,
    pub n13: WireNumber,
    pub n8: WireNumber,
    #[serde(rename = "nota")]
    pub note: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(detail: EventDetail) -> QueuePayload {
        QueuePayload {
            id: "batch:1".into(),
            created_at: 1_718_000_000_000,
            base_date: BaseDate::parse("2024-06-10").unwrap(),
            note: "turno tarde".into(),
            detail,
        }
    }

    #[test]
    fn dirty_cage_row_keeps_weights_and_blanks_counts() {
        let value = payload(EventDetail::DirtyCage {
            category: "SÁBANAS".into(),
            cage_number: "7".into(),
            gross_kg: Quantity::new(60.0),
            tare_kg: Quantity::new(42.0),
            net_kg: Quantity::new(18.0),
        })
        .to_value()
        .unwrap();

        assert_eq!(
            value,
            json!({
                "id": "batch:1",
                "createdAt": 1_718_000_000_000i64,
                "fecha_base": "2024-06-10",
                "fecha_evento": "2024-06-10",
                "evento": "SUCIO_JAULAS",
                "categoria": "SÁBANAS",
                "detalle": "7",
                "unidades": "",
                "kg_bruto": 60,
                "tara_kg": 42,
                "kg_neto": 18,
                "n55": "",
                "n24": "",
                "n13": "",
                "n8": "",
                "nota": "turno tarde"
            })
        );
    }

    #[test]
    fn extra_bags_are_booked_two_days_later() {
        let value = payload(EventDetail::ExtraBags {
            net_kg: Quantity::new(12.5),
        })
        .to_value()
        .unwrap();

        assert_eq!(value["evento"], "EXTRA_BOLSAS");
        assert_eq!(value["fecha_evento"], "2024-06-12");
        assert_eq!(value["detalle"], EXTRA_DETAIL);
        assert_eq!(value["kg_neto"], 12.5);
        assert_eq!(value["kg_bruto"], "");
    }

    #[test]
    fn hotel_wash_row_carries_bucket_counts() {
        let value = payload(EventDetail::HotelWash {
            category: WashCategory::Piscina,
            buckets: BucketCounts::new(0, 2, 0, 1),
        })
        .to_value()
        .unwrap();

        assert_eq!(value["categoria"], "PISCINA");
        assert_eq!(value["n55"], 0);
        assert_eq!(value["n24"], 2);
        assert_eq!(value["n8"], 1);
        assert_eq!(value["unidades"], "");
    }
}
