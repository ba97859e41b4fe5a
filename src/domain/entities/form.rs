use crate::domain::value_objects::text_input::{as_text, is_blank};
use crate::domain::value_objects::{Quantity, TextInput, coerce_count};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tare of an empty cage, used unless the operator weighs a different one.
pub const DEFAULT_TARE_KG: f64 = 42.0;

/// Dirty-linen categories offered by the entry form.
pub const DIRTY_CATEGORIES: [&str; 4] = ["SÁBANAS", "SERVILLETAS", "CAMINOS", "MANTELES"];

pub const SHEETS_CATEGORY: &str = "SÁBANAS";

/// Products that can appear on a delivery ticket.
pub const TICKET_PRODUCTS: [&str; 11] = [
    "Caminos",
    "Servilletas",
    "Mantel",
    "San. Ind.",
    "Vanob. Ind.",
    "King rayas",
    "King lisas",
    "Sab. Cuna",
    "Cuadrantes",
    "Fund. Almohada",
    "Extra (mezcla)",
];

/// Net weight never goes below zero, even when the tare exceeds the gross reading.
pub fn net_weight(gross_kg: f64, tare_kg: f64) -> f64 {
    (gross_kg - tare_kg).max(0.0)
}

/// In-memory state of the entry form at the moment the operator saves a batch ("parte").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct FormSnapshot {
    #[serde(default, rename = "fecha_base")]
    pub base_date: Option<TextInput>,
    #[serde(default, rename = "nota")]
    pub note: Option<TextInput>,
    #[serde(default, rename = "jaulas")]
    pub cages: Vec<CageEntry>,
    #[serde(default)]
    pub tickets: Vec<TicketLine>,
    #[serde(default)]
    pub extra_kg: Option<TextInput>,
    #[serde(default, rename = "lavado")]
    pub wash: WashLoads,
    #[serde(default, rename = "piscina")]
    pub pool: PoolCounters,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CageEntry {
    #[serde(default, rename = "num_jaula")]
    pub cage_number: Option<TextInput>,
    #[serde(default, rename = "categoria")]
    pub category: Option<TextInput>,
    #[serde(default, rename = "bruto")]
    pub gross: Option<TextInput>,
    #[serde(default, rename = "tara")]
    pub tare: Option<TextInput>,
}

impl CageEntry {
    pub fn gross_kg(&self) -> f64 {
        Quantity::coerce(as_text(&self.gross)).value()
    }

    /// Blank tare means "not overridden".
    pub fn tare_kg(&self) -> f64 {
        if is_blank(&self.tare) {
            DEFAULT_TARE_KG
        } else {
            Quantity::coerce(as_text(&self.tare)).value()
        }
    }

    pub fn net_kg(&self) -> f64 {
        net_weight(self.gross_kg(), self.tare_kg())
    }

    pub fn category_text(&self) -> &str {
        self.category.as_ref().map(TextInput::trimmed).unwrap_or("")
    }

    pub fn cage_number_text(&self) -> &str {
        self.cage_number.as_ref().map(TextInput::trimmed).unwrap_or("")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TicketLine {
    #[serde(default, rename = "producto")]
    pub product: Option<TextInput>,
    #[serde(default, rename = "unidades")]
    pub units: Option<TextInput>,
}

impl TicketLine {
    pub fn product_text(&self) -> &str {
        self.product.as_ref().map(TextInput::trimmed).unwrap_or("")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WashCategory {
    Blanca,
    Piscina,
    Varios,
}

impl WashCategory {
    pub const ALL: [WashCategory; 3] = [
        WashCategory::Blanca,
        WashCategory::Piscina,
        WashCategory::Varios,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WashCategory::Blanca => "BLANCA",
            WashCategory::Piscina => "PISCINA",
            WashCategory::Varios => "VARIOS",
        }
    }
}

impl fmt::Display for WashCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Machine-size buckets (55, 24, 13 and 8 kg drums) for one wash category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct WashBuckets {
    #[serde(default)]
    pub n55: Option<TextInput>,
    #[serde(default)]
    pub n24: Option<TextInput>,
    #[serde(default)]
    pub n13: Option<TextInput>,
    #[serde(default)]
    pub n8: Option<TextInput>,
}

impl WashBuckets {
    pub fn counts(&self) -> BucketCounts {
        BucketCounts {
            n55: coerce_count(as_text(&self.n55)),
            n24: coerce_count(as_text(&self.n24)),
            n13: coerce_count(as_text(&self.n13)),
            n8: coerce_count(as_text(&self.n8)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct BucketCounts {
    pub n55: u32,
    pub n24: u32,
    pub n13: u32,
    pub n8: u32,
}

impl BucketCounts {
    pub fn new(n55: u32, n24: u32, n13: u32, n8: u32) -> Self {
        Self { n55, n24, n13, n8 }
    }

    pub fn has_any(&self) -> bool {
        self.n55 > 0 || self.n24 > 0 || self.n13 > 0 || self.n8 > 0
    }

    /// Nominal load in kg, each drum counted at its rated capacity.
    pub fn load_kg(&self) -> f64 {
        55.0 * self.n55 as f64 + 24.0 * self.n24 as f64 + 13.0 * self.n13 as f64 + 8.0 * self.n8 as f64
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct WashLoads {
    #[serde(default, rename = "BLANCA", alias = "blanca")]
    pub blanca: WashBuckets,
    #[serde(default, rename = "PISCINA", alias = "piscina")]
    pub piscina: WashBuckets,
    #[serde(default, rename = "VARIOS", alias = "varios")]
    pub varios: WashBuckets,
}

impl WashLoads {
    pub fn buckets(&self, category: WashCategory) -> &WashBuckets {
        match category {
            WashCategory::Blanca => &self.blanca,
            WashCategory::Piscina => &self.piscina,
            WashCategory::Varios => &self.varios,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PoolCounter {
    Dobladas,
    Subidas,
    Stock,
}

impl PoolCounter {
    pub const ALL: [PoolCounter; 3] = [PoolCounter::Dobladas, PoolCounter::Subidas, PoolCounter::Stock];

    pub fn as_str(&self) -> &'static str {
        match self {
            PoolCounter::Dobladas => "DOBLADAS",
            PoolCounter::Subidas => "SUBIDAS",
            PoolCounter::Stock => "STOCK",
        }
    }
}

/// Pool-area towel counters: folded, taken up, and on the shelf.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PoolCounters {
    #[serde(default, rename = "dobladas")]
    pub folded: Option<TextInput>,
    #[serde(default, rename = "subidas")]
    pub taken_up: Option<TextInput>,
    #[serde(default, rename = "stock")]
    pub stock: Option<TextInput>,
}

impl PoolCounters {
    pub fn input(&self, counter: PoolCounter) -> &Option<TextInput> {
        match counter {
            PoolCounter::Dobladas => &self.folded,
            PoolCounter::Subidas => &self.taken_up,
            PoolCounter::Stock => &self.stock,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Default)]
pub struct CageTotals {
    pub sheets_kg: f64,
    pub other_kg: f64,
    pub total_kg: f64,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Default)]
pub struct WashTotals {
    pub blanca_kg: f64,
    pub piscina_kg: f64,
    pub varios_kg: f64,
    pub hotel_kg: f64,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Default)]
pub struct FormTotals {
    pub cages: CageTotals,
    pub wash: WashTotals,
}

impl FormSnapshot {
    /// Running totals shown to the operator while filling the form.
    pub fn totals(&self) -> FormTotals {
        let mut cages = CageTotals::default();
        for cage in &self.cages {
            let net = cage.net_kg();
            cages.total_kg += net;
            if cage.category_text() == SHEETS_CATEGORY {
                cages.sheets_kg += net;
            } else {
                cages.other_kg += net;
            }
        }

        let blanca_kg = self.wash.blanca.counts().load_kg();
        let piscina_kg = self.wash.piscina.counts().load_kg();
        let varios_kg = self.wash.varios.counts().load_kg();

        FormTotals {
            cages,
            wash: WashTotals {
                blanca_kg,
                piscina_kg,
                varios_kg,
                hotel_kg: blanca_kg + piscina_kg + varios_kg,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cage(category: &str, gross: &str, tare: Option<&str>) -> CageEntry {
        CageEntry {
            cage_number: None,
            category: Some(category.into()),
            gross: Some(gross.into()),
            tare: tare.map(TextInput::from),
        }
    }

    #[test]
    fn net_weight_floors_at_zero() {
        assert_eq!(net_weight(60.0, 42.0), 18.0);
        assert_eq!(net_weight(30.0, 42.0), 0.0);
        assert_eq!(net_weight(0.0, 0.0), 0.0);
        for gross in [0.0, 1.5, 41.9, 42.0, 100.0] {
            for tare in [0.0, 42.0, 99.0, 150.0] {
                assert!(net_weight(gross, tare) >= 0.0);
            }
        }
    }

    #[test]
    fn blank_tare_falls_back_to_default() {
        assert_eq!(cage("SÁBANAS", "60", None).tare_kg(), DEFAULT_TARE_KG);
        assert_eq!(cage("SÁBANAS", "60", Some("  ")).tare_kg(), DEFAULT_TARE_KG);
        assert_eq!(cage("SÁBANAS", "60", Some("40")).net_kg(), 20.0);
        assert_eq!(cage("SÁBANAS", "60", Some("0")).net_kg(), 60.0);
    }

    #[test]
    fn totals_split_sheets_from_other_categories() {
        let form = FormSnapshot {
            cages: vec![
                cage("SÁBANAS", "60", None),
                cage("MANTELES", "50", None),
                cage("CAMINOS", "20", None),
            ],
            ..Default::default()
        };

        let totals = form.totals().cages;
        assert_eq!(totals.sheets_kg, 18.0);
        assert_eq!(totals.other_kg, 8.0);
        assert_eq!(totals.total_kg, 26.0);
    }

    #[test]
    fn wash_totals_use_drum_capacity() {
        let form: FormSnapshot = serde_json::from_value(serde_json::json!({
            "lavado": {
                "BLANCA": { "n55": "2", "n24": "1", "n13": "0", "n8": "" },
                "VARIOS": { "n8": 3 }
            }
        }))
        .unwrap();

        let wash = form.totals().wash;
        assert_eq!(wash.blanca_kg, 134.0);
        assert_eq!(wash.piscina_kg, 0.0);
        assert_eq!(wash.varios_kg, 24.0);
        assert_eq!(wash.hotel_kg, 158.0);
    }
}
