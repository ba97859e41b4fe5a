use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed vocabulary of business events carried in the `evento` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    SucioJaulas,
    TicketUnidades,
    ExtraBolsas,
    LavadoHotel,
    PiscinaControl,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::SucioJaulas => "SUCIO_JAULAS",
            EventKind::TicketUnidades => "TICKET_UNIDADES",
            EventKind::ExtraBolsas => "EXTRA_BOLSAS",
            EventKind::LavadoHotel => "LAVADO_HOTEL",
            EventKind::PiscinaControl => "PISCINA_CONTROL",
        }
    }

    /// Days between the operator's base date and the date the event is booked on.
    pub fn day_offset(&self) -> u64 {
        match self {
            EventKind::TicketUnidades => 1,
            EventKind::ExtraBolsas => 2,
            EventKind::SucioJaulas | EventKind::LavadoHotel | EventKind::PiscinaControl => 0,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
