pub mod event_payload;
pub mod form;
pub mod queue_record;
pub mod sync_state;

pub use event_payload::{EventDetail, QueuePayload, WireNumber, WireRow};
pub use form::{
    BucketCounts, CageEntry, FormSnapshot, FormTotals, PoolCounter, PoolCounters, TicketLine,
    WashBuckets, WashCategory, WashLoads,
};
pub use queue_record::QueueRecord;
pub use sync_state::{SyncSettings, SyncState};
