pub mod queue_dto;
pub mod sync_dto;

pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}
