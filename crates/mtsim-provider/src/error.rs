use mtsim_core::ActorId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("unknown vehicle id {0}")]
    UnknownVehicle(ActorId),

    #[error("flow file error: {0}")]
    Flow(#[from] mtsim_flow::FlowError),

    #[error("route error: {0}")]
    Behavior(#[from] mtsim_behavior::BehaviorError),
}

pub type ProviderResult<T> = Result<T, ProviderError>;
