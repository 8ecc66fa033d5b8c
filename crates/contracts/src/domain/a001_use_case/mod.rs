pub mod aggregate;

pub use aggregate::{
    ChannelLevelsUpdate, ChannelStatus, CurrentLevelRequest, DevelopmentTime, ProductionFilter,
    ProductionStatus, TargetLevelUpdate, UseCase, UseCaseFilter,
};
