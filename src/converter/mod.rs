pub mod codec;
pub mod events;
pub mod job;
pub mod worker;

pub use codec::{ImageCodec, StandardCodec};
pub use events::WorkerEvent;
pub use job::{
    CollisionDecision, CollisionPolicy, ConversionJob, JobSummary, Outcome, TargetFormat,
};
pub use worker::{WorkerHandle, spawn, spawn_with_codec};
