//! Scrivener Pipeline Layer
//!
//! The supervisor that drives a skill-generation run through the fixed
//! stage graph: Init → Mining → Linking → Writing → Auditing →
//! Verifying → Storing → Complete, with Failed reachable from every
//! non-terminal stage.
//!
//! The crate owns:
//! - the [`StageExecutor`] contract every stage implementation satisfies
//! - [`PipelineRun`], the single mutable record of a run's progress
//! - the [`Supervisor`] state machine with its two retry loops
//!   (transient retries within a stage, regeneration from Auditing back
//!   to Writing)
//! - the typed [`CompletionCriterion`] the supervisor consults instead
//!   of pattern-matching model output
//!
//! Stage implementations other than Audit and Store are external
//! collaborators; this crate never looks inside them.

#![warn(missing_docs)]

mod cancel;
mod config;
mod criterion;
mod error;
mod executor;
mod run;
mod supervisor;

pub use cancel::CancelFlag;
pub use config::PipelineConfig;
pub use criterion::{AlwaysComplete, CompletionCriterion, MinClaimsCriterion};
pub use error::PipelineError;
pub use executor::{StageContext, StageExecutor};
pub use run::PipelineRun;
pub use supervisor::Supervisor;
