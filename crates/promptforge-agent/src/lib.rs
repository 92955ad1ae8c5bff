//! # promptforge-agent
//!
//! Pipeline stage agents and response normalization.
//!
//! Each stage (critic, refiner, evaluator) composes a role-aware directive,
//! calls the completion collaborator, and funnels the raw text through a
//! layered parser that always yields a well-formed [`AgentResult`].

mod agent;
mod config;
pub mod context;
mod critic;
pub mod directive;
mod evaluator;
mod kind;
pub mod parse;
mod refiner;
mod result;
mod role;

pub use agent::{Agent, AgentError};
pub use config::{StageConfig, StageProfiles};
pub use context::StageContext;
pub use critic::CriticAgent;
pub use evaluator::EvaluatorAgent;
pub use kind::{AgentKind, SamplingProfile};
pub use refiner::RefinerAgent;
pub use result::AgentResult;
pub use role::{Role, UnknownRoleError};
