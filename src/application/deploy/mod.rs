//! Deploy Module
//!
//! Orchestrates a deployment of the project in the working directory.
//!
//! ## Structure
//!
//! - `options` - Configuration types (`DeployOptions`)
//! - `result` - Result types (`DeployReport`, `NodeAuthorization`)
//! - `use_case` - Core orchestration logic (`DeployOrchestrator`)
//!
//! ## Usage
//!
//! ```ignore
//! use nyo::application::deploy::DeployOrchestrator;
//!
//! let orchestrator = DeployOrchestrator::new(resolver, identities, authenticator, executor);
//! let report = orchestrator.deploy(&working_dir).await?;
//! ```

mod options;
mod result;
mod use_case;

pub use options::DeployOptions;
pub use result::{DeployReport, NodeAuthorization};
pub use use_case::DeployOrchestrator;
