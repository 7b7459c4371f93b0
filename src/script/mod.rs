//! Script execution.
//!
//! ```text
//!  script text ──► engine ──compile──► AST
//!                    │                  │
//!   DataBinding ─► `data` map           │ eval (budget / cancel checks)
//!   api ─────────► `math` methods ──────┤
//!                                       ▼
//!                         convert::result_to_column
//!                                       │
//!                                       ▼
//!                              DerivedColumnStore
//! ```

pub mod api;
pub mod budget;
pub mod catalogue;
pub(crate) mod convert;
pub mod engine;

pub use api::MathNamespace;
pub use budget::{CancelToken, ExecutionOptions};
pub use engine::{ReplayFailure, ReplayReport, ScriptEngine};
