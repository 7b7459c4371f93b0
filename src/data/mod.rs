//! Data layer: column types, binding, derived-column store, file I/O.
//!
//! Architecture:
//! ```text
//!  .csv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → SourceDataSet (numeric columns only)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐        ┌────────────────────┐
//!   │ binding   │ ◄───── │ DerivedColumnStore │ ◄── script results
//!   └──────────┘        └────────────────────┘
//!        │                        │
//!        ▼                        ▼
//!   Environment (per run)     export → .csv / .json
//! ```

pub mod binding;
pub mod export;
pub mod loader;
pub mod model;
pub mod store;
