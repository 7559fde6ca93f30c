//! Task lifecycle engine.
//!
//! ```text
//! aberta       --confirm_presence-->   reivindicada
//! reivindicada --cancel_presence-->    cancelada
//! reivindicada --confirm_completion--> concluida (terminal)
//! cancelada    --reactivate-->         aberta
//! ```
//!
//! Every transition loads the row, checks the acting identity and current
//! flags, and writes the new row inside one `BEGIN IMMEDIATE` transaction.

pub mod engine;
pub mod invariants;

pub use engine::*;
