//! Pipeline stages for fragment-to-Markdown conversion.
//!
//! Each submodule implements exactly one transformation step, so each is
//! independently testable.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ lines ──▶ headings
//! (JSON)    (group,    (classify,
//!            order,     emit blocks)
//!            spacing)
//! ```
//!
//! 1. [`input`]    — load the fragment dump from a path or buffer; the only
//!    stage with I/O
//! 2. [`lines`]    — bucket fragments by quantised `y`, order rows top to
//!    bottom and runs left to right, infer word spacing
//! 3. [`headings`] — mean-height threshold cascade and Markdown block text
//!
//! [`crate::reconstruct`] strings stages 2 and 3 together per page.

pub mod headings;
pub mod input;
pub mod lines;
