//! # Intermediate Representation (IR)
//!
//! The IR is a "bytecode" representation that sits between the command
//! encoder and raw ESC/POS protocol bytes.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌─────────────┐     ┌──────────┐
//! │ Encoder API  │ ──► │     IR      │ ──► │ Codegen  │
//! │ (fluent)     │     │  (Vec<Op>)  │     │ (bytes)  │
//! └──────────────┘     └─────────────┘     └──────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use posprint::ir::{Op, Program};
//! use posprint::protocol::text::Alignment;
//!
//! let mut program = Program::with_init();
//! program.push(Op::SetAlign(Alignment::Center));
//! program.push(Op::SetBold(true));
//! program.push(Op::Text("HELLO".into()));
//! program.push(Op::Newline);
//! program.push(Op::Cut);
//!
//! // Inspect the IR
//! println!("{:#?}", program);
//!
//! let bytes = program.to_bytes();
//! assert_eq!(&bytes[0..2], &[0x1B, 0x40]);
//! ```

mod codegen;
mod ops;

pub use ops::*;
