//! # IR Opcodes
//!
//! This module defines the intermediate representation (IR) for print jobs.
//! The IR is a sequence of opcodes that can be inspected and compiled to
//! ESC/POS bytes.
//!
//! ## Design Philosophy
//!
//! ```text
//! Renderer → CommandEncoder → IR (inspectable) → Codegen → Bytes
//! ```
//!
//! Each opcode represents a single, atomic operation and maps to exactly one
//! protocol builder. There is no optimizer: printers are sensitive to the
//! exact byte stream and the pipeline must reproduce it bit for bit.

use crate::protocol::commands::DrawerPin;
use crate::protocol::text::{Alignment, TextSize};

/// IR opcodes - the "bytecode" for a print job.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    // ========== Printer Control ==========
    /// Initialize printer (ESC @).
    Init,

    /// Cash drawer kick pulse on one connector pin (ESC p).
    Pulse(DrawerPin),

    /// Feed lines, then partial cut (LF × 4, GS V 66 0).
    Cut,

    // ========== Style Changes ==========
    /// Set justification.
    SetAlign(Alignment),

    /// Enable/disable emphasized mode.
    SetBold(bool),

    /// Select character size.
    SetSize(TextSize),

    // ========== Content ==========
    /// Text (no trailing newline). Sanitized to ASCII at codegen.
    Text(String),

    /// Line feed.
    Newline,

    // ========== Graphics ==========
    /// Raster bit image (GS v 0).
    Raster {
        width_bytes: u16,
        height: u16,
        data: Vec<u8>,
    },

    // ========== Barcodes ==========
    /// 1D barcode with setup commands. Data is validated ASCII.
    Barcode(String),
}

/// A program is an ordered sequence of IR operations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub ops: Vec<Op>,
}

impl Program {
    /// Create a new empty program.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a program that starts with `Op::Init`.
    pub fn with_init() -> Self {
        Self { ops: vec![Op::Init] }
    }

    /// Add an operation to the program.
    pub fn push(&mut self, op: Op) {
        self.ops.push(op);
    }

    /// Add multiple operations to the program.
    pub fn extend(&mut self, ops: impl IntoIterator<Item = Op>) {
        self.ops.extend(ops);
    }

    /// Get the number of operations.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Check if the program is empty.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}
