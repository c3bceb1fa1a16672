//! # Tally Ext CSV
//!
//! CSV ingestion of trade settlement instructions.
//!
//! Instruction files are headerless, one instruction per line, with the
//! columns in this fixed order:
//!
//! ```text
//! entity,buy_sell,agreed_fx,currency,instr_date,settle_date,units,ppu
//! foo,B,0.50,SGP,01-Jan-16,02-Jan-16,200,100.25
//! ```
//!
//! Rows are first read as raw strings ([`RawInstruction`]) and then coerced
//! into validated [`TradeRecord`](tally_core::TradeRecord)s. A row that fails
//! coercion either aborts the load or is skipped, per the configured
//! [`InvalidRowPolicy`](tally_core::config::InvalidRowPolicy).

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod instructions;

pub use error::{IngestError, IngestResult, RowError};
pub use instructions::{
    load_instructions, read_instructions, read_raw_instructions, InstructionBatch,
    RawInstruction, COLUMNS,
};
