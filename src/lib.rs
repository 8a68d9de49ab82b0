//! Electrical installation and RF matching calculators.
//!
//! Every calculator is a pure function from a configuration struct to a
//! result struct or a [`CalcError`](error::CalcError). [`report::Report`]
//! wraps the outcome for display.
pub mod balance;
pub mod cable;
pub mod element;
pub mod error;
pub mod frequency;
pub mod fuse;
pub mod history;
pub mod impedance;
pub mod lighting;
pub mod matching;
pub mod parse;
pub mod pfc;
pub mod prelude;
pub mod protection;
pub mod report;
pub mod scale;
pub mod smith;
pub mod unit;
pub mod util;
