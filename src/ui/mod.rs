//! Host-facing UI glue: DOM control values to commands, and the HTML of
//! the info panel and the error block.

pub mod controls;
pub mod panel;
