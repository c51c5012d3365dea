//! Output generation.
//!
//! # Submodules
//!
//! - [`csv`]: Writes the result table to a single CSV file
//!
//! # Output Structure
//!
//! ```text
//! articles.csv      # Source,Title,Description; replaced on every run
//! ```

pub mod csv;
