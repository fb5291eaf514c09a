//! File exports of logged work.

pub mod csv_export;
