//! Call statistics reported at call destruction

pub mod final_info;

pub use final_info::{CallFinalInfo, StatusCode};
