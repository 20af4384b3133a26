pub mod dataset;
pub mod export;
pub mod form;
pub mod overlay;
pub mod peaks;
pub mod processing;
pub mod trace_look;
