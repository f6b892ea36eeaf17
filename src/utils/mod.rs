//! Utility modules shared by the detectors

pub(crate) mod command;
