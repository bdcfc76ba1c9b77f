//! Core of the water meter tracker: storage-backed registries for residents
//! and meter readings, plus the usage derivation engine that every reporting
//! view consumes.

pub mod domain;
pub mod storage;
