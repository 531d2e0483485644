//! Solana address risk assessment library.

pub mod address;
pub mod assessment;
pub mod cache;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod scoring;
pub mod security;
pub mod sources;
pub mod storage;

pub use assessment::{Assessor, AssessmentRequest, RiskAssessment};
pub use config::RiskConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
