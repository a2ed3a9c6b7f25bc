//! Infrastructure layer: persistence, media staging, command orchestration.

pub mod document_store;
pub mod handlers;
pub mod media;
pub mod references;
pub mod session;
