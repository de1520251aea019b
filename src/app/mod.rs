// Application layer: use cases composed from the pipeline stages

pub mod company_service;

pub use company_service::{parse_record_id, CompanyService};
