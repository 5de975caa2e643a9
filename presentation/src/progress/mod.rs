//! Progress feedback while the service is working

pub mod indicator;
