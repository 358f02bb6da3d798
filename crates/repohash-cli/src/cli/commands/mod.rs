mod checksum;
mod run;

pub use checksum::run_checksum;
pub use run::run_pipeline;
