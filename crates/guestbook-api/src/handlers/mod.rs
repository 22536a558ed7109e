pub mod approval;
pub mod cleanup;
pub mod storage_usage;
