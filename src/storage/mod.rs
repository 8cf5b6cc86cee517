//! Storage module for S3-compatible backends
//!
//! Upload target for caller-provided images; MinIO, Cloudflare R2, and AWS
//! S3 all work through the same client.

mod s3_client;

pub use s3_client::S3Client;
