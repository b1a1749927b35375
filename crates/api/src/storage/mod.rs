//! Object storage integration (S3 pre-signed uploads).

pub mod s3;
