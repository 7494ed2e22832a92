pub mod downloader;
pub mod extractor;
pub mod ingest;
pub mod links;
pub mod metadata_store;
pub mod uploader;
pub mod validator;

pub use downloader::{Downloader, HttpDownloader};
pub use extractor::extract_url;
pub use ingest::{Ingested, IngestionPipeline};
pub use links::LinkDeriver;
pub use metadata_store::{MetadataStore, PgMetadataStore};
pub use uploader::{sniff_content_type, ObjectStoreUploader, UnavailableUploader, Uploader};
pub use validator::validate_filename;
