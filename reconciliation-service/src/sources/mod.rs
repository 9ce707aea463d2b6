pub mod download_file;

pub use download_file::DownloadFileSource;
