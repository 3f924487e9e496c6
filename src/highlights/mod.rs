mod archiver;
mod fetcher;
mod indexer;

pub use archiver::{archive_highlights, archive_key};
pub use fetcher::HighlightFetcher;
pub use indexer::{index_highlights, IndexAborted};

#[cfg(test)]
pub(crate) use archiver::tests::RecordingStore;
#[cfg(test)]
pub(crate) use indexer::tests::RecordingTable;
