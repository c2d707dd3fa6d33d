//! Sequential merge pipeline
//!
//! For each configured source, in order: fetch, parse, collect. A
//! failing source is logged and skipped; the run continues with
//! whatever succeeded. Zero usable documents is a terminal, non-fatal
//! stop that writes nothing. Otherwise the collected documents are
//! folded into one merged guide and written out.

use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::errors::{AppResult, SourceResult};
use crate::merge::merge_documents;
use crate::sources::{EpgSource, SourceFetcher};
use crate::xmltv::{parser, writer, Document};

/// How a pipeline run ended
///
/// All three variants are normal completions; failure is communicated
/// through the logs rather than the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// Merged output was written
    Completed { channels: usize, programmes: usize },
    /// Every configured source failed; nothing was written
    NoValidSources,
    /// Merge succeeded but the output file could not be written
    WriteFailed,
}

/// Run the whole fetch → parse → merge → write pipeline
pub async fn run(config: &Config) -> AppResult<PipelineOutcome> {
    let fetcher = SourceFetcher::new(config.ingestion.fetch_timeout);

    let mut documents: Vec<Document> = Vec::new();
    for source_config in &config.sources {
        let source = EpgSource::from(source_config);
        info!("Downloading EPG source: {}", source.name);

        match process_source(&fetcher, &source, &config.epg.default_lang).await {
            Ok(document) => {
                debug!(
                    "Source '{}' contributed {} channels and {} programmes",
                    source.name,
                    document.channels.len(),
                    document.programmes.len()
                );
                documents.push(document);
            }
            Err(e) => {
                warn!("Failed to process '{}': {}", source.name, e);
            }
        }
    }

    if documents.is_empty() {
        error!("No valid EPG data downloaded from any source");
        return Ok(PipelineOutcome::NoValidSources);
    }

    let merged = merge_documents(documents);
    let channels = merged.channels.len();
    let programmes = merged.programmes.len();

    match writer::write_to_file(&merged, &config.output.path).await {
        Ok(()) => {
            info!("Saved merged EPG to {}", config.output.path.display());
            Ok(PipelineOutcome::Completed {
                channels,
                programmes,
            })
        }
        Err(e) => {
            error!(
                "Error saving merged EPG to {}: {}",
                config.output.path.display(),
                e
            );
            Ok(PipelineOutcome::WriteFailed)
        }
    }
}

/// Fetch and parse one source
async fn process_source(
    fetcher: &SourceFetcher,
    source: &EpgSource,
    default_lang: &str,
) -> SourceResult<Document> {
    let bytes = fetcher.fetch(source).await?;
    parser::parse_document(&bytes, &source.name, default_lang)
}
