//! End-to-end pipeline tests over local file sources

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use flate2::write::GzEncoder;
use flate2::Compression;

use epg_merge::config::{Config, EpgConfig, IngestionConfig, OutputConfig, SourceConfig};
use epg_merge::pipeline::{self, PipelineOutcome};

fn source(path: &Path, name: &str) -> SourceConfig {
    SourceConfig {
        url: path.to_str().unwrap().to_string(),
        name: Some(name.to_string()),
    }
}

fn test_config(sources: Vec<SourceConfig>, output: &Path) -> Config {
    Config {
        sources,
        output: OutputConfig {
            path: output.to_path_buf(),
        },
        epg: EpgConfig {
            default_lang: "bg".to_string(),
        },
        ingestion: IngestionConfig {
            fetch_timeout: Duration::from_secs(5),
        },
    }
}

fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

const SOURCE_A: &[u8] = br#"<?xml version="1.0" encoding="utf-8"?>
<tv>
  <channel id="bg1"><display-name lang="bg">BNT 1</display-name></channel>
  <channel id="bg2"><display-name lang="bg">BNT 2 from A</display-name></channel>
  <programme channel="bg1" start="20250101060000" stop="20250101070000">
    <title lang="bg">Morning News</title>
  </programme>
</tv>"#;

const SOURCE_B: &[u8] = br#"<tv>
  <channel id="bg2"><display-name>BNT 2 from B</display-name></channel>
  <channel id="bg3"><display-name>BNT 3</display-name></channel>
  <programme channel="bg1" start="20250101060000" stop="20250101070000">
    <title>Duplicate Morning News</title>
  </programme>
  <programme channel="bg3" start="20250101080000" stop="20250101090000">
    <title>Breakfast Show</title>
  </programme>
</tv>"#;

// Bare ampersand: only parses after the escape-and-retry repair
const SOURCE_C: &[u8] = br#"<tv>
  <programme channel="bg1" start="20250101100000" stop="20250101110000">
    <title>Tom & Jerry</title>
  </programme>
</tv>"#;

#[tokio::test]
async fn merges_three_sources_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path_a = dir.path().join("a.xml");
    let path_b = dir.path().join("b.xml.gz");
    let path_c = dir.path().join("c.xml");
    std::fs::write(&path_a, SOURCE_A).unwrap();
    std::fs::write(&path_b, gzip(SOURCE_B)).unwrap();
    std::fs::write(&path_c, SOURCE_C).unwrap();

    let output = dir.path().join("merged.xml");
    let config = test_config(
        vec![
            source(&path_a, "source-a"),
            source(&path_b, "source-b"),
            source(&path_c, "source-c"),
        ],
        &output,
    );

    let outcome = pipeline::run(&config).await.unwrap();
    assert_eq!(
        outcome,
        PipelineOutcome::Completed {
            channels: 3,
            programmes: 3
        }
    );

    let merged = std::fs::read_to_string(&output).unwrap();
    assert!(merged.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));

    // Channels deduped by id, first-seen order, source A's bg2 wins
    let bg1 = merged.find("<channel id=\"bg1\"").unwrap();
    let bg2 = merged.find("<channel id=\"bg2\"").unwrap();
    let bg3 = merged.find("<channel id=\"bg3\"").unwrap();
    assert!(bg1 < bg2 && bg2 < bg3);
    assert!(merged.contains("BNT 2 from A"));
    assert!(!merged.contains("BNT 2 from B"));

    // Duplicate programme key from source B was dropped
    assert!(merged.contains("Morning News"));
    assert!(!merged.contains("Duplicate Morning News"));
    assert!(merged.contains("Breakfast Show"));

    // Repaired source C made it in, re-escaped on output
    assert!(merged.contains("Tom &amp; Jerry"));

    // Untagged elements picked up the default language
    assert!(merged.contains("<display-name lang=\"bg\">BNT 3</display-name>"));

    // Channels block precedes the programmes block
    let last_channel = merged.rfind("<channel").unwrap();
    let first_programme = merged.find("<programme").unwrap();
    assert!(last_channel < first_programme);
}

#[tokio::test]
async fn failed_sources_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let path_a = dir.path().join("a.xml");
    std::fs::write(&path_a, SOURCE_A).unwrap();

    // Unparseable even after repair
    let path_bad = dir.path().join("bad.xml");
    std::fs::write(&path_bad, b"<tv><channel id=\"x\"></tv>").unwrap();

    let output = dir.path().join("merged.xml");
    let config = test_config(
        vec![
            source(&path_bad, "bad"),
            source(Path::new("/no/such/file.xml"), "missing"),
            source(&path_a, "good"),
        ],
        &output,
    );

    let outcome = pipeline::run(&config).await.unwrap();
    assert_eq!(
        outcome,
        PipelineOutcome::Completed {
            channels: 2,
            programmes: 1
        }
    );
    assert!(output.exists());
}

#[tokio::test]
async fn all_sources_failing_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("merged.xml");
    let config = test_config(
        vec![
            source(Path::new("/no/such/file.xml"), "missing-one"),
            source(Path::new("/also/missing.xml"), "missing-two"),
        ],
        &output,
    );

    let outcome = pipeline::run(&config).await.unwrap();
    assert_eq!(outcome, PipelineOutcome::NoValidSources);
    assert!(!output.exists());
}

#[tokio::test]
async fn unwritable_output_reports_write_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path_a = dir.path().join("a.xml");
    std::fs::write(&path_a, SOURCE_A).unwrap();

    let output = dir.path().join("no-such-dir").join("merged.xml");
    let config = test_config(vec![source(&path_a, "source-a")], &output);

    let outcome = pipeline::run(&config).await.unwrap();
    assert_eq!(outcome, PipelineOutcome::WriteFailed);
}
