//! NFO sidecar parsing and generation.
//!
//! Sidecars use the XML dialect consumed by common media libraries: a
//! `<movie>` or `<episodedetails>` root with flat child elements. Written
//! sidecars always get a `.nfo` suffix regardless of what a caller asks
//! for.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesText, Event};
use regex::Regex;
use reelsort_model::MediaMetadata;
use tracing::{debug, warn};

use crate::error::{PipelineError, Result};

/// `Title.Tokens.2021.Quality-GRP` style names carry the year inline.
static NAME_YEAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<title>.+?)[. ](?P<year>(?:19|20)\d{2})(?:[. ]|$)")
        .unwrap()
});

/// Find the first `.nfo` file directly inside a directory.
pub fn find_nfo_file(directory: &Path) -> Option<PathBuf> {
    let entries = std::fs::read_dir(directory).ok()?;
    let mut nfos: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("nfo"))
        })
        .collect();
    nfos.sort();
    nfos.into_iter().next()
}

/// Parse a sidecar into a metadata record.
///
/// Returns the record plus whether the sidecar describes an episode.
/// Sidecars without a recognised root element (plain-text scene NFOs are
/// common) yield `None`.
pub fn parse_nfo_file(path: &Path) -> Option<(MediaMetadata, bool)> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            warn!(file = %path.display(), error = %err, "failed to read NFO");
            return None;
        }
    };
    match parse_nfo_str(&content) {
        Ok(parsed) => parsed,
        Err(err) => {
            warn!(file = %path.display(), error = %err, "failed to parse NFO");
            None
        }
    }
}

fn parse_nfo_str(
    content: &str,
) -> std::result::Result<Option<(MediaMetadata, bool)>, quick_xml::Error> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut metadata = MediaMetadata::default();
    let mut stack: Vec<String> = Vec::new();
    let mut id_type: Option<String> = None;
    let mut is_episode = false;
    let mut root_seen = false;
    let mut width: Option<String> = None;
    let mut height: Option<String> = None;

    loop {
        match reader.read_event()? {
            Event::Start(element) => {
                let name = String::from_utf8_lossy(element.name().as_ref())
                    .into_owned();
                if !root_seen {
                    match name.as_str() {
                        "movie" => {}
                        "episodedetails" => is_episode = true,
                        _ => {
                            debug!(root = %name, "not a media sidecar root");
                            return Ok(None);
                        }
                    }
                    root_seen = true;
                } else if name == "id" || name == "uniqueid" {
                    id_type = element
                        .attributes()
                        .filter_map(|attr| attr.ok())
                        .find(|attr| attr.key.as_ref() == b"type")
                        .map(|attr| {
                            String::from_utf8_lossy(&attr.value).into_owned()
                        });
                }
                stack.push(name);
            }
            Event::End(_) => {
                stack.pop();
                if stack.len() <= 1 {
                    id_type = None;
                }
            }
            Event::Text(text) => {
                let value = text.unescape().unwrap_or_default().into_owned();
                let value = value.trim().to_string();
                if value.is_empty() || stack.len() < 2 {
                    continue;
                }
                let path: Vec<&str> =
                    stack[1..].iter().map(String::as_str).collect();
                apply_field(
                    &mut metadata,
                    &path,
                    &value,
                    id_type.as_deref(),
                    &mut width,
                    &mut height,
                );
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !root_seen {
        return Ok(None);
    }
    if let (Some(width), Some(height)) = (&width, &height) {
        metadata.resolution = Some(format!("{width}x{height}"));
    }
    Ok(Some((metadata, is_episode)))
}

fn apply_field(
    metadata: &mut MediaMetadata,
    path: &[&str],
    value: &str,
    id_type: Option<&str>,
    width: &mut Option<String>,
    height: &mut Option<String>,
) {
    match path {
        ["title"] => metadata.title = Some(value.to_string()),
        ["originaltitle"] => {
            metadata.original_title = Some(value.to_string())
        }
        ["year"] => metadata.year = Some(value.to_string()),
        ["edition"] => metadata.edition = Some(value.to_string()),
        ["sorttitle"] => metadata.sort_title = Some(value.to_string()),
        ["director"] => metadata.director = Some(value.to_string()),
        ["plot"] => metadata.plot = Some(value.to_string()),
        ["rating"] | ["rating", "value"] => {
            metadata.rating = Some(value.to_string())
        }
        ["videosource"] => metadata.video_source = Some(value.to_string()),
        ["genre"] => metadata.genres.push(value.to_string()),
        ["country"] => metadata.countries.push(value.to_string()),
        ["id"] | ["uniqueid"] => match id_type {
            Some("imdb") => metadata.imdb_id = Some(value.to_string()),
            Some("tmdb") => metadata.tmdb_id = Some(value.to_string()),
            _ => {}
        },
        ["fileinfo", "streamdetails", "video", "codec"] => {
            metadata.video_codec = Some(value.to_string())
        }
        ["fileinfo", "streamdetails", "video", "width"] => {
            *width = Some(value.to_string())
        }
        ["fileinfo", "streamdetails", "video", "height"] => {
            *height = Some(value.to_string())
        }
        ["fileinfo", "streamdetails", "audio", "codec"] => {
            metadata.audio_codec = Some(value.to_string())
        }
        ["fileinfo", "streamdetails", "audio", "channels"] => {
            metadata.audio_channels = Some(value.to_string())
        }
        _ => {}
    }
}

/// Derive `{title, year}` from a dotted release directory name.
pub fn parse_directory_name(name: &str) -> MediaMetadata {
    let mut metadata = MediaMetadata::default();
    if let Some(caps) = NAME_YEAR_RE.captures(name) {
        let title = caps["title"].replace('.', " ").trim().to_string();
        if !title.is_empty() {
            metadata.title = Some(title);
            metadata.year = Some(caps["year"].to_string());
        }
    }
    metadata
}

/// Write a `<movie>` sidecar. The output suffix is normalised to `.nfo`.
pub fn write_movie_nfo(
    metadata: &MediaMetadata,
    output: &Path,
) -> Result<PathBuf> {
    let output = enforce_nfo_suffix(output);
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
        .map_err(xml_error)?;
    writer
        .create_element("movie")
        .write_inner_content(|w| {
            write_text_element(w, "title", metadata.title.as_deref())?;
            write_text_element(
                w,
                "originaltitle",
                metadata.original_title.as_deref(),
            )?;
            write_text_element(w, "sorttitle", metadata.sort_title.as_deref())?;
            write_text_element(w, "year", metadata.year.as_deref())?;
            write_text_element(w, "edition", metadata.edition.as_deref())?;
            write_text_element(w, "plot", metadata.plot.as_deref())?;
            write_text_element(w, "rating", metadata.rating.as_deref())?;
            write_text_element(w, "director", metadata.director.as_deref())?;
            write_text_element(
                w,
                "videosource",
                metadata.video_source.as_deref(),
            )?;
            for genre in &metadata.genres {
                write_text_element(w, "genre", Some(genre))?;
            }
            for country in &metadata.countries {
                write_text_element(w, "country", Some(country))?;
            }
            if let Some(tmdb_id) = &metadata.tmdb_id {
                w.create_element("uniqueid")
                    .with_attribute(("type", "tmdb"))
                    .with_attribute(("default", "true"))
                    .write_text_content(BytesText::new(tmdb_id))?;
            }
            if let Some(imdb_id) = &metadata.imdb_id {
                w.create_element("uniqueid")
                    .with_attribute(("type", "imdb"))
                    .write_text_content(BytesText::new(imdb_id))?;
            }
            Ok(())
        })
        .map_err(xml_error)?;

    std::fs::write(&output, writer.into_inner()).map_err(|source| {
        PipelineError::Filesystem {
            path: output.clone(),
            source,
        }
    })?;
    Ok(output)
}

/// Write an `<episodedetails>` sidecar. The output suffix is normalised to
/// `.nfo`.
pub fn write_episode_nfo(
    metadata: &MediaMetadata,
    show_title: &str,
    season: Option<u32>,
    episode: Option<u32>,
    output: &Path,
) -> Result<PathBuf> {
    let output = enforce_nfo_suffix(output);
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
        .map_err(xml_error)?;
    writer
        .create_element("episodedetails")
        .write_inner_content(|w| {
            write_text_element(w, "title", metadata.title.as_deref())?;
            write_text_element(w, "showtitle", Some(show_title))?;
            if let Some(season) = season {
                write_text_element(w, "season", Some(&season.to_string()))?;
            }
            if let Some(episode) = episode {
                write_text_element(w, "episode", Some(&episode.to_string()))?;
            }
            write_text_element(w, "plot", metadata.plot.as_deref())?;
            write_text_element(w, "aired", metadata.year.as_deref())?;
            write_text_element(w, "rating", metadata.rating.as_deref())?;
            if let Some(tmdb_id) = &metadata.tmdb_id {
                w.create_element("uniqueid")
                    .with_attribute(("type", "tmdb"))
                    .with_attribute(("default", "true"))
                    .write_text_content(BytesText::new(tmdb_id))?;
            }
            Ok(())
        })
        .map_err(xml_error)?;

    std::fs::write(&output, writer.into_inner()).map_err(|source| {
        PipelineError::Filesystem {
            path: output.clone(),
            source,
        }
    })?;
    Ok(output)
}

fn write_text_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    value: Option<&str>,
) -> std::result::Result<(), quick_xml::Error> {
    if let Some(value) = value {
        writer
            .create_element(name)
            .write_text_content(BytesText::new(value))?;
    }
    Ok(())
}

fn xml_error(err: quick_xml::Error) -> PipelineError {
    PipelineError::MetadataUnavailable(format!("sidecar write failed: {err}"))
}

/// Sidecar files always end in `.nfo`, whatever suffix a caller asks for.
fn enforce_nfo_suffix(path: &Path) -> PathBuf {
    if path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("nfo"))
    {
        path.to_path_buf()
    } else {
        path.with_extension("nfo")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const MOVIE_NFO: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<movie>
  <title>Example Movie</title>
  <originaltitle>Le Example</originaltitle>
  <year>2021</year>
  <genre>Action</genre>
  <genre>Drama</genre>
  <country>Germany</country>
  <rating>
    <value>7.4</value>
  </rating>
  <uniqueid type="tmdb" default="true">12345</uniqueid>
  <uniqueid type="imdb">tt0012345</uniqueid>
  <fileinfo>
    <streamdetails>
      <video>
        <codec>h265</codec>
        <width>1920</width>
        <height>1080</height>
      </video>
      <audio>
        <codec>eac3</codec>
        <channels>6</channels>
      </audio>
    </streamdetails>
  </fileinfo>
</movie>"#;

    #[test]
    fn parses_movie_sidecar() {
        let (metadata, is_episode) =
            parse_nfo_str(MOVIE_NFO).unwrap().unwrap();
        assert!(!is_episode);
        assert_eq!(metadata.title.as_deref(), Some("Example Movie"));
        assert_eq!(metadata.year.as_deref(), Some("2021"));
        assert_eq!(metadata.genres, vec!["Action", "Drama"]);
        assert_eq!(metadata.rating.as_deref(), Some("7.4"));
        assert_eq!(metadata.tmdb_id.as_deref(), Some("12345"));
        assert_eq!(metadata.imdb_id.as_deref(), Some("tt0012345"));
        assert_eq!(metadata.resolution.as_deref(), Some("1920x1080"));
        assert_eq!(metadata.audio_channels.as_deref(), Some("6"));
    }

    #[test]
    fn episode_root_is_detected() {
        let nfo = "<episodedetails><title>Pilot</title></episodedetails>";
        let (metadata, is_episode) = parse_nfo_str(nfo).unwrap().unwrap();
        assert!(is_episode);
        assert_eq!(metadata.title.as_deref(), Some("Pilot"));
    }

    #[test]
    fn plain_text_nfo_is_rejected() {
        // Scene NFOs are ASCII art, not XML.
        assert!(parse_nfo_str("RELEASE iNFO\n====\nGreets!").is_err()
            || parse_nfo_str("RELEASE iNFO\n====\nGreets!")
                .is_ok_and(|parsed| parsed.is_none()));
        let xml_but_wrong_root = "<artist><name>x</name></artist>";
        assert!(parse_nfo_str(xml_but_wrong_root).unwrap().is_none());
    }

    #[test]
    fn written_sidecar_suffix_is_always_nfo() {
        let tmp = TempDir::new().unwrap();
        let metadata = MediaMetadata {
            title: Some("Example Movie".to_string()),
            year: Some("2021".to_string()),
            tmdb_id: Some("12345".to_string()),
            ..MediaMetadata::default()
        };
        let requested = tmp.path().join("Example Movie (2021).info");
        let written = write_movie_nfo(&metadata, &requested).unwrap();
        assert_eq!(
            written.extension().and_then(|ext| ext.to_str()),
            Some("nfo")
        );
        assert!(written.exists());

        // Round-trip through the parser.
        let (parsed, is_episode) = parse_nfo_file(&written).unwrap();
        assert!(!is_episode);
        assert_eq!(parsed.title.as_deref(), Some("Example Movie"));
        assert_eq!(parsed.tmdb_id.as_deref(), Some("12345"));
    }

    #[test]
    fn episode_sidecar_round_trip() {
        let tmp = TempDir::new().unwrap();
        let metadata = MediaMetadata {
            title: Some("Pilot".to_string()),
            rating: Some("8.1".to_string()),
            ..MediaMetadata::default()
        };
        let written = write_episode_nfo(
            &metadata,
            "The Show",
            Some(2),
            Some(1),
            &tmp.path().join("episode.xml"),
        )
        .unwrap();
        assert!(written.to_string_lossy().ends_with(".nfo"));
        let (parsed, is_episode) = parse_nfo_file(&written).unwrap();
        assert!(is_episode);
        assert_eq!(parsed.title.as_deref(), Some("Pilot"));
    }

    #[test]
    fn directory_name_heuristics() {
        let metadata = parse_directory_name("Example.Movie.2021.1080p-GRP");
        assert_eq!(metadata.title.as_deref(), Some("Example Movie"));
        assert_eq!(metadata.year.as_deref(), Some("2021"));

        let metadata = parse_directory_name("NoYearHere-GRP");
        assert!(metadata.title.is_none());
    }

    #[test]
    fn finds_first_nfo_in_directory() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("b.nfo"), b"x").unwrap();
        fs::write(tmp.path().join("a.NFO"), b"x").unwrap();
        fs::write(tmp.path().join("movie.mkv"), b"x").unwrap();
        let found = find_nfo_file(tmp.path()).unwrap();
        assert_eq!(found.file_name().unwrap().to_string_lossy(), "a.NFO");
    }
}
