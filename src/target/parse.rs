//! Filename heuristics: turn "Show.Name.S01E02.720p.mkv" or "Movie.Title.1999.mkv"
//! into a Metadata guess used to query the provider.

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

use super::metadata::{MediaKind, Metadata};

static EPISODE_SXE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?P<series>.*?)[\s._-]*\bs(?P<season>\d{1,2})[\s._-]*e(?P<episode>\d{1,3})\b(?P<rest>.*)$")
        .expect("valid episode pattern")
});

static EPISODE_NXN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?P<series>.*?)[\s._-]+(?P<season>\d{1,2})x(?P<episode>\d{2,3})\b(?P<rest>.*)$")
        .expect("valid episode pattern")
});

static MOVIE_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<title>.*?)[\s._(\[-]+(?P<year>(?:19|20)\d{2})(?:[\s._)\]-]|$)")
        .expect("valid year pattern")
});

static RELEASE_TAGS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:480p|576p|720p|1080p|2160p|4k|uhd|x ?26[45]|h ?26[45]|hevc|xvid|divx|web[ -]?dl|web[ -]?rip|bluray|blu[ -]ray|brrip|bdrip|dvdrip|hdtv|hdrip|proper|repack|remux|10bit|aac|ac3|dts|internal|limited)\b.*$",
    )
    .expect("valid tag pattern")
});

static GROUP_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[[^\]]*\]\s*").expect("valid group pattern"));

/// Parse a file path into a guess. `forced` overrides the detected media kind.
pub fn guess_from_path(path: &Path, forced: Option<MediaKind>) -> Metadata {
    let extension = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = GROUP_PREFIX.replace(&stem, "").into_owned();

    let mut meta = guess_episode(&stem).unwrap_or_else(|| guess_movie(&stem));
    meta.extension = extension;

    match forced {
        Some(MediaKind::Movie) if meta.media == MediaKind::Television => {
            // Keep the whole name as the movie title.
            let mut movie = guess_movie(&stem);
            movie.extension = std::mem::take(&mut meta.extension);
            movie
        }
        Some(MediaKind::Television) if meta.media == MediaKind::Movie => Metadata {
            media: MediaKind::Television,
            series: meta.title.take(),
            ..meta
        },
        _ => meta,
    }
}

fn guess_episode(stem: &str) -> Option<Metadata> {
    let caps = EPISODE_SXE
        .captures(stem)
        .or_else(|| EPISODE_NXN.captures(stem))?;
    let series = clean(&caps["series"])?;
    let season = caps["season"].parse().ok()?;
    let episode = caps["episode"].parse().ok()?;
    let title = caps.name("rest").and_then(|m| clean(m.as_str()));
    Some(Metadata::episode(series, season, episode, title))
}

fn guess_movie(stem: &str) -> Metadata {
    if let Some(caps) = MOVIE_YEAR.captures(stem)
        && let Some(title) = clean(&caps["title"])
    {
        return Metadata::movie(title, caps["year"].parse().ok());
    }
    Metadata {
        media: MediaKind::Movie,
        title: clean(stem),
        ..Default::default()
    }
}

/// Normalize separators, drop release tags and trim; None if nothing remains.
pub fn clean(raw: &str) -> Option<String> {
    let spaced: String = raw
        .chars()
        .map(|c| if c == '.' || c == '_' { ' ' } else { c })
        .collect();
    let untagged = RELEASE_TAGS.replace(&spaced, "");
    let collapsed = untagged.split_whitespace().collect::<Vec<_>>().join(" ");
    let trimmed = collapsed
        .trim_matches(|c: char| c == '-' || c == '(' || c == '[' || c.is_whitespace())
        .to_string();
    (!trimmed.is_empty()).then_some(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guess(name: &str) -> Metadata {
        guess_from_path(Path::new(name), None)
    }

    #[test]
    fn scene_style_episode() {
        let m = guess("The.Office.US.S02E05.Halloween.720p.HDTV.x264.mkv");
        assert_eq!(m.media, MediaKind::Television);
        assert_eq!(m.series.as_deref(), Some("The Office US"));
        assert_eq!(m.season, Some(2));
        assert_eq!(m.episode, Some(5));
        assert_eq!(m.title.as_deref(), Some("Halloween"));
        assert_eq!(m.extension, ".mkv");
    }

    #[test]
    fn numeric_episode_without_title() {
        let m = guess("Lost - 1x04.avi");
        assert_eq!(m.series.as_deref(), Some("Lost"));
        assert_eq!((m.season, m.episode), (Some(1), Some(4)));
        assert_eq!(m.title, None);
    }

    #[test]
    fn movie_with_year_and_tags() {
        let m = guess("[grp] Blade.Runner.1982.Final.Cut.1080p.BluRay.mp4");
        assert_eq!(m.media, MediaKind::Movie);
        assert_eq!(m.title.as_deref(), Some("Blade Runner"));
        assert_eq!(m.year, Some(1982));
    }

    #[test]
    fn movie_title_starting_with_a_year() {
        let m = guess("2001 A Space Odyssey (1968).mkv");
        assert_eq!(m.title.as_deref(), Some("2001 A Space Odyssey"));
        assert_eq!(m.year, Some(1968));
    }

    #[test]
    fn bare_title() {
        let m = guess("home_movie.mp4");
        assert_eq!(m.title.as_deref(), Some("home movie"));
        assert_eq!(m.year, None);
    }

    #[test]
    fn forced_media_kind() {
        let m = guess_from_path(Path::new("Cosmos.mkv"), Some(MediaKind::Television));
        assert_eq!(m.media, MediaKind::Television);
        assert_eq!(m.series.as_deref(), Some("Cosmos"));
    }
}
