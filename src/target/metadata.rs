//! Metadata fields shared by filename guesses, provider candidates and templates.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Movie,
    Television,
}

impl MediaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Television => "television",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "movie" | "movies" | "film" => Ok(MediaKind::Movie),
            "television" | "tv" | "episode" | "show" => Ok(MediaKind::Television),
            other => Err(format!("unknown media kind '{other}' (expected movie or television)")),
        }
    }
}

/// Descriptive fields for one media file.
///
/// For movies `title`/`year` are meaningful; for television `series`, `season`,
/// `episode` and the episode `title`. `extension` includes the leading dot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Metadata {
    pub media: MediaKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode: Option<u32>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub extension: String,
}

impl Metadata {
    pub fn movie(title: impl Into<String>, year: Option<u16>) -> Self {
        Self {
            media: MediaKind::Movie,
            title: Some(title.into()),
            year,
            ..Default::default()
        }
    }

    pub fn episode(series: impl Into<String>, season: u32, episode: u32, title: Option<String>) -> Self {
        Self {
            media: MediaKind::Television,
            series: Some(series.into()),
            season: Some(season),
            episode: Some(episode),
            title,
            ..Default::default()
        }
    }
}

/// Human-readable one-line description used in candidate listings.
impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.media {
            MediaKind::Movie => {
                f.write_str(self.title.as_deref().unwrap_or("<untitled>"))?;
                if let Some(year) = self.year {
                    write!(f, " ({year})")?;
                }
                Ok(())
            }
            MediaKind::Television => {
                f.write_str(self.series.as_deref().unwrap_or("<unknown series>"))?;
                match (self.season, self.episode) {
                    (Some(s), Some(e)) => write!(f, " - S{s:02}E{e:02}")?,
                    (None, Some(e)) => write!(f, " - E{e:02}")?,
                    _ => {}
                }
                if let Some(title) = &self.title {
                    write!(f, " - {title}")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lines() {
        assert_eq!(Metadata::movie("Alien", Some(1979)).to_string(), "Alien (1979)");
        assert_eq!(
            Metadata::episode("Lost", 1, 2, Some("Pilot".into())).to_string(),
            "Lost - S01E02 - Pilot"
        );
    }

    #[test]
    fn media_kind_parsing() {
        assert_eq!("TV".parse::<MediaKind>().unwrap(), MediaKind::Television);
        assert_eq!("movie".parse::<MediaKind>().unwrap(), MediaKind::Movie);
        assert!("radio".parse::<MediaKind>().is_err());
    }
}
