//! Metadata provider seam.
//!
//! A provider turns a `Query` built from a target's filename into zero or more
//! candidate `Metadata` records. Transport and identity are up to the implementor.

use serde::Serialize;

use crate::errors::{MediaNameError, Result};
use crate::target::{MediaKind, Metadata};

/// Fields a provider may search on.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Query {
    pub media: MediaKind,
    pub title: Option<String>,
    pub year: Option<u16>,
    pub series: Option<String>,
    pub season: Option<u32>,
    pub episode: Option<u32>,
}

impl Query {
    pub fn from_metadata(meta: &Metadata) -> Self {
        Self {
            media: meta.media,
            title: meta.title.clone(),
            year: meta.year,
            series: meta.series.clone(),
            season: meta.season,
            episode: meta.episode,
        }
    }

    /// Short description for messages, e.g. "television 'Lost' S01E04".
    pub fn describe(&self) -> String {
        let name = match self.media {
            MediaKind::Movie => self.title.as_deref(),
            MediaKind::Television => self.series.as_deref().or(self.title.as_deref()),
        }
        .unwrap_or("<unnamed>");
        match (self.media, self.season, self.episode) {
            (MediaKind::Television, Some(s), Some(e)) => format!("{} '{name}' S{s:02}E{e:02}", self.media),
            (MediaKind::Movie, _, _) if self.year.is_some() => {
                format!("{} '{name}' ({})", self.media, self.year.unwrap_or_default())
            }
            _ => format!("{} '{name}'", self.media),
        }
    }
}

/// A source of candidate metadata.
///
/// Implementations return `LookupNotFound` or `LookupUnavailable` on failure;
/// an empty Vec is treated the same as `LookupNotFound` by callers.
pub trait Provider {
    fn search(&self, query: &Query) -> Result<Vec<Metadata>>;
}

impl<P: Provider + ?Sized> Provider for &P {
    fn search(&self, query: &Query) -> Result<Vec<Metadata>> {
        (**self).search(query)
    }
}

impl<P: Provider + ?Sized> Provider for Box<P> {
    fn search(&self, query: &Query) -> Result<Vec<Metadata>> {
        (**self).search(query)
    }
}

/// Offline provider: the parsed filename fields are the only candidate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParsedNameProvider;

impl Provider for ParsedNameProvider {
    fn search(&self, query: &Query) -> Result<Vec<Metadata>> {
        let named = match query.media {
            MediaKind::Movie => query.title.is_some(),
            MediaKind::Television => query.series.is_some() && query.episode.is_some(),
        };
        if !named {
            return Err(MediaNameError::LookupNotFound(query.describe()));
        }
        Ok(vec![Metadata {
            media: query.media,
            title: query.title.clone(),
            year: query.year,
            series: query.series.clone(),
            season: query.season,
            episode: query.episode,
            extension: String::new(),
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parsed_name_provider_echoes_query() {
        let query = Query::from_metadata(&Metadata::movie("Alien", Some(1979)));
        let found = ParsedNameProvider.search(&query).unwrap();
        assert_eq!(found, vec![Metadata::movie("Alien", Some(1979))]);
    }

    #[test]
    fn parsed_name_provider_needs_a_name() {
        let query = Query {
            media: MediaKind::Television,
            series: Some("Lost".into()),
            ..Default::default()
        };
        let err = ParsedNameProvider.search(&query).unwrap_err();
        assert!(matches!(err, MediaNameError::LookupNotFound(_)));
    }

    #[test]
    fn describe_episode() {
        let query = Query::from_metadata(&Metadata::episode("Lost", 1, 4, None));
        assert_eq!(query.describe(), "television 'Lost' S01E04");
    }
}
