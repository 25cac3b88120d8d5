//! Paper data model matching the Semantic Scholar API schema.

use serde::{Deserialize, Deserializer, Serialize};

use crate::config::api;

/// A research paper from Semantic Scholar.
///
/// Every field tolerates absence and `null`: search, batch, and
/// recommendation responses do not agree on completeness.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paper {
    /// Semantic Scholar paper ID.
    #[serde(default)]
    pub paper_id: Option<String>,

    /// Paper title.
    #[serde(default)]
    pub title: Option<String>,

    /// Paper abstract.
    #[serde(default)]
    pub r#abstract: Option<String>,

    /// List of authors.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub authors: Vec<AuthorRef>,

    /// Publication year.
    #[serde(default)]
    pub year: Option<i32>,

    /// Publication venue (journal or conference).
    #[serde(default)]
    pub venue: Option<String>,

    /// Number of citations this paper has received.
    #[serde(default)]
    pub citation_count: Option<i32>,

    /// External identifiers (DOI, ArXiv, PubMed, etc.).
    #[serde(default)]
    pub external_ids: Option<ExternalIds>,

    /// Canonical paper URL.
    #[serde(default)]
    pub url: Option<String>,

    /// AI-generated TLDR summary.
    #[serde(default)]
    pub tldr: Option<Tldr>,

    /// Relevance score assigned by the search endpoint, when it sends one.
    /// Non-numeric values read as absent.
    #[serde(default, deserialize_with = "number_or_none", skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl Paper {
    /// Get the stable paper ID if present and non-empty.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        non_blank(self.paper_id.as_deref())
    }

    /// Get the DOI if available.
    #[must_use]
    pub fn doi(&self) -> Option<&str> {
        non_blank(self.external_ids.as_ref()?.doi.as_deref())
    }

    /// Get the paper's own URL if available.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        non_blank(self.url.as_deref())
    }

    /// URL to cite: the paper's own, else its Semantic Scholar page.
    #[must_use]
    pub fn citation_url(&self) -> Option<String> {
        self.url()
            .map(str::to_string)
            .or_else(|| self.id().map(|id| format!("{}/{id}", api::PAPER_PAGE)))
    }

    /// Get the abstract if available and non-blank.
    #[must_use]
    pub fn abstract_text(&self) -> Option<&str> {
        non_blank(self.r#abstract.as_deref())
    }

    /// Get the TLDR text if available.
    #[must_use]
    pub fn tldr_text(&self) -> Option<&str> {
        non_blank(self.tldr.as_ref()?.text.as_deref())
    }

    /// Get the venue if available and non-blank.
    #[must_use]
    pub fn venue(&self) -> Option<&str> {
        non_blank(self.venue.as_deref())
    }

    /// A paper is traceable when a reader can find it again: it has an ID, a DOI, or a URL.
    #[must_use]
    pub fn is_traceable(&self) -> bool {
        self.id().is_some() || self.doi().is_some() || self.url().is_some()
    }

    /// Author names with internal whitespace collapsed; nameless entries dropped.
    #[must_use]
    pub fn author_names(&self) -> Vec<String> {
        self.authors
            .iter()
            .filter_map(|a| a.name.as_deref())
            .map(|name| name.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|name| !name.is_empty())
            .collect()
    }
}

/// Author reference as embedded in a paper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorRef {
    /// Semantic Scholar author ID.
    #[serde(default)]
    pub author_id: Option<String>,

    /// Author display name.
    #[serde(default)]
    pub name: Option<String>,
}

/// External identifiers for a paper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalIds {
    /// Digital Object Identifier.
    #[serde(rename = "DOI", default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,

    /// ArXiv preprint ID.
    #[serde(rename = "ArXiv", default, skip_serializing_if = "Option::is_none")]
    pub arxiv: Option<String>,

    /// PubMed ID.
    #[serde(rename = "PubMed", default, skip_serializing_if = "Option::is_none")]
    pub pubmed: Option<String>,

    /// PubMed Central ID.
    #[serde(rename = "PubMedCentral", default, skip_serializing_if = "Option::is_none")]
    pub pmc: Option<String>,

    /// Microsoft Academic Graph ID.
    #[serde(rename = "MAG", default, skip_serializing_if = "Option::is_none")]
    pub mag: Option<String>,

    /// Semantic Scholar Corpus ID.
    #[serde(rename = "CorpusId", default, skip_serializing_if = "Option::is_none")]
    pub corpus_id: Option<i64>,

    /// DBLP key.
    #[serde(rename = "DBLP", default, skip_serializing_if = "Option::is_none")]
    pub dblp: Option<String>,

    /// ACL Anthology ID.
    #[serde(rename = "ACL", default, skip_serializing_if = "Option::is_none")]
    pub acl: Option<String>,
}

/// AI-generated TLDR summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tldr {
    /// Model used to generate the summary.
    #[serde(default)]
    pub model: Option<String>,

    /// Summary text.
    #[serde(default)]
    pub text: Option<String>,
}

/// Search endpoint response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResult {
    /// Total number of matching papers.
    #[serde(default)]
    pub total: i64,

    /// Current offset in the result set.
    #[serde(default)]
    pub offset: i32,

    /// Next offset, if more results are available.
    #[serde(default)]
    pub next: Option<i32>,

    /// Papers in this page. Absent when nothing matched.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: Vec<Paper>,
}

/// Paper list as returned by the batch and recommendation endpoints.
///
/// The API wraps lists differently per endpoint and version; every shape is
/// normalized here so the rest of the pipeline only sees `Vec<Paper>`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PaperList {
    /// `[paper, null, paper]`; nulls stand for unknown IDs.
    Bare(Vec<Option<Paper>>),

    /// `{"recommendedPapers": [...]}`
    Recommended {
        /// Recommended papers.
        #[serde(rename = "recommendedPapers")]
        recommended_papers: Vec<Option<Paper>>,
    },

    /// `{"data": [...]}`
    Data {
        /// Papers.
        data: Vec<Option<Paper>>,
    },
}

impl PaperList {
    /// Unwrap into papers, dropping `null` entries.
    #[must_use]
    pub fn into_papers(self) -> Vec<Paper> {
        let items = match self {
            Self::Bare(items) => items,
            Self::Recommended { recommended_papers } => recommended_papers,
            Self::Data { data } => data,
        };
        items.into_iter().flatten().collect()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn number_or_none<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<serde_json::Value>::deserialize(deserializer)?.and_then(|v| v.as_f64()))
}
