//! Semantic classifier interface
//!
//! The classifier is a rate-limited network service that receives the full
//! document text and returns, depending on the call, either a flat list of
//! verbatim "forbidden" phrases or a list of labeled entities. It has no
//! knowledge of geometry.

pub mod http;
pub mod parse;

pub use http::HttpClassifier;

use crate::domain::ClassifierError;
use async_trait::async_trait;

/// One labeled phrase from the legacy entity-style response
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledPhrase {
    /// Verbatim text as it appears in the document
    pub text: String,
    /// Free-text category label; mapped onto the closed vocabulary later
    pub category: Option<String>,
}

/// External semantic classifier collaborator
#[async_trait]
pub trait SemanticClassifier: Send + Sync {
    /// Primary call: flat list of verbatim forbidden phrases
    async fn forbidden_phrases(
        &self,
        text: &str,
        required_categories: &[String],
    ) -> std::result::Result<Vec<String>, ClassifierError>;

    /// Legacy fallback call: labeled entities
    async fn classify_entities(
        &self,
        text: &str,
        required_categories: &[String],
    ) -> std::result::Result<Vec<LabeledPhrase>, ClassifierError>;
}
