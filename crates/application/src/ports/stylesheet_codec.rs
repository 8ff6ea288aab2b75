//! Stylesheet codec port.

use crate::ports::DeclarationTree;

/// Turns stylesheet text into a declaration tree and back.
///
/// Parsing and serialization live outside the resolver; this port lets use
/// cases drive any host format.
pub trait StylesheetCodec: Send + Sync {
    /// The parsed document.
    type Document: DeclarationTree + Send;

    /// The error returned when text cannot be parsed.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Parses stylesheet text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a well-formed stylesheet.
    fn parse(&self, text: &str) -> Result<Self::Document, Self::Error>;

    /// Writes a document back to text.
    fn stringify(&self, document: &Self::Document) -> String;
}
