//! Scoring pipeline: lexical analyzers, heuristic aggregation, semantic scoring and insights

pub mod text;
pub mod vocabulary;
pub mod sections;
pub mod keywords;
pub mod formatting;
pub mod context;
pub mod aggregator;
pub mod result;
pub mod embeddings;
pub mod semantic;
pub mod insights;
