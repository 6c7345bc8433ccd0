pub mod engine;
pub mod index;
pub mod normalize;
pub mod ranker;
pub mod stem;

pub type TermId = u32;

pub use engine::{
    Document, EngineError, Generation, IndexedDocument, SearchEngine, SearchHit, SearchOutcome,
};
pub use index::{IndexError, IndexGeneration, TermWeight};
pub use normalize::{normalize, normalize_stages, Normalized, PipelineStages};
pub use ranker::{rank, similarity, RankError, RankedResult};
