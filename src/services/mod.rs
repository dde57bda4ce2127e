pub mod search;
pub use search::{
    PersistReport, ResultOrigin, SearchError, SearchGeneration, SearchOutcome, SearchService,
    SkipReason, SkippedRecord,
};

pub mod popular;
pub use popular::PopularService;
