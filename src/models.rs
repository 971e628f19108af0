mod analysis_request;
mod analysis_result;
mod skill_gap;

pub use analysis_request::{AnalysisRequest, RequestError};
pub use analysis_result::{AnalysisResult, RawAnalysis};
pub use skill_gap::SkillGap;
