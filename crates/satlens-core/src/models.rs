pub mod analysis;
pub mod chat;
pub mod report;
pub mod upload;

pub use analysis::{
    format_share, AnalysisResult, AnalysisState, AnalysisStatus, AnalysisType, ChangeDetection,
    Classification, EnvironmentalScores, LandUseTile, NdviStats,
};
pub use chat::{ChatMessage, ChatRequest, ChatResponse, ChatRole};
pub use report::{HealthStatus, ReportFormat};
pub use upload::{mime_from_name, UploadedFile};
