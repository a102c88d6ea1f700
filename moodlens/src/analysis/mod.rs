//! Emotion analysis of posts and dashboard aggregation.

mod cache;
mod emotion;
mod trends;

pub use cache::{AnalysisCache, InMemoryAnalysisCache};
pub use emotion::{
    build_analysis_prompt, extract_emojis, parse_analysis_reply, EmotionAnalysis, EmotionAnalyzer,
    Sentiment,
};
pub use trends::{
    dashboard, keyword_ranking, sentiment_trends, trend_insights, DashboardData, Insight,
    InsightKind, KeywordCount, PostRecord, SentimentTrends, DASHBOARD_DAYS, MAX_KEYWORDS_PER_POST,
    TOP_KEYWORDS_LIMIT, WORD_CLOUD_LIMIT,
};
