//! Dashboard aggregation over analysed posts.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::{EmotionAnalysis, Sentiment};

/// Only the first few keywords of each post are counted.
pub const MAX_KEYWORDS_PER_POST: usize = 6;
/// Window used by [`dashboard`].
pub const DASHBOARD_DAYS: u32 = 7;
/// Word cloud size used by [`dashboard`].
pub const WORD_CLOUD_LIMIT: usize = 50;
/// Top keyword list size used by [`dashboard`].
pub const TOP_KEYWORDS_LIMIT: usize = 10;

/// A post and, if it has been analysed, its analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    /// Day the post was created.
    pub created_on: NaiveDate,
    /// Analysis, if any.
    pub analysis: Option<EmotionAnalysis>,
}

impl PostRecord {
    /// Creates a record.
    #[must_use]
    pub const fn new(created_on: NaiveDate, analysis: Option<EmotionAnalysis>) -> Self {
        Self {
            created_on,
            analysis,
        }
    }
}

/// Per-day sentiment percentages, parallel arrays in ascending date order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentTrends {
    /// Dates as `YYYY-MM-DD`.
    pub labels: Vec<String>,
    /// Percentage of positive posts per day.
    pub positive: Vec<f64>,
    /// Percentage of neutral posts per day.
    pub neutral: Vec<f64>,
    /// Percentage of negative posts per day.
    pub negative: Vec<f64>,
}

/// How often a keyword occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCount {
    /// The keyword.
    pub keyword: String,
    /// Number of occurrences.
    pub count: usize,
}

/// Severity of an insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    /// Informational.
    Info,
}

/// A one-line observation about the trends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    /// Severity.
    #[serde(rename = "type")]
    pub kind: InsightKind,
    /// Text shown to the user.
    pub text: String,
}

/// Everything the dashboard shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    /// Most frequent keywords, for a word cloud.
    pub word_cloud: Vec<KeywordCount>,
    /// The top keywords.
    pub top_keywords: Vec<KeywordCount>,
    /// Daily sentiment percentages.
    pub emotion_trends: SentimentTrends,
    /// Observations about the trends.
    pub insights: Vec<Insight>,
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[allow(clippy::cast_precision_loss)]
fn percent(part: usize, total: usize) -> f64 {
    round1(part as f64 / total.max(1) as f64 * 100.0)
}

fn window_start(today: NaiveDate, days: u32) -> NaiveDate {
    today
        .checked_sub_days(Days::new(u64::from(days.saturating_sub(1))))
        .unwrap_or(NaiveDate::MIN)
}

fn in_window(record: &PostRecord, today: NaiveDate, days: u32) -> bool {
    days > 0 && record.created_on <= today && record.created_on >= window_start(today, days)
}

/// Groups posts from the last `days` days (today included) by date.
///
/// Percentages are of all posts that day, so unanalysed posts lower every
/// share without counting toward any of them. Days without posts are
/// omitted.
#[must_use]
pub fn sentiment_trends(records: &[PostRecord], today: NaiveDate, days: u32) -> SentimentTrends {
    // date -> [positive, neutral, negative, total]
    let mut per_day: BTreeMap<NaiveDate, [usize; 4]> = BTreeMap::new();
    for record in records.iter().filter(|r| in_window(r, today, days)) {
        let counts = per_day.entry(record.created_on).or_default();
        counts[3] += 1;
        if let Some(analysis) = &record.analysis {
            let slot = match analysis.emotion {
                Sentiment::Positive => 0,
                Sentiment::Neutral => 1,
                Sentiment::Negative => 2,
            };
            counts[slot] += 1;
        }
    }

    let mut trends = SentimentTrends::default();
    for (date, [positive, neutral, negative, total]) in per_day {
        trends.labels.push(date.format("%Y-%m-%d").to_string());
        trends.positive.push(percent(positive, total));
        trends.neutral.push(percent(neutral, total));
        trends.negative.push(percent(negative, total));
    }
    trends
}

/// Counts keywords across analysed posts, most frequent first, ties broken
/// alphabetically. Blank keywords are skipped.
#[must_use]
pub fn keyword_ranking(records: &[PostRecord], limit: usize) -> Vec<KeywordCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for analysis in records.iter().filter_map(|r| r.analysis.as_ref()) {
        for keyword in analysis.keywords.iter().take(MAX_KEYWORDS_PER_POST) {
            let keyword = keyword.trim();
            if !keyword.is_empty() {
                *counts.entry(keyword).or_insert(0) += 1;
            }
        }
    }

    let mut ranking: Vec<KeywordCount> = counts
        .into_iter()
        .map(|(keyword, count)| KeywordCount {
            keyword: keyword.to_string(),
            count,
        })
        .collect();
    ranking.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.keyword.cmp(&b.keyword)));
    ranking.truncate(limit);
    ranking
}

/// Derives insights from the trends. With at least three days of data this
/// reports the average positive share of the most recent three.
#[must_use]
pub fn trend_insights(trends: &SentimentTrends) -> Vec<Insight> {
    let mut insights = Vec::new();
    if let Some(recent) = trends.positive.len().checked_sub(3).map(|start| &trends.positive[start..]) {
        let average = recent.iter().sum::<f64>() / 3.0;
        insights.push(Insight {
            kind: InsightKind::Info,
            text: format!("Recent 3 days average positive emotion: {average:.1}%"),
        });
    }
    insights
}

/// Builds the dashboard over the last [`DASHBOARD_DAYS`] days.
#[must_use]
pub fn dashboard(records: &[PostRecord], today: NaiveDate) -> DashboardData {
    let recent: Vec<PostRecord> = records
        .iter()
        .filter(|r| in_window(r, today, DASHBOARD_DAYS))
        .cloned()
        .collect();
    let emotion_trends = sentiment_trends(&recent, today, DASHBOARD_DAYS);
    let insights = trend_insights(&emotion_trends);
    DashboardData {
        word_cloud: keyword_ranking(&recent, WORD_CLOUD_LIMIT),
        top_keywords: keyword_ranking(&recent, TOP_KEYWORDS_LIMIT),
        emotion_trends,
        insights,
    }
}
