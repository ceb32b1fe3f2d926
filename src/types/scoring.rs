use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub type Score = f64;

/// Scoring dimensions in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Dimension {
    Clarity,
    Context,
    Completeness,
    TicketLink,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::Clarity,
        Dimension::Context,
        Dimension::Completeness,
        Dimension::TicketLink,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Dimension::Clarity => "clarity",
            Dimension::Context => "context",
            Dimension::Completeness => "completeness",
            Dimension::TicketLink => "ticketLink",
        }
    }

    /// Key used for this dimension in `prscore.toml`.
    pub fn config_key(self) -> &'static str {
        match self {
            Dimension::TicketLink => "ticket_link",
            other => other.as_str(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Dimension::Clarity => "Clarity",
            Dimension::Context => "Context",
            Dimension::Completeness => "Completeness",
            Dimension::TicketLink => "Ticket Link",
        }
    }

    /// Inclusive bounds of the sub-score. Ticket linkage alone may reach 0,
    /// meaning no ticket rather than a poor one.
    pub fn range(self) -> (Score, Score) {
        match self {
            Dimension::TicketLink => (0.0, 10.0),
            _ => (1.0, 10.0),
        }
    }

    pub fn clamp(self, score: Score) -> Score {
        let (min, max) = self.range();
        score.clamp(min, max)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub clarity: Score,
    pub context: Score,
    pub completeness: Score,
    pub ticket_link: Score,
}

impl ScoreBreakdown {
    pub fn get(&self, dimension: Dimension) -> Score {
        match dimension {
            Dimension::Clarity => self.clarity,
            Dimension::Context => self.context,
            Dimension::Completeness => self.completeness,
            Dimension::TicketLink => self.ticket_link,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Dimension, Score)> + '_ {
        Dimension::ALL
            .into_iter()
            .map(move |dimension| (dimension, self.get(dimension)))
    }

    /// Unrounded weighted sum across all dimensions.
    pub fn weighted_sum(&self, weights: &Weights) -> Score {
        self.iter()
            .map(|(dimension, score)| score * weights.get(dimension))
            .sum()
    }

    /// Dimensions scoring strictly below `threshold`, in canonical order.
    pub fn weak_dimensions(&self, threshold: Score) -> Vec<Dimension> {
        self.iter()
            .filter(|(_, score)| *score < threshold)
            .map(|(dimension, _)| dimension)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Weights {
    pub clarity: Score,
    pub context: Score,
    pub completeness: Score,
    pub ticket_link: Score,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            clarity: 0.30,
            context: 0.25,
            completeness: 0.25,
            ticket_link: 0.20,
        }
    }
}

impl Weights {
    pub fn get(&self, dimension: Dimension) -> Score {
        match dimension {
            Dimension::Clarity => self.clarity,
            Dimension::Context => self.context,
            Dimension::Completeness => self.completeness,
            Dimension::TicketLink => self.ticket_link,
        }
    }

    pub fn sum(&self) -> Score {
        Dimension::ALL
            .into_iter()
            .map(|dimension| self.get(dimension))
            .sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Thresholds {
    pub excellent: Score,
    pub good: Score,
    pub needs_improvement: Score,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            excellent: 8.5,
            good: 7.0,
            needs_improvement: 5.0,
        }
    }
}

impl Thresholds {
    pub fn is_monotonic(&self) -> bool {
        self.needs_improvement <= self.good && self.good <= self.excellent
    }

    pub fn rating_for(&self, total: Score) -> Rating {
        if total >= self.excellent {
            Rating::Excellent
        } else if total >= self.good {
            Rating::Good
        } else if total >= self.needs_improvement {
            Rating::NeedsImprovement
        } else {
            Rating::Poor
        }
    }
}

/// Rating bands, ordered from worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rating {
    Poor,
    NeedsImprovement,
    Good,
    Excellent,
}

impl Rating {
    pub fn as_str(self) -> &'static str {
        match self {
            Rating::Poor => "poor",
            Rating::NeedsImprovement => "needs-improvement",
            Rating::Good => "good",
            Rating::Excellent => "excellent",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Rating::Poor => "Poor",
            Rating::NeedsImprovement => "Needs Improvement",
            Rating::Good => "Good",
            Rating::Excellent => "Excellent",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringResult {
    pub request_id: String,
    pub total_score: Score,
    pub breakdown: ScoreBreakdown,
    pub rating: Rating,
    pub suggestions: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

pub fn round_to_tenth(value: Score) -> Score {
    (value * 10.0).round() / 10.0
}
