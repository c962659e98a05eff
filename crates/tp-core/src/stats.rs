use serde::Serialize;

/// Percentage of completed items, rounded half up. Zero when there is nothing
/// to complete.
pub fn completion_rate(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let rate = (completed as f64 / total as f64) * 100.0;
    rate.round() as u32
}

/// Completion statistics for one content type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentStats {
    pub total: usize,
    pub completed: usize,
    pub completion_rate: u32,
}

impl ContentStats {
    /// Tally a sequence of completion flags.
    pub fn from_flags(flags: impl IntoIterator<Item = bool>) -> Self {
        let (total, completed) = flags
            .into_iter()
            .fold((0, 0), |(total, completed), done| {
                (total + 1, completed + usize::from(done))
            });
        Self {
            total,
            completed,
            completion_rate: completion_rate(completed, total),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub facts: ContentStats,
    pub flashcards: ContentStats,
}
