use crate::models::LoyaltyProgram;

/// Punch-card position derived from a lifetime visit count. The counter
/// wraps at the threshold, so a full card reads as zero progress with the
/// reward unlocked.
#[derive(Debug, Clone)]
pub struct LoyaltyStatus {
    pub visits: u32,
    pub threshold: u32,
    pub progress: u32,
    pub remaining: u32,
    pub reward_ready: bool,
}

impl LoyaltyStatus {
    pub fn for_visits(program: &LoyaltyProgram, visits: u32) -> Self {
        if !program.enabled || program.threshold == 0 {
            return Self {
                visits,
                threshold: 0,
                progress: 0,
                remaining: 0,
                reward_ready: false,
            };
        }
        let progress = visits % program.threshold;
        Self {
            visits,
            threshold: program.threshold,
            progress,
            remaining: program.threshold - progress,
            reward_ready: progress == 0 && visits > 0,
        }
    }

    /// One flag per punch-card slot, filled left to right.
    pub fn stamps(&self) -> Vec<bool> {
        (1..=self.threshold)
            .map(|n| n <= self.progress || self.reward_ready)
            .collect()
    }
}
