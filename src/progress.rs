#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub total_xp: u64,
    pub level: u64,
}

pub fn award(progress: Progress, amount: u64) -> Progress {
    let total_xp = progress.total_xp + amount;
    Progress {
        total_xp,
        level: level_for(total_xp),
    }
}

pub fn level_for(total_xp: u64) -> u64 {
    total_xp / 100 + 1
}
