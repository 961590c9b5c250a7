/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub current_index: usize,
    pub stars: u32,
    pub remaining_secs: u32,
    pub total_secs: u32,
    pub paused: bool,
    pub is_terminal: bool,
}
