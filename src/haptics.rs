#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpactStyle {
    Light,
    Medium,
}

/// Fire-and-forget tactile feedback for user selections.
pub trait HapticFeedback: Send + Sync {
    fn selection(&self);
    fn impact(&self, style: ImpactStyle);
}
