//! Onboarding state types

/// The linear onboarding sub-machine. Steps only ever advance; the whole
/// machine resets only with the app state itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum OnboardingStep {
    /// Collecting identity
    #[default]
    Welcome,
    /// Device and microphone grants, advisory only
    Permissions,
    /// Tremor baseline questionnaire
    Baseline,
    /// Terminal: the dashboard takes over from here
    Ready,
}

impl OnboardingStep {
    pub fn index(self) -> u8 {
        match self {
            OnboardingStep::Welcome => 0,
            OnboardingStep::Permissions => 1,
            OnboardingStep::Baseline => 2,
            OnboardingStep::Ready => 3,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OnboardingStep::Ready)
    }
}

/// Step-2 questionnaire. Gates `Baseline -> Ready` and is never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Baseline {
    /// 1 (none) .. 5 (severe), once selected
    pub tremor_score: Option<u8>,
    pub last_med_time: String,
    pub sleep_duration: String,
}

impl Baseline {
    pub fn new(
        tremor_score: u8,
        last_med_time: impl Into<String>,
        sleep_duration: impl Into<String>,
    ) -> Self {
        Self {
            tremor_score: Some(tremor_score),
            last_med_time: last_med_time.into(),
            sleep_duration: sleep_duration.into(),
        }
    }

    /// All three fields answered, score within the 1-5 scale.
    pub fn is_complete(&self) -> bool {
        matches!(self.tremor_score, Some(1..=5))
            && !self.last_med_time.trim().is_empty()
            && !self.sleep_duration.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_are_ordered() {
        assert!(OnboardingStep::Welcome < OnboardingStep::Permissions);
        assert!(OnboardingStep::Baseline < OnboardingStep::Ready);
        assert!(OnboardingStep::Ready.is_terminal());
    }

    #[test]
    fn baseline_completeness_guard() {
        assert!(!Baseline::default().is_complete());
        assert!(!Baseline::new(3, "", "7h 30m").is_complete());
        assert!(!Baseline::new(3, "9:00 AM", "   ").is_complete());
        assert!(!Baseline::new(0, "9:00 AM", "7h 30m").is_complete());
        assert!(!Baseline::new(6, "9:00 AM", "7h 30m").is_complete());
        assert!(Baseline::new(3, "9:00 AM", "7h 30m").is_complete());
    }
}
