//! Route-deactivation guard.
//!
//! The decision whether a view may be left lives in the view itself; the
//! guard only asks it.

use async_trait::async_trait;
use tracing::debug;

/// Answer of a [`Deactivatable`] view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deactivation {
    Allow,
    Block,
    /// Navigate to the given URL instead
    Redirect(String),
}

impl Deactivation {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Deactivation::Allow)
    }
}

impl From<bool> for Deactivation {
    fn from(allow: bool) -> Self {
        if allow {
            Deactivation::Allow
        } else {
            Deactivation::Block
        }
    }
}

/// A view that decides whether it may be left, possibly asynchronously
/// (e.g. after asking the user to confirm unsaved changes).
#[async_trait]
pub trait Deactivatable: Send + Sync {
    async fn can_deactivate(&self) -> Deactivation;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DeactivateGuard;

impl DeactivateGuard {
    pub fn new() -> Self {
        Self
    }

    pub async fn can_deactivate(&self, component: &dyn Deactivatable) -> Deactivation {
        let decision = component.can_deactivate().await;
        debug!(decision = ?decision, "Deactivation checked");
        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::mock;

    mock! {
        View {}

        #[async_trait]
        impl Deactivatable for View {
            async fn can_deactivate(&self) -> Deactivation;
        }
    }

    #[tokio::test]
    async fn test_guard_delegates_to_component() {
        let guard = DeactivateGuard::new();

        for decision in [
            Deactivation::Allow,
            Deactivation::Block,
            Deactivation::Redirect("/confirm".to_string()),
        ] {
            let mut view = MockView::new();
            let answer = decision.clone();
            view.expect_can_deactivate()
                .times(1)
                .returning(move || answer.clone());

            assert_eq!(guard.can_deactivate(&view).await, decision);
        }
    }

    #[test]
    fn test_from_bool() {
        assert!(Deactivation::from(true).is_allowed());
        assert_eq!(Deactivation::from(false), Deactivation::Block);
    }
}
