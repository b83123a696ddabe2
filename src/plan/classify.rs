use super::types::ComponentId;
use crate::config::Component;
use crate::store::PullRequest;

/// Map a pull request to exactly one component.
///
/// Labels are scanned in stored order, and for each label the components in
/// priority order; the first match wins. No match means the fallback.
pub fn classify(pull: &PullRequest, components: &[Component]) -> ComponentId {
    pull.labels
        .iter()
        .find_map(|label| components.iter().position(|c| c.matches(label)))
        .map(ComponentId::Listed)
        .unwrap_or(ComponentId::Fallback)
}
