//! Only the top-ranked entry of an application's notification stack is
//! relayed; the rest are already summarised by it.

use relay_core::NotificationIdentity;

/// Whether `event` is the representative of `tracked_package`'s stack.
///
/// `active` is what is currently visible, `ranking` the platform's order
/// (highest first) if it gave one.
pub fn should_forward(
    event: &NotificationIdentity,
    active: &[NotificationIdentity],
    ranking: Option<&[NotificationIdentity]>,
    tracked_package: &str,
) -> bool {
    if event.package != tracked_package {
        return false;
    }
    let Some(ranking) = ranking else {
        return true;
    };
    if !active.contains(event) {
        return true;
    }

    let top = ranking
        .iter()
        .find(|id| id.package == tracked_package && active.contains(id));
    match top {
        None => true,
        Some(top) => top == event,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAIL: &str = "com.example.mail";

    fn id(n: i32) -> NotificationIdentity {
        NotificationIdentity::new(MAIL, Some("msg"), n)
    }

    #[test]
    fn only_top_ranked_forwards() {
        let (a, b, c) = (id(1), id(2), id(3));
        let active = vec![a.clone(), b.clone(), c.clone()];
        let ranking = vec![b.clone(), a.clone(), c.clone()];

        assert!(!should_forward(&a, &active, Some(&ranking), MAIL));
        assert!(should_forward(&b, &active, Some(&ranking), MAIL));
        assert!(!should_forward(&c, &active, Some(&ranking), MAIL));
    }

    #[test]
    fn inactive_identity_forwards() {
        let active = vec![id(1), id(2)];
        let ranking = vec![id(2), id(1)];
        assert!(should_forward(&id(4), &active, Some(&ranking), MAIL));
    }

    #[test]
    fn missing_ranking_forwards() {
        let active = vec![id(1), id(2)];
        assert!(should_forward(&id(1), &active, None, MAIL));
    }

    #[test]
    fn other_package_never_forwards() {
        let other = NotificationIdentity::new("com.example.chat", None, 1);
        let active = vec![other.clone()];
        assert!(!should_forward(&other, &active, Some(&active), MAIL));
    }

    #[test]
    fn ranking_entries_of_other_packages_are_skipped() {
        let chat = NotificationIdentity::new("com.example.chat", None, 9);
        let active = vec![chat.clone(), id(1), id(2)];
        let ranking = vec![chat, id(2), id(1)];
        assert!(should_forward(&id(2), &active, Some(&ranking), MAIL));
        assert!(!should_forward(&id(1), &active, Some(&ranking), MAIL));
    }

    #[test]
    fn ranking_without_active_entries_forwards() {
        let active = vec![id(1)];
        let ranking = vec![id(7), id(8)];
        assert!(should_forward(&id(1), &active, Some(&ranking), MAIL));
    }
}
