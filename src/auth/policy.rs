use uuid::Uuid;

use crate::{
    domain::User,
    error::{AppError, Result},
};

/// What an authenticated actor is trying to do to a course or lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Retrieve,
    Update,
    Destroy,
}

/// Pure allow/deny decision over the two role capabilities.
///
/// Authentication is resolved earlier by the session middleware, and a
/// missing resource is a not-found condition resolved before this runs.
/// Moderators may read and edit everything but may not create new material
/// or destroy material they do not own.
pub fn allows(is_moderator: bool, is_owner: bool, action: Action) -> bool {
    match action {
        Action::Create => !is_moderator,
        Action::Retrieve | Action::Update => is_moderator || is_owner,
        Action::Destroy => !is_moderator || is_owner,
    }
}

pub fn authorize(actor: &User, owner_id: Uuid, action: Action) -> Result<()> {
    if allows(actor.is_moderator(), actor.id == owner_id, action) {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Create has no resource yet, so there is no owner to compare against.
pub fn authorize_create(actor: &User) -> Result<()> {
    if allows(actor.is_moderator(), false, Action::Create) {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;
    use chrono::Utc;

    fn user(role: UserRole) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            email: "actor@example.com".to_string(),
            full_name: "Actor".to_string(),
            role,
            phone: None,
            city: None,
            avatar_url: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn moderators_never_create() {
        assert!(!allows(true, false, Action::Create));
        assert!(!allows(true, true, Action::Create));
        assert!(allows(false, false, Action::Create));
    }

    #[test]
    fn retrieve_and_update_need_moderator_or_owner() {
        for action in [Action::Retrieve, Action::Update] {
            assert!(!allows(false, false, action));
            assert!(allows(true, false, action));
            assert!(allows(false, true, action));
            assert!(allows(true, true, action));
        }
    }

    #[test]
    fn plain_moderators_cannot_destroy_but_moderator_owners_can() {
        assert!(!allows(true, false, Action::Destroy));
        assert!(allows(true, true, Action::Destroy));
        assert!(allows(false, true, Action::Destroy));
        assert!(allows(false, false, Action::Destroy));
    }

    #[test]
    fn authorize_maps_denial_to_forbidden() {
        let moderator = user(UserRole::Moderator);
        let someone_else = Uuid::new_v4();

        assert!(matches!(
            authorize_create(&moderator),
            Err(AppError::Forbidden)
        ));
        assert!(authorize(&moderator, someone_else, Action::Retrieve).is_ok());
        assert!(matches!(
            authorize(&moderator, someone_else, Action::Destroy),
            Err(AppError::Forbidden)
        ));

        let member = user(UserRole::Member);
        assert!(authorize_create(&member).is_ok());
        assert!(authorize(&member, member.id, Action::Update).is_ok());
        assert!(matches!(
            authorize(&member, someone_else, Action::Update),
            Err(AppError::Forbidden)
        ));
    }
}
