use crate::{error::AppError, models::Role};

/// The authenticated identity for the current login. Owned by the menu loop
/// and passed explicitly to every action; re-resolved whenever the account's
/// own login or role is edited mid-session.
#[derive(Debug, Clone)]
pub struct Session {
    pub login: String,
    pub role: Role,
}

impl Session {
    pub fn new(login: impl Into<String>, role: Role) -> Self {
        Self {
            login: login.into(),
            role,
        }
    }
}

pub fn ensure_staff(session: &Session) -> Result<(), AppError> {
    if !session.role.is_staff() {
        return Err(AppError::PermissionDenied);
    }
    Ok(())
}

pub fn ensure_manager(session: &Session) -> Result<(), AppError> {
    if session.role != Role::Manager {
        return Err(AppError::PermissionDenied);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn customer_fails_both_gates() {
        let session = Session::new("alice", Role::Customer);
        assert!(matches!(
            ensure_staff(&session),
            Err(AppError::PermissionDenied)
        ));
        assert!(matches!(
            ensure_manager(&session),
            Err(AppError::PermissionDenied)
        ));
    }

    #[test]
    fn employee_is_staff_but_not_manager() {
        let session = Session::new("eve", Role::Employee);
        assert!(ensure_staff(&session).is_ok());
        assert!(matches!(
            ensure_manager(&session),
            Err(AppError::PermissionDenied)
        ));
    }

    #[test]
    fn manager_passes_both_gates() {
        let session = Session::new("mia", Role::Manager);
        assert!(ensure_staff(&session).is_ok());
        assert!(ensure_manager(&session).is_ok());
    }
}
