use crate::error::AttendanceError;
use crate::model::role::Role;
use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, error::ErrorUnauthorized};
use futures::future::{Ready, ready};

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: u64,
    pub username: String,
    pub role: Role,

    /// Present only if this user is linked to an employee record
    pub employee_id: Option<u64>,
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        // Set by auth_middleware on protected scopes
        ready(
            req.extensions()
                .get::<AuthUser>()
                .cloned()
                .ok_or_else(|| ErrorUnauthorized("Missing authentication")),
        )
    }
}

impl AuthUser {
    /// The person whose attendance this user records.
    pub fn person_id(&self) -> Result<u64, AttendanceError> {
        self.employee_id
            .ok_or_else(|| AttendanceError::forbidden("No employee profile"))
    }

    pub fn require_supervisor(&self) -> Result<(), AttendanceError> {
        if self.role.is_supervisor() {
            Ok(())
        } else {
            Err(AttendanceError::forbidden("HR/Admin only"))
        }
    }

    /// Resolve which person a read is about. Supervisors may read anyone
    /// (or everyone, with `None`); others only themselves.
    pub fn scope(&self, requested: Option<u64>) -> Result<Option<u64>, AttendanceError> {
        if self.role.is_supervisor() {
            return Ok(requested);
        }

        let own = self.person_id()?;
        match requested {
            Some(other) if other != own => Err(AttendanceError::forbidden(
                "You can only view your own attendance",
            )),
            _ => Ok(Some(own)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test::TestRequest};

    fn user(role: Role, employee_id: Option<u64>) -> AuthUser {
        AuthUser {
            user_id: 1,
            username: "u".into(),
            role,
            employee_id,
        }
    }

    #[test]
    fn employees_are_scoped_to_themselves() {
        let intern = user(Role::Intern, Some(7));
        assert_eq!(intern.scope(None).unwrap(), Some(7));
        assert_eq!(intern.scope(Some(7)).unwrap(), Some(7));
        assert!(matches!(
            intern.scope(Some(8)).unwrap_err(),
            AttendanceError::Forbidden { .. }
        ));
        assert!(intern.require_supervisor().is_err());
    }

    #[test]
    fn supervisors_see_anyone() {
        let hr = user(Role::Hr, None);
        assert_eq!(hr.scope(None).unwrap(), None);
        assert_eq!(hr.scope(Some(8)).unwrap(), Some(8));
        assert!(hr.require_supervisor().is_ok());
        assert!(hr.person_id().is_err());
    }

    #[actix_web::test]
    async fn extractor_reads_the_authenticated_caller() {
        let req = TestRequest::default().to_http_request();
        let err = AuthUser::extract(&req).await.unwrap_err();
        assert_eq!(
            err.as_response_error().status_code(),
            StatusCode::UNAUTHORIZED
        );

        req.extensions_mut().insert(user(Role::Employee, Some(7)));
        let caller = AuthUser::extract(&req).await.unwrap();
        assert_eq!(caller.person_id().unwrap(), 7);
    }
}
