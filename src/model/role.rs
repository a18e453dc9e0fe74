#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Role {
    Admin = 1,
    Hr = 2,
    Employee = 3,
    Intern = 4,
}

impl Role {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Role::Admin),
            2 => Some(Role::Hr),
            3 => Some(Role::Employee),
            4 => Some(Role::Intern),
            _ => None,
        }
    }

    /// Can read and manage other people's attendance.
    pub fn is_supervisor(&self) -> bool {
        matches!(self, Role::Admin | Role::Hr)
    }
}
