use std::fmt;
use std::str::FromStr;

/// The fixed set of dashboard roles.
///
/// Roles are stored as their string form in the `users` and `roles` tables
/// and parsed back into this enum at the boundary, so call sites never
/// compare raw string literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Staff,
    Teacher,
    Parent,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Staff, Role::Teacher, Role::Parent];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Staff => "staff",
            Role::Teacher => "teacher",
            Role::Parent => "parent",
        }
    }

    /// Privilege ordering used by the promotion downgrade guard: a role is
    /// never replaced by one with a lower rank.
    pub fn rank(&self) -> u8 {
        match self {
            Role::Admin => 3,
            Role::Staff => 2,
            Role::Teacher => 1,
            Role::Parent => 0,
        }
    }

    /// Whether this role may operate the admissions back office.
    pub fn is_staff(&self) -> bool {
        self.rank() >= Role::Staff.rank()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "staff" => Ok(Role::Staff),
            "teacher" => Ok(Role::Teacher),
            "parent" => Ok(Role::Parent),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_string_round_trip() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        assert!("superuser".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn test_rank_ordering() {
        assert!(Role::Admin.rank() > Role::Staff.rank());
        assert!(Role::Staff.rank() > Role::Teacher.rank());
        assert!(Role::Teacher.rank() > Role::Parent.rank());
    }

    #[test]
    fn test_staff_gate() {
        assert!(Role::Admin.is_staff());
        assert!(Role::Staff.is_staff());
        assert!(!Role::Teacher.is_staff());
        assert!(!Role::Parent.is_staff());
    }
}
