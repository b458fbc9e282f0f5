//! Employee identity as resolved through the directory port.

use super::{EmployeeId, ParseEmployeeRoleError, TaskDomainError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role an employee holds in the workforce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeRole {
    /// May create tasks, override statuses, and reassign.
    Admin,
    /// Works assignments and reports their status.
    Employee,
}

impl EmployeeRole {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Employee => "employee",
        }
    }

    /// Returns `true` for administrative roles.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl TryFrom<&str> for EmployeeRole {
    type Error = ParseEmployeeRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "admin" => Ok(Self::Admin),
            "employee" => Ok(Self::Employee),
            _ => Err(ParseEmployeeRoleError(value.to_owned())),
        }
    }
}

impl fmt::Display for EmployeeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Push-delivery token registered for an employee's device.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceToken(String);

impl DeviceToken {
    /// Creates a validated device token.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyDeviceToken`] when the value is
    /// empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(TaskDomainError::EmptyDeviceToken);
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the token as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for DeviceToken {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Employee snapshot returned by the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    id: EmployeeId,
    role: EmployeeRole,
    device_token: Option<DeviceToken>,
}

impl Employee {
    /// Creates an employee snapshot without a device token.
    #[must_use]
    pub const fn new(id: EmployeeId, role: EmployeeRole) -> Self {
        Self {
            id,
            role,
            device_token: None,
        }
    }

    /// Sets the registered device token.
    #[must_use]
    pub fn with_device_token(mut self, device_token: DeviceToken) -> Self {
        self.device_token = Some(device_token);
        self
    }

    /// Returns the employee identifier.
    #[must_use]
    pub const fn id(&self) -> EmployeeId {
        self.id
    }

    /// Returns the employee role.
    #[must_use]
    pub const fn role(&self) -> EmployeeRole {
        self.role
    }

    /// Returns the registered device token, if any.
    #[must_use]
    pub const fn device_token(&self) -> Option<&DeviceToken> {
        self.device_token.as_ref()
    }
}
