//! DTOs for users_sea adapter.

/// DTO for inserting a new user.
#[derive(Debug, Clone)]
pub struct UserCreate {
    pub name: String,
    pub gender: Option<String>,
    pub password_digest: String,
}

impl UserCreate {
    pub fn new(name: impl Into<String>, password_digest: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            gender: None,
            password_digest: password_digest.into(),
        }
    }

    pub fn with_gender(mut self, gender: Option<String>) -> Self {
        self.gender = gender;
        self
    }
}

/// DTO for a partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub gender: Option<String>,
    pub password_digest: Option<String>,
    pub is_admin: Option<bool>,
    pub is_active: Option<bool>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.gender.is_none()
            && self.password_digest.is_none()
            && self.is_admin.is_none()
            && self.is_active.is_none()
    }
}
