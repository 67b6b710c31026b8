#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountFormContext {
    FirstSetup,
    AdminCreate,
    AdminEdit,
    SelfEdit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountField {
    SetupKey,
    Name,
    Email,
    Password,
    PasswordConfirm,
    Admin,
    Mentors,
    Semesters,
    Delete,
}

impl AccountFormContext {
    pub fn for_edit(caller_is_admin: bool) -> Self {
        if caller_is_admin {
            Self::AdminEdit
        } else {
            Self::SelfEdit
        }
    }

    pub fn fields(self) -> &'static [AccountField] {
        use AccountField::*;

        match self {
            Self::FirstSetup => &[SetupKey, Name, Email, Password, PasswordConfirm],
            Self::AdminCreate => &[
                Name,
                Email,
                Password,
                PasswordConfirm,
                Admin,
                Mentors,
                Semesters,
            ],
            Self::AdminEdit => &[
                Name,
                Email,
                Password,
                PasswordConfirm,
                Admin,
                Mentors,
                Semesters,
                Delete,
            ],
            Self::SelfEdit => &[Name, Password, PasswordConfirm],
        }
    }

    pub fn has(self, field: AccountField) -> bool {
        self.fields().contains(&field)
    }

    pub fn requires_password(self) -> bool {
        matches!(self, Self::FirstSetup | Self::AdminCreate)
    }
}
