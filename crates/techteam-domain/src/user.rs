//! User domain types.

string_enum! {
    /// Account role. `SuperAdmin` is the only role without a school.
    pub enum UserRole {
        SuperAdmin => "super_admin",
        Admin => "admin",
        Student => "student",
    }
}

impl UserRole {
    /// Roles that manage a school's students and tickets.
    pub fn is_staff(self) -> bool {
        matches!(self, Self::SuperAdmin | Self::Admin)
    }
}

string_enum! {
    /// Profile avatar picked by a student.
    pub enum Avatar {
        Rocket => "rocket",
        Star => "star",
        Lightning => "lightning",
        Trophy => "trophy",
        Medal => "medal",
        Fire => "fire",
        Robot => "robot",
        Laptop => "laptop",
        Wrench => "wrench",
        Gear => "gear",
    }
}

impl Default for Avatar {
    fn default() -> Self {
        Self::Rocket
    }
}
